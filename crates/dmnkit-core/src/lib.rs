//! dmnkit Core Types and Definitions
//!
//! This crate provides the foundational types shared by the dmnkit crates.
//! It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **DMN**: The DMN document model ([`dmn`] module)

pub mod color;
pub mod dmn;
pub mod geometry;
pub mod identifier;
