//! Conversion between DMN documents and the in-memory graph.
//!
//! # Pipeline Position
//!
//! ```text
//! Definitions
//!     ↓ imports resolved (async)
//! Definitions + ImportedModels
//!     ↓ diagram repair, node entries, connector
//! Graph (relative framing)
//!     ↓ marshall
//! Definitions
//! ```
//!
//! # Submodules
//!
//! - [`id_utils`] - Prefixed ids of shapes and edges, unique ids
//! - [`point_utils`] - Bounds, magnets and coordinate frame conversions
//! - [`diagram_utils`] - `DRG` diagram repair and missing shape synthesis
//! - [`imports`] - Import resolution and imported models
//! - [`node_entry`] - Pairing of shapes with their elements
//! - [`factory`] - Node and edge creation
//! - [`connector`] - Edges between the nodes of one diagram
//!
//! # Re-exports
//!
//! - [`DmnUnmarshaller`] - Document to graph
//! - [`DmnMarshaller`] - Graph to document

pub mod connector;
pub mod diagram_utils;
pub mod factory;
pub mod id_utils;
pub mod imports;
mod marshall;
pub mod node_entry;
pub mod point_utils;
mod unmarshall;

pub use imports::{ImportResolver, ImportedModels, Metadata, NoImports};
pub use marshall::DmnMarshaller;
pub use unmarshall::{DmnUnmarshaller, find_diagram};
