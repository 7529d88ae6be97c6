//! DMN document model types.
//!
//! This module contains the tree-shaped, namespace-qualified representation of a
//! DMN file as read from (and written back to) XML. It is a plain data model:
//! no references are resolved here, element relations are kept as href strings
//! and diagram elements point at DRG elements through [`QName`]s.
//!
//! # Pipeline Position
//!
//! ```text
//! DMN XML
//!     ↓ dmnkit-xml reader
//! Document Model (these types)
//!     ↓ unmarshaller
//! Graph (nodes, edges, views)
//!     ↓ marshaller
//! Document Model
//!     ↓ dmnkit-xml writer
//! DMN XML
//! ```
//!
//! # Organization
//!
//! - [`definitions`] - The [`Definitions`] root, imports, item definitions and versions
//! - [`drg`] - DRG elements and their requirements
//! - [`artifact`] - Text annotations and associations
//! - [`dmndi`] - Diagram interchange: diagrams, shapes, edges, styles
//! - [`raw`] - Opaque XML subtrees kept verbatim

pub mod artifact;
pub mod definitions;
pub mod dmndi;
pub mod drg;
pub mod raw;

pub use artifact::*;
pub use definitions::*;
pub use dmndi::*;
pub use drg::*;
pub use raw::*;
