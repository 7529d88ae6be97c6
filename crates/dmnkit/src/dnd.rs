//! Drag-and-drop reordering of the data type hierarchy.
//!
//! # Layers
//!
//! ```text
//! pointer gestures
//!     ↓ DataTypeList
//! DndList (rows, levels, pixel offsets)
//!     ↓ drop
//! DndDataTypesHandler (strategy, reference)
//!     ↓ shift
//! DataTypeTree
//! ```
//!
//! # Submodules
//!
//! - [`position`] - Grid positions and row state
//! - [`list`] - The list engine: registration, gestures, consolidation
//! - [`data_type`] - Data types and their tree
//! - [`handler`] - Drop strategies and tree edits
//! - [`data_type_list`] - The tree shown as a list

pub mod data_type;
pub mod data_type_list;
pub mod handler;
pub mod list;
pub mod position;

pub use data_type::{DataType, DataTypeTree};
pub use data_type_list::DataTypeList;
pub use handler::{DndContext, DndDataTypesHandler, ShiftStrategy};
pub use list::{DndList, MousePosition};
pub use position::{DndItem, Position};

use thiserror::Error;

/// A drop that cannot be applied to the data type tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DndError {
    #[error("Data type not found: {0}")]
    DataTypeNotFound(String),

    #[error("Data type '{0}' is read-only")]
    ReadOnly(String),

    #[error("Cannot move data type '{current}' relative to '{reference}' nested in it")]
    InvalidMove { current: String, reference: String },
}
