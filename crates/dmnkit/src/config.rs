//! Configuration types for the dmnkit engines.
//!
//! This module provides configuration structures that control how DMN
//! documents are unmarshalled and marshalled and how the data-type list lays
//! out its rows. All types implement [`serde::Deserialize`] for flexible
//! loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining every section.
//! - [`UnmarshallerConfig`] - Default geometry for shapes synthesized on unmarshall.
//! - [`MarshallerConfig`] - Output options for marshalled documents.
//! - [`DndConfig`] - Pixel metrics of the drag-and-drop list.
//!
//! # Example
//!
//! ```
//! # use dmnkit::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.dnd().item_height(), 70);
//! assert_eq!(config.marshaller().indent(), 2);
//! ```

use serde::Deserialize;

use dmnkit_core::geometry::Size;

/// Top-level application configuration combining every section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Unmarshaller configuration section.
    #[serde(default)]
    unmarshaller: UnmarshallerConfig,

    /// Marshaller configuration section.
    #[serde(default)]
    marshaller: MarshallerConfig,

    /// Drag-and-drop configuration section.
    #[serde(default)]
    dnd: DndConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        unmarshaller: UnmarshallerConfig,
        marshaller: MarshallerConfig,
        dnd: DndConfig,
    ) -> Self {
        Self {
            unmarshaller,
            marshaller,
            dnd,
        }
    }

    /// Returns the unmarshaller configuration.
    pub fn unmarshaller(&self) -> &UnmarshallerConfig {
        &self.unmarshaller
    }

    /// Returns the marshaller configuration.
    pub fn marshaller(&self) -> &MarshallerConfig {
        &self.marshaller
    }

    /// Returns the drag-and-drop configuration.
    pub fn dnd(&self) -> &DndConfig {
        &self.dnd
    }
}

/// Geometry used for shapes the unmarshaller has to synthesize.
///
/// DMN 1.1 documents carry no diagram interchange at all, and hand-edited
/// documents may omit shapes. Missing shapes are laid out on a grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnmarshallerConfig {
    default_shape_width: f64,
    default_shape_height: f64,
    decision_service_size: f64,
    shape_spacing: f64,
    shapes_per_row: usize,
}

impl Default for UnmarshallerConfig {
    fn default() -> Self {
        Self {
            default_shape_width: 100.0,
            default_shape_height: 50.0,
            decision_service_size: 200.0,
            shape_spacing: 50.0,
            shapes_per_row: 5,
        }
    }
}

impl UnmarshallerConfig {
    /// Creates a new [`UnmarshallerConfig`].
    ///
    /// # Arguments
    ///
    /// * `default_shape_size` - Size of synthesized shapes.
    /// * `decision_service_size` - Side of the square used for decision services.
    /// * `shape_spacing` - Gap between synthesized shapes.
    /// * `shapes_per_row` - Grid columns; at least one column is always used.
    pub fn new(
        default_shape_size: Size,
        decision_service_size: f64,
        shape_spacing: f64,
        shapes_per_row: usize,
    ) -> Self {
        Self {
            default_shape_width: default_shape_size.width(),
            default_shape_height: default_shape_size.height(),
            decision_service_size,
            shape_spacing,
            shapes_per_row,
        }
    }

    pub fn default_shape_size(&self) -> Size {
        Size::new(self.default_shape_width, self.default_shape_height)
    }

    pub fn decision_service_size(&self) -> Size {
        Size::new(self.decision_service_size, self.decision_service_size)
    }

    pub fn shape_spacing(&self) -> f64 {
        self.shape_spacing
    }

    pub fn shapes_per_row(&self) -> usize {
        self.shapes_per_row.max(1)
    }
}

/// Output options for marshalled documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarshallerConfig {
    /// Write the `kie:ComponentsWidthsExtension` of every diagram.
    emit_components_widths: bool,

    /// Indentation width of the written XML; `0` writes a single line.
    indent: usize,
}

impl Default for MarshallerConfig {
    fn default() -> Self {
        Self {
            emit_components_widths: true,
            indent: 2,
        }
    }
}

impl MarshallerConfig {
    pub fn new(emit_components_widths: bool, indent: usize) -> Self {
        Self {
            emit_components_widths,
            indent,
        }
    }

    pub fn emit_components_widths(&self) -> bool {
        self.emit_components_widths
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Pixel metrics of the drag-and-drop list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DndConfig {
    item_height: i32,
    indentation_size: i32,
    item_width: i32,
    grip_padding: i32,
}

impl Default for DndConfig {
    fn default() -> Self {
        Self {
            item_height: 70,
            indentation_size: 60,
            item_width: 600,
            grip_padding: 10,
        }
    }
}

impl DndConfig {
    pub fn new(item_height: i32, indentation_size: i32, item_width: i32, grip_padding: i32) -> Self {
        Self {
            item_height,
            indentation_size,
            item_width,
            grip_padding,
        }
    }

    /// Height of one row, at least one pixel.
    pub fn item_height(&self) -> i32 {
        self.item_height.max(1)
    }

    /// Horizontal offset of one nesting level, at least one pixel.
    pub fn indentation_size(&self) -> i32 {
        self.indentation_size.max(1)
    }

    pub fn item_width(&self) -> i32 {
        self.item_width
    }

    /// Distance between the cursor and the left edge of the dragged row.
    pub fn grip_padding(&self) -> i32 {
        self.grip_padding
    }

    /// Name of the first row metric configured as zero or negative.
    ///
    /// Such values are treated as one pixel by the accessors.
    pub fn non_positive_metric(&self) -> Option<&'static str> {
        if self.item_height <= 0 {
            Some("item_height")
        } else if self.indentation_size <= 0 {
            Some("indentation_size")
        } else {
            None
        }
    }

    /// Vertical band around a row border that must be crossed before swapping.
    pub fn drag_padding(&self) -> i32 {
        self.item_height() / 3
    }
}
