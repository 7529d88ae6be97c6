//! Geometry conversions between DMNDI coordinates and graph views.
//!
//! DMNDI stores every shape and waypoint in absolute diagram coordinates.
//! The graph keeps the bounds of nodes inside a decision service relative to
//! the service, and edge ends as magnets relative to their node.

use dmnkit_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::structure::{CoordinateFrame, Graph, MagnetConnection, View};

/// Distance from the exact centre under which a connection counts as centred.
pub const CENTRE_TOLERANCE: f64 = 1.0;

pub fn upper_left_bound(view: &View) -> Point {
    view.bounds().min_point()
}

pub fn lower_right_bound(view: &View) -> Point {
    view.bounds().max_point()
}

pub fn x_of_bound(bound: Point) -> f64 {
    bound.x()
}

pub fn y_of_bound(bound: Point) -> f64 {
    bound.y()
}

/// True when the relative point lies within [`CENTRE_TOLERANCE`] of the centre on both axes.
///
/// # Examples
///
/// ```
/// use dmnkit::marshaller::point_utils::is_centre;
///
/// assert!(is_centre(50.5, 25.0, 100.0, 50.0));
/// assert!(!is_centre(52.0, 25.0, 100.0, 50.0));
/// ```
pub fn is_centre(x: f64, y: f64, width: f64, height: f64) -> bool {
    (width / 2.0 - x).abs() < CENTRE_TOLERANCE && (height / 2.0 - y).abs() < CENTRE_TOLERANCE
}

/// Builds the magnet for an absolute waypoint touching `view`.
///
/// `view` must be in absolute coordinates.
pub fn magnet_for(view: &View, absolute: Point) -> MagnetConnection {
    let bounds = view.bounds();
    let relative = absolute.sub_point(upper_left_bound(view));

    if is_centre(relative.x(), relative.y(), bounds.width(), bounds.height()) {
        MagnetConnection::at_center(bounds)
    } else {
        MagnetConnection::at(relative.x(), relative.y()).with_auto(true)
    }
}

/// The absolute point a connection attaches to.
///
/// `view` must be in absolute coordinates.
pub fn connection_point(view: &View, connection: &MagnetConnection) -> Point {
    match connection.location() {
        Some(location) => upper_left_bound(view).add_point(location),
        None => view.bounds().center(),
    }
}

/// Offset of the node's frame: the absolute upper-left corner of its decision service.
fn frame_origin(graph: &Graph, id: Id) -> Point {
    let Some(parent_id) = graph.parent(id) else {
        return Point::default();
    };
    let Some(parent) = graph.node(parent_id) else {
        return Point::default();
    };
    if !parent.content().definition().is_decision_service() {
        return Point::default();
    }

    let parent_view = parent.content();
    match parent_view.frame() {
        CoordinateFrame::Absolute => upper_left_bound(parent_view),
        CoordinateFrame::Relative => {
            upper_left_bound(parent_view).add_point(frame_origin(graph, parent_id))
        }
    }
}

/// Converts the node's bounds to absolute coordinates. A no-op when already absolute.
pub fn convert_to_absolute_bounds(graph: &mut Graph, id: Id) {
    let Some(node) = graph.node(id) else {
        return;
    };
    if node.content().frame() == CoordinateFrame::Absolute {
        return;
    }

    let origin = frame_origin(graph, id);
    if let Some(node) = graph.node_mut(id) {
        let bounds = node.content().bounds().translate(origin);
        node.content_mut()
            .set_bounds(bounds, CoordinateFrame::Absolute);
    }
}

/// Converts the node's bounds to coordinates relative to its decision service.
/// A no-op when already relative.
pub fn convert_to_relative_bounds(graph: &mut Graph, id: Id) {
    let Some(node) = graph.node(id) else {
        return;
    };
    if node.content().frame() == CoordinateFrame::Relative {
        return;
    }

    let origin = frame_origin(graph, id);
    if let Some(node) = graph.node_mut(id) {
        let bounds: Bounds = node.content().bounds().inverse_translate(origin);
        node.content_mut()
            .set_bounds(bounds, CoordinateFrame::Relative);
    }
}

/// Converts every node of the graph to the given frame.
pub fn convert_all(graph: &mut Graph, frame: CoordinateFrame) {
    for id in graph.node_ids() {
        match frame {
            CoordinateFrame::Absolute => convert_to_absolute_bounds(graph, id),
            CoordinateFrame::Relative => convert_to_relative_bounds(graph, id),
        }
    }
}
