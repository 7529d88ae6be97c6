//! Repairs applied to a document's diagram interchange before unmarshalling.
//!
//! Every document must end up with a diagram named `DRG` showing the whole
//! decision requirements graph, and every local element must have a shape.

use log::{debug, info};

use dmnkit_core::{
    dmn::{Definitions, DiagramElement, DmnDiagram, DmnShape, DrgElement, QName},
    geometry::{Bounds, Point},
};

use super::id_utils::{shape_id, unique_id};
use crate::config::UnmarshallerConfig;

/// Name of the diagram showing the whole decision requirements graph.
pub const DRG: &str = "DRG";

/// Makes sure the document has exactly one diagram named [`DRG`].
///
/// - Diagrams without an id get a unique one.
/// - When several diagrams are named `DRG`, the first keeps the name and the
///   others become `DRG-1`, `DRG-2`, ...
/// - A single diagram is renamed `DRG`.
/// - Otherwise a `DRG` diagram is generated from copies of every diagram's
///   elements, each diagram shifted right past the previous ones.
pub fn ensure_drg_element_exists(defs: &mut Definitions) {
    let dmndi = defs.dmndi.get_or_insert_with(Default::default);

    for diagram in &mut dmndi.diagrams {
        if diagram.id.is_empty() {
            diagram.id = unique_id();
        }
    }

    let eligible: Vec<usize> = dmndi
        .diagrams
        .iter()
        .enumerate()
        .filter(|(_, diagram)| diagram.name == DRG)
        .map(|(index, _)| index)
        .collect();

    if let Some((_, others)) = eligible.split_first() {
        for (suffix, &index) in others.iter().enumerate() {
            let diagram = &mut dmndi.diagrams[index];
            diagram.name = format!("{}-{}", diagram.name, suffix + 1);
        }
        return;
    }

    if let [diagram] = dmndi.diagrams.as_mut_slice() {
        debug!(diagram_id = diagram.id.as_str(); "Renaming the only diagram to DRG");
        diagram.name = DRG.to_string();
        return;
    }

    let drg = generate_drg(&dmndi.diagrams);
    info!(
        diagram_id = drg.id.as_str(),
        elements_count = drg.elements.len();
        "Generated DRG diagram"
    );
    dmndi.diagrams.push(drg);
}

fn generate_drg(diagrams: &[DmnDiagram]) -> DmnDiagram {
    let mut drg = DmnDiagram::new(unique_id(), DRG);
    let mut global_origin_x = 0.0_f64;

    for diagram in diagrams {
        let diagram_origin_x = global_origin_x;

        for element in &diagram.elements {
            let copy = match element {
                DiagramElement::Shape(shape) => {
                    let current_max = shape.bounds.max_x();
                    if current_max > global_origin_x {
                        global_origin_x = current_max;
                    }

                    let mut shape = shape.clone();
                    shape.id = unique_id();
                    shape.bounds = shape.bounds.translate(Point::new(diagram_origin_x, 0.0));
                    if let Some(divider) = shape.decision_service_divider_line.as_mut() {
                        for point in divider.iter_mut() {
                            *point = point.add_point(Point::new(diagram_origin_x, 0.0));
                        }
                    }
                    DiagramElement::Shape(shape)
                }
                DiagramElement::Edge(edge) => {
                    let mut edge = edge.clone();
                    edge.id = unique_id();
                    edge.source_element = None;
                    edge.target_element = None;
                    for waypoint in &mut edge.waypoints {
                        *waypoint = waypoint.add_point(Point::new(diagram_origin_x, 0.0));
                    }
                    DiagramElement::Edge(edge)
                }
            };
            drg.elements.push(copy);
        }
    }

    drg
}

/// Returns the first diagram named [`DRG`].
pub fn drg_diagram_mut(defs: &mut Definitions) -> Option<&mut DmnDiagram> {
    defs.dmndi
        .as_mut()?
        .diagrams
        .iter_mut()
        .find(|diagram| diagram.name == DRG)
}

/// Adds a default shape to the `DRG` diagram for every local element without one.
///
/// Shapes are laid out on a grid below the existing shapes. Returns the
/// number of shapes added.
pub fn synthesize_missing_shapes(defs: &mut Definitions, config: &UnmarshallerConfig) -> usize {
    let shown: Vec<&QName> = defs
        .dmndi
        .iter()
        .flat_map(|dmndi| &dmndi.diagrams)
        .flat_map(|diagram| diagram.shapes())
        .map(|shape| &shape.dmn_element_ref)
        .collect();
    let has_shape = |id: &str| shown.iter().any(|qname| qname.local_part.ends_with(id));

    let missing: Vec<(String, bool)> = defs
        .drg_elements
        .iter()
        .map(|element| {
            (
                element.id().to_string(),
                matches!(element, DrgElement::DecisionService(_)),
            )
        })
        .chain(
            defs.text_annotations()
                .map(|annotation| (annotation.id.clone(), false)),
        )
        .filter(|(id, _)| !id.is_empty() && !has_shape(id))
        .collect();

    if missing.is_empty() {
        return 0;
    }

    let Some(drg) = drg_diagram_mut(defs) else {
        return 0;
    };

    let top = drg
        .shapes()
        .map(|shape| shape.bounds.max_y() + config.shape_spacing())
        .fold(0.0_f64, f64::max);
    let cell = config
        .decision_service_size()
        .width()
        .max(config.default_shape_size().width())
        + config.shape_spacing();
    let row_height = config
        .decision_service_size()
        .height()
        .max(config.default_shape_size().height())
        + config.shape_spacing();

    for (index, (element_id, is_service)) in missing.iter().enumerate() {
        let column = index % config.shapes_per_row();
        let row = index / config.shapes_per_row();
        let top_left = Point::new(
            config.shape_spacing() + column as f64 * cell,
            top + config.shape_spacing() + row as f64 * row_height,
        );
        let size = if *is_service {
            config.decision_service_size()
        } else {
            config.default_shape_size()
        };

        debug!(element_id = element_id.as_str(); "Synthesizing missing shape");
        drg.elements.push(DiagramElement::Shape(DmnShape {
            id: shape_id(&drg.id, element_id),
            dmn_element_ref: QName::new(element_id.as_str()),
            bounds: Bounds::new_from_top_left(top_left, size),
            ..Default::default()
        }));
    }

    missing.len()
}
