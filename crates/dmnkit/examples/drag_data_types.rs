//! Example: Reading a document and reordering its data types
//!
//! This example parses a DMN document, prints the graph built from it, nests
//! one data type into another with a drag gesture and writes the result.

use futures::executor::block_on;

use dmnkit::{DmnBuilder, config::AppConfig, dnd::MousePosition, marshaller::Metadata};

const SOURCE: &str = r##"<definitions xmlns="http://www.omg.org/spec/DMN/20180521/MODEL/"
    id="_defs" name="Shipping" namespace="urn:shipping">
  <itemDefinition id="_address" name="tAddress"><typeRef>string</typeRef></itemDefinition>
  <itemDefinition id="_person" name="tPerson"><typeRef>string</typeRef></itemDefinition>
  <itemDefinition id="_city" name="tCity"><typeRef>string</typeRef></itemDefinition>
  <inputData id="_customer" name="Customer"/>
  <decision id="_cost" name="Shipping Cost">
    <informationRequirement id="_ir"><requiredInput href="#_customer"/></informationRequirement>
  </decision>
</definitions>"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = DmnBuilder::new(AppConfig::default());

    let mut definitions = builder.parse(SOURCE)?;
    let graph = block_on(builder.unmarshall(&Metadata::new(), definitions.clone()))?;

    println!("Graph nodes:");
    for node in graph.nodes() {
        if let Some(drg_node) = node.drg_node() {
            let bounds = node.content().bounds();
            println!(
                "  {} {} at ({}, {})",
                drg_node.element().kind_name(),
                drg_node.element().id(),
                bounds.min_x(),
                bounds.min_y()
            );
        }
    }
    println!("Graph edges: {}\n", graph.edges_count());

    let mut data_types = builder.data_type_list(&definitions);
    let city = data_types
        .find_by_hash("tCity")
        .map(|data_type| data_type.uuid().to_string())
        .ok_or("tCity not found")?;

    // Drag tCity by its grip and drop it onto the tPerson row
    if data_types.on_mouse_down(&city, true) {
        data_types.on_mouse_move(MousePosition::new(10, 105));
        data_types.on_mouse_up();
    }

    for data_type in data_types.visible_data_types() {
        let hash = data_types.calculate_hash(data_type).unwrap_or_default();
        println!("  {hash}");
    }

    definitions.item_definitions = data_types.item_definitions();
    println!("\n{}", builder.write(&definitions)?);

    Ok(())
}
