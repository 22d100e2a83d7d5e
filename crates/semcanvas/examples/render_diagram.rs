//! Example: driving a diagram controller from code
//!
//! Builds a small class diagram, simulates a drag and prints the diagram
//! as SVG.

use indexmap::IndexMap;

use semcanvas::{
    DiagramCallbacks, DiagramController,
    config::AppConfig,
    geometry::{Point, Size},
    identifier::Id,
    model::{Cardinality, Edge, EdgeType, Node, NodeItem, Position},
};

struct PrintingOwner;

impl DiagramCallbacks for PrintingOwner {
    fn on_change_nodes_positions(&mut self, changes: &IndexMap<Id, Position>) {
        for (id, position) in changes {
            eprintln!("moved {id} to ({}, {})", position.x, position.y);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let person = Node::new(
        "person",
        "https://example.com/vocab#Person",
        "Person",
        Position::new(0.0, 0.0),
    )
    .with_items(vec![NodeItem::new("person-name", "name")]);
    let address = Node::new(
        "address",
        "https://example.com/vocab#Address",
        "Address",
        Position::new(320.0, 40.0),
    );

    let mut lives_at = Edge::new(
        EdgeType::Association,
        "lives-at",
        "https://example.com/vocab#livesAt",
        "person",
        "address",
    );
    lives_at.label = "lives at".to_string();
    lives_at.cardinality_target = Cardinality::range(1, None);

    let mut controller = DiagramController::new(AppConfig::default(), PrintingOwner);
    controller.set_content(vec![person, address], vec![lives_at], vec![]);
    controller.set_node_dimensions(Id::new("person"), Size::new(180.0, 70.0));
    controller.set_node_dimensions(Id::new("address"), Size::new(160.0, 50.0));

    let id = Id::new("address");
    controller.drag_node_start(id);
    controller.drag_node(id, Point::new(340.0, 120.0));
    controller.drag_node_stop(id);

    controller.write_svg(std::io::stdout())?;
    Ok(())
}
