//! Diagram snapshots read by the CLI.
//!
//! A snapshot is the JSON form of what an owner would hand to the
//! controller: nodes, edges, groups and the sizes the host measured.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use semcanvas::{
    DiagramCallbacks, DiagramController,
    config::AppConfig,
    geometry::Size,
    identifier::Id,
    model::{Edge, Group, Node},
};

use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,

    /// Measured node sizes; nodes without an entry use the configured default.
    pub dimensions: HashMap<Id, Size>,
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Snapshot`] with the position of the first problem.
    pub fn parse(src: &str) -> Result<Self, CliError> {
        let snapshot: Self =
            serde_json::from_str(src).map_err(|err| CliError::snapshot(&err, src))?;
        debug!(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            groups = snapshot.groups.len();
            "Parsed diagram snapshot"
        );
        Ok(snapshot)
    }

    /// Loads the snapshot into a new controller.
    pub fn into_controller<C: DiagramCallbacks>(
        self,
        config: AppConfig,
        callbacks: C,
    ) -> DiagramController<C> {
        let mut controller = DiagramController::new(config, callbacks);
        controller.set_content(self.nodes, self.edges, self.groups);
        for (id, size) in self.dimensions {
            controller.set_node_dimensions(id, size);
        }
        controller
    }
}
