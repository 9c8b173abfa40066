use std::collections::BTreeMap;

use crate::boundary::JunctionBoundary;
use crate::topology::JunctionConnection;
use crate::{ConnectionId, JunctionId, RoadId};

/// Area where several roads meet
///
/// The junction owns its connection set and boundary. Both are produced by a
/// rebuild and swapped in as a whole, never patched field by field.
#[derive(Debug, Clone, Default)]
pub struct Junction {
    pub id: JunctionId,
    pub name: String,
    connections: BTreeMap<ConnectionId, JunctionConnection>,
    boundary: Option<JunctionBoundary>,
}

impl Junction {
    pub fn new(id: JunctionId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Connections ordered by id
    pub fn connections(&self) -> impl Iterator<Item = &JunctionConnection> {
        self.connections.values()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&JunctionConnection> {
        self.connections.get(&id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn corner_connections(&self) -> impl Iterator<Item = &JunctionConnection> {
        self.connections
            .values()
            .filter(|connection| connection.is_corner_connection())
    }

    /// Connections entering the junction from `road_id`
    pub fn connections_from(&self, road_id: RoadId) -> impl Iterator<Item = &JunctionConnection> {
        self.connections
            .values()
            .filter(move |connection| connection.incoming_road() == road_id)
    }

    /// Swaps in a freshly built connection set
    pub fn replace_connections(&mut self, connections: impl IntoIterator<Item = JunctionConnection>) {
        self.connections = connections
            .into_iter()
            .map(|connection| (connection.id(), connection))
            .collect();
    }

    pub fn boundary(&self) -> Option<&JunctionBoundary> {
        self.boundary.as_ref()
    }

    /// Swaps in a freshly assembled boundary
    pub fn replace_boundary(&mut self, boundary: JunctionBoundary) {
        self.boundary = Some(boundary);
    }
}
