//! Map state and core simulation types
//!
//! The map is plain data: three id-keyed collections. Blobs carry no stored
//! position; where a blob is follows from its edge and progress (see
//! `geometry::blob_pos`).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;

/// Player identifier. `NEUTRAL_TEAM` marks unowned nodes; players are 1-indexed.
pub type Team = u32;

/// Team value of unowned nodes
pub const NEUTRAL_TEAM: Team = 0;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(token: impl Into<String>) -> Self {
                Self(token.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(token: &str) -> Self {
                Self::new(token)
            }
        }
    };
}

entity_id!(
    /// Identifier of a node
    NodeId
);
entity_id!(
    /// Identifier of an edge
    EdgeId
);
entity_id!(
    /// Identifier of a blob
    BlobId
);

/// Alphabet of generated id tokens (URL-safe, 64 symbols)
const ID_ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of generated id tokens
pub const ID_LENGTH: usize = 21;

/// Seeded generator for opaque entity ids.
///
/// Ids look random to clients, but a run replays exactly from its seed.
#[derive(Debug, Clone)]
pub struct IdGen {
    rng: Pcg32,
}

impl IdGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn token(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    pub fn node_id(&mut self) -> NodeId {
        NodeId(self.token())
    }

    pub fn edge_id(&mut self) -> EdgeId {
        EdgeId(self.token())
    }

    pub fn blob_id(&mut self) -> BlobId {
        BlobId(self.token())
    }
}

/// A stationary mass reservoir owned by a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub team: Team,
    /// Always within `[0, MAX_MASS]`
    pub mass: f32,
    /// Position in normalized `[0, 1]²` map space
    pub pos: Vec2,
    pub grow_interval_ms: u32,
    pub grow_mass: f32,
}

/// An undirected connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub node_a: NodeId,
    pub node_b: NodeId,
}

impl Edge {
    /// Node a blob leaves from when travelling in the given direction
    pub fn start(&self, a_to_b: bool) -> &NodeId {
        if a_to_b { &self.node_a } else { &self.node_b }
    }

    /// Node a blob travels towards in the given direction
    pub fn end(&self, a_to_b: bool) -> &NodeId {
        if a_to_b { &self.node_b } else { &self.node_a }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.node_a == node || &self.node_b == node
    }
}

/// A packet of mass in transit along one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub id: BlobId,
    pub edge: EdgeId,
    pub a_to_b: bool,
    /// Fraction of the edge traversed; 0 at the start node, 1 at the end node
    pub progress: f32,
    pub team: Team,
    pub mass: f32,
}

impl Blob {
    /// A blob with no mass left is dead and must leave the map
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.mass > 0.0
    }
}

/// Complete map state (deterministic, serializable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: BTreeMap<EdgeId, Edge>,
    pub blobs: BTreeMap<BlobId, Blob>,
}

impl GameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node, SimError> {
        self.nodes
            .get(id)
            .ok_or_else(|| SimError::UnknownNode(id.clone()))
    }

    pub fn edge(&self, id: &EdgeId) -> Result<&Edge, SimError> {
        self.edges
            .get(id)
            .ok_or_else(|| SimError::UnknownEdge(id.clone()))
    }

    pub fn blob(&self, id: &BlobId) -> Result<&Blob, SimError> {
        self.blobs
            .get(id)
            .ok_or_else(|| SimError::UnknownBlob(id.clone()))
    }

    /// Edges a blob can be launched along from `node`, with the matching direction flag
    pub fn edges_from(&self, node: &NodeId) -> Vec<(EdgeId, bool)> {
        self.edges
            .values()
            .filter(|edge| edge.touches(node))
            .map(|edge| (edge.id.clone(), &edge.node_a == node))
            .collect()
    }

    /// Mass a team holds in nodes and in transit
    pub fn team_mass(&self, team: Team) -> f32 {
        let in_nodes: f32 = self
            .nodes
            .values()
            .filter(|n| n.team == team)
            .map(|n| n.mass)
            .sum();
        let in_blobs: f32 = self
            .blobs
            .values()
            .filter(|b| b.team == team)
            .map(|b| b.mass)
            .sum();
        in_nodes + in_blobs
    }

    pub fn total_mass(&self) -> f32 {
        self.nodes.values().map(|n| n.mass).sum::<f32>()
            + self.blobs.values().map(|b| b.mass).sum::<f32>()
    }

    /// Player teams that still own a node or a blob
    pub fn active_teams(&self) -> BTreeSet<Team> {
        self.nodes
            .values()
            .map(|n| n.team)
            .chain(self.blobs.values().map(|b| b.team))
            .filter(|&team| team != NEUTRAL_TEAM)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, team: Team, mass: f32) -> Node {
        Node {
            id: id.into(),
            team,
            mass,
            pos: Vec2::ZERO,
            grow_interval_ms: 2000,
            grow_mass: 10.0,
        }
    }

    #[test]
    fn test_id_gen_is_seeded() {
        let mut a = IdGen::new(7);
        let mut b = IdGen::new(7);
        let first = a.node_id();
        assert_eq!(first, b.node_id());
        assert_eq!(first.as_str().len(), ID_LENGTH);
        assert_ne!(first.as_str(), a.node_id().as_str());
    }

    #[test]
    fn test_edge_direction() {
        let edge = Edge {
            id: "e".into(),
            node_a: "a".into(),
            node_b: "b".into(),
        };
        assert_eq!(edge.start(true).as_str(), "a");
        assert_eq!(edge.end(true).as_str(), "b");
        assert_eq!(edge.start(false).as_str(), "b");
        assert_eq!(edge.end(false).as_str(), "a");
    }

    #[test]
    fn test_edges_from_reports_direction() {
        let mut map = GameMap::new();
        for n in [node("a", 1, 50.0), node("b", 0, 20.0), node("c", 0, 20.0)] {
            map.nodes.insert(n.id.clone(), n);
        }
        for (id, a, b) in [("ab", "a", "b"), ("ca", "c", "a"), ("bc", "b", "c")] {
            map.edges.insert(
                id.into(),
                Edge {
                    id: id.into(),
                    node_a: a.into(),
                    node_b: b.into(),
                },
            );
        }

        let from_a = map.edges_from(&"a".into());
        assert_eq!(
            from_a,
            vec![(EdgeId::from("ab"), true), (EdgeId::from("ca"), false)]
        );
    }

    #[test]
    fn test_team_mass_and_active_teams() {
        let mut map = GameMap::new();
        for n in [node("a", 1, 50.0), node("b", 0, 20.0), node("c", 2, 30.0)] {
            map.nodes.insert(n.id.clone(), n);
        }
        map.blobs.insert(
            "x".into(),
            Blob {
                id: "x".into(),
                edge: "e".into(),
                a_to_b: true,
                progress: 0.5,
                team: 1,
                mass: 5.0,
            },
        );

        assert_eq!(map.team_mass(1), 55.0);
        assert_eq!(map.team_mass(NEUTRAL_TEAM), 20.0);
        assert_eq!(map.total_mass(), 105.0);
        assert_eq!(map.active_teams().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_missing_lookups_are_errors() {
        let map = GameMap::new();
        assert_eq!(
            map.node(&"n".into()),
            Err(SimError::UnknownNode("n".into()))
        );
        assert!(map.edge(&"e".into()).is_err());
        assert!(map.blob(&"b".into()).is_err());
    }
}
