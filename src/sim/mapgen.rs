//! Initial map generation
//!
//! Nodes are spread over a half circle and joined into a single ring, so
//! every node is reachable from every start node.

use std::f32::consts::PI;

use glam::Vec2;

use super::error::SimError;
use super::state::{Edge, GameMap, IdGen, NEUTRAL_TEAM, Node, Team};
use crate::consts::*;

/// Generate the starting map for `player_count` players.
///
/// Produces `max(player_count, MIN_NODE_COUNT)` nodes. The first
/// `player_count` nodes are start nodes owned by teams `1..=player_count`;
/// the rest are neutral. Geometry is fully determined by `player_count`;
/// ids come from `ids`.
pub fn generate_map(player_count: u32, ids: &mut IdGen) -> Result<GameMap, SimError> {
    if player_count == 0 {
        return Err(SimError::InvalidPlayerCount {
            count: player_count,
        });
    }

    let node_count = player_count.max(MIN_NODE_COUNT);
    let mut map = GameMap::new();
    let mut ring = Vec::with_capacity(node_count as usize);

    for i in 0..node_count {
        let t = (i as f32 / player_count as f32) * PI;
        let pos = Vec2::new((t.sin() + 1.0) / 2.0, (t.cos() + 1.0) / 2.0);
        let is_start = i < player_count;

        let node = Node {
            id: ids.node_id(),
            team: if is_start { i as Team + 1 } else { NEUTRAL_TEAM },
            mass: if is_start {
                PLAYER_START_MASS
            } else {
                NEUTRAL_START_MASS
            },
            pos,
            grow_interval_ms: GROW_INTERVAL_MS,
            grow_mass: GROW_MASS,
        };
        ring.push(node.id.clone());
        map.nodes.insert(node.id.clone(), node);
    }

    for (i, node_a) in ring.iter().enumerate() {
        let node_b = &ring[(i + 1) % ring.len()];
        let edge = Edge {
            id: ids.edge_id(),
            node_a: node_a.clone(),
            node_b: node_b.clone(),
        };
        map.edges.insert(edge.id.clone(), edge);
    }

    log::info!(
        "Generated map for {} players: {} nodes, {} edges",
        player_count,
        map.nodes.len(),
        map.edges.len()
    );

    Ok(map)
}
