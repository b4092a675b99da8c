//! Player commands and timer events
//!
//! Both are pure: they read a map snapshot and describe their effect as a
//! `MapUpdate` for the caller to apply.

use super::error::SimError;
use super::state::{Blob, EdgeId, GameMap, IdGen, NodeId, Team};
use super::update::{MapUpdate, NodeUpdate};
use crate::consts::{MAX_MASS, MIN_LAUNCH_MASS};

/// Launch half of a node's mass along an edge.
///
/// The start node is the edge's A end when `a_to_b` is set, its B end
/// otherwise. If `team` does not own that node, or the node holds less than
/// MIN_LAUNCH_MASS, the launch is rejected and the returned update is empty.
pub fn click(
    map: &GameMap,
    edge: &EdgeId,
    a_to_b: bool,
    team: Team,
    ids: &mut IdGen,
) -> Result<MapUpdate, SimError> {
    let start = map.node(map.edge(edge)?.start(a_to_b))?;
    if start.team != team || start.mass < MIN_LAUNCH_MASS {
        log::debug!(
            "Rejected launch by team {} from node {} (owner {}, mass {})",
            team,
            start.id,
            start.team,
            start.mass
        );
        return Ok(MapUpdate::new());
    }

    let half = start.mass / 2.0;
    let blob = Blob {
        id: ids.blob_id(),
        edge: edge.clone(),
        a_to_b,
        progress: 0.0,
        team,
        mass: half,
    };

    Ok(MapUpdate {
        created_blobs: vec![blob],
        updated_nodes: vec![NodeUpdate {
            id: start.id.clone(),
            mass: half,
            team: None,
        }],
        ..Default::default()
    })
}

/// Add `grow_mass` to a node, up to MAX_MASS.
///
/// Growth is driven by an external per-node timer; this only computes the
/// resulting update.
pub fn grow(map: &GameMap, node: &NodeId, grow_mass: f32) -> Result<MapUpdate, SimError> {
    if !grow_mass.is_finite() || grow_mass < 0.0 {
        return Err(SimError::InvalidGrowMass(grow_mass));
    }
    let node = map.node(node)?;

    Ok(MapUpdate {
        updated_nodes: vec![NodeUpdate {
            id: node.id.clone(),
            mass: (node.mass + grow_mass).min(MAX_MASS),
            team: None,
        }],
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mapgen::generate_map;
    use crate::sim::state::{NEUTRAL_TEAM, Node};
    use crate::sim::update::apply_updates;
    use proptest::prelude::*;

    /// A generated map plus an edge launching from team 1's start node
    fn setup() -> (GameMap, EdgeId, bool, NodeId) {
        let map = generate_map(2, &mut IdGen::new(9)).unwrap();
        let start = map.nodes.values().find(|n| n.team == 1).unwrap().id.clone();
        let (edge, a_to_b) = map.edges_from(&start)[0].clone();
        (map, edge, a_to_b, start)
    }

    fn with_node(map: &GameMap, id: &NodeId, f: impl FnOnce(&mut Node)) -> GameMap {
        let mut map = map.clone();
        f(map.nodes.get_mut(id).unwrap());
        map
    }

    #[test]
    fn test_launch_splits_mass() {
        let (map, edge, a_to_b, start) = setup();
        let update = click(&map, &edge, a_to_b, 1, &mut IdGen::new(1)).unwrap();

        assert_eq!(update.created_blobs.len(), 1);
        let blob = &update.created_blobs[0];
        assert_eq!(blob.mass, 25.0);
        assert_eq!(blob.team, 1);
        assert_eq!(blob.progress, 0.0);
        assert_eq!(blob.edge, edge);
        assert_eq!(blob.a_to_b, a_to_b);
        assert_eq!(
            update.updated_nodes,
            vec![NodeUpdate {
                id: start.clone(),
                mass: 25.0,
                team: None
            }]
        );

        let next = apply_updates(&map, &[update]).unwrap();
        assert_eq!(next.nodes[&start].mass, 25.0);
        assert_eq!(next.team_mass(1), map.team_mass(1));
    }

    #[test]
    fn test_launch_rejected_for_wrong_team() {
        let (map, edge, a_to_b, _) = setup();
        let update = click(&map, &edge, a_to_b, 2, &mut IdGen::new(1)).unwrap();
        assert!(update.is_empty());
        let update = click(&map, &edge, a_to_b, NEUTRAL_TEAM, &mut IdGen::new(1)).unwrap();
        assert!(update.created_blobs.is_empty());
    }

    #[test]
    fn test_launch_rejected_below_threshold() {
        let (map, edge, a_to_b, start) = setup();
        let map = with_node(&map, &start, |n| n.mass = 4.99);
        assert!(click(&map, &edge, a_to_b, 1, &mut IdGen::new(1)).unwrap().is_empty());

        let map = with_node(&map, &start, |n| n.mass = MIN_LAUNCH_MASS);
        let update = click(&map, &edge, a_to_b, 1, &mut IdGen::new(1)).unwrap();
        assert_eq!(update.created_blobs[0].mass, 2.5);
    }

    #[test]
    fn test_launch_on_unknown_edge() {
        let (map, ..) = setup();
        assert_eq!(
            click(&map, &"nope".into(), true, 1, &mut IdGen::new(1)),
            Err(SimError::UnknownEdge("nope".into()))
        );
    }

    #[test]
    fn test_grow_clamps() {
        let (map, _, _, start) = setup();
        let update = grow(&map, &start, 10.0).unwrap();
        assert_eq!(update.updated_nodes[0].mass, 60.0);

        let map = with_node(&map, &start, |n| n.mass = 95.0);
        let update = grow(&map, &start, 10.0).unwrap();
        assert_eq!(update.updated_nodes[0].mass, MAX_MASS);
        assert_eq!(update.updated_nodes[0].team, None);
    }

    #[test]
    fn test_grow_rejects_bad_input() {
        let (map, _, _, start) = setup();
        assert_eq!(
            grow(&map, &"nope".into(), 10.0),
            Err(SimError::UnknownNode("nope".into()))
        );
        assert!(grow(&map, &start, -1.0).is_err());
        assert!(grow(&map, &start, f32::INFINITY).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn launch_conserves_mass(mass in MIN_LAUNCH_MASS..MAX_MASS) {
            let (map, edge, a_to_b, start) = setup();
            let map = with_node(&map, &start, |n| n.mass = mass);
            let update = click(&map, &edge, a_to_b, 1, &mut IdGen::new(1)).unwrap();
            let launched = update.created_blobs[0].mass;
            let kept = update.updated_nodes[0].mass;
            prop_assert_eq!(launched, mass / 2.0);
            prop_assert_eq!(launched + kept, mass);
        }
    }
}
