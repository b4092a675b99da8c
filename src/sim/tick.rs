//! Fixed timestep simulation step
//!
//! `step` advances every blob by one nominal tick, then resolves collisions
//! against the moved snapshot. Resolution runs on a scratch arena of blob
//! and node records that is dropped at the end; the returned delta is the
//! difference between the arena and the moved snapshot.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::{ArrivalOutcome, overlaps, resolve_arrival, resolve_duel};
use super::error::SimError;
use super::geometry::blob_pos;
use super::state::{Blob, BlobId, EdgeId, GameMap, Node, NodeId};
use super::update::{BlobUpdate, MapUpdate, NodeUpdate, apply_updates};
use crate::consts::*;

/// Progress gained per tick by a blob of the given mass.
///
/// Heavier blobs are dragged: a blob at MAX_MASS covers 2/3 of the base
/// increment per tick, a near-weightless one twice the base increment.
#[inline]
pub fn progress_increment(mass: f32, multiplier: f32) -> f32 {
    let increment = (multiplier * (STEP_INTERVAL_MS / 1000.0)) / EDGE_TRAVEL_DURATION_S;
    let drag = (mass + MAX_MASS / 2.0) / MAX_MASS;
    increment / drag
}

/// Move phase: new progress for every blob. Progress is not capped at 1.
pub fn move_blobs(map: &GameMap, multiplier: f32) -> MapUpdate {
    MapUpdate {
        updated_blobs: map
            .blobs
            .values()
            .map(|b| {
                BlobUpdate::progress(
                    b.id.clone(),
                    b.progress + progress_increment(b.mass, multiplier),
                )
            })
            .collect(),
        ..Default::default()
    }
}

/// Working record of a blob during collision resolution
#[derive(Debug, Clone)]
struct Body {
    blob: Blob,
    pos: Vec2,
}

/// Advance the map by one tick scaled by `multiplier`.
///
/// Phases run strictly in order: move, snapshot, index, collide. A blob
/// that reaches its destination node this tick does not also duel.
pub fn step(map: &GameMap, multiplier: f32) -> Result<MapUpdate, SimError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(SimError::InvalidMultiplier(multiplier));
    }

    let mut update = move_blobs(map, multiplier);
    let moved = apply_updates(map, std::slice::from_ref(&update))?;

    // Index the moved snapshot
    let mut arena: BTreeMap<BlobId, Body> = BTreeMap::new();
    let mut on_edge: BTreeMap<EdgeId, Vec<BlobId>> = BTreeMap::new();
    for blob in moved.blobs.values() {
        let pos = blob_pos(&moved, &blob.id, None)?;
        on_edge
            .entry(blob.edge.clone())
            .or_default()
            .push(blob.id.clone());
        arena.insert(
            blob.id.clone(),
            Body {
                blob: blob.clone(),
                pos,
            },
        );
    }
    let mut nodes: BTreeMap<NodeId, Node> = moved.nodes.clone();

    // Ids are fixed up front; bodies removed mid-loop are skipped
    let order: Vec<BlobId> = arena.keys().cloned().collect();
    for id in &order {
        let Some(body) = arena.get(id) else {
            continue;
        };
        if !body.blob.is_alive() {
            arena.remove(id);
            continue;
        }

        let end_id = moved.edge(&body.blob.edge)?.end(body.blob.a_to_b);
        let node = nodes
            .get_mut(end_id)
            .ok_or_else(|| SimError::UnknownNode(end_id.clone()))?;

        // Overshooting the end counts as arriving, however large the tick
        let arrived = body.blob.progress >= 1.0
            || overlaps(body.pos, body.blob.mass, node.pos, node.mass);
        if arrived {
            match resolve_arrival(&body.blob, node) {
                ArrivalOutcome::Captured { previous_team } => log::debug!(
                    "Node {} captured by team {} from team {}",
                    node.id,
                    node.team,
                    previous_team
                ),
                outcome => log::debug!(
                    "Blob {} reached node {}: {:?}, node mass {}",
                    id,
                    node.id,
                    outcome,
                    node.mass
                ),
            }
            arena.remove(id);
            continue;
        }

        let Some(rivals) = on_edge.get(&body.blob.edge) else {
            continue;
        };
        for other_id in rivals {
            if other_id == id {
                continue;
            }
            // This blob may have lost an earlier duel
            let Some(body) = arena.get(id) else {
                break;
            };
            let Some(other) = arena.get(other_id) else {
                continue;
            };
            if !other.blob.is_alive() || !body.blob.is_alive() {
                continue;
            }
            if !overlaps(body.pos, body.blob.mass, other.pos, other.blob.mass) {
                continue;
            }

            let mut blob = body.blob.clone();
            let mut rival = other.blob.clone();
            let outcome = resolve_duel(&mut blob, &mut rival);
            log::debug!(
                "Blobs {} and {} collided ({}): {} survives",
                id,
                other_id,
                if outcome.merged { "merge" } else { "fight" },
                outcome.survivor
            );

            for resolved in [blob, rival] {
                if let Some(slot) = arena.get_mut(&resolved.id) {
                    slot.blob = resolved;
                }
            }
            arena.remove(&outcome.destroyed);
            if arena
                .get(&outcome.survivor)
                .is_some_and(|b| !b.blob.is_alive())
            {
                arena.remove(&outcome.survivor);
            }
        }
    }

    // Diff the arena against the moved snapshot
    for (id, before) in &moved.blobs {
        match arena.get(id) {
            None => update.deleted_blobs.push(id.clone()),
            Some(body) if body.blob.mass != before.mass => update
                .updated_blobs
                .push(BlobUpdate::mass(id.clone(), body.blob.mass)),
            Some(_) => {}
        }
    }
    for (id, after) in &nodes {
        let before = moved.node(id)?;
        if after.mass != before.mass || after.team != before.team {
            update.updated_nodes.push(NodeUpdate {
                id: id.clone(),
                mass: after.mass,
                team: Some(after.team),
            });
        }
    }

    log::trace!(
        "Step x{}: {} blobs, {} removed, {} nodes changed",
        multiplier,
        moved.blobs.len(),
        update.deleted_blobs.len(),
        update.updated_nodes.len()
    );

    Ok(update)
}
