//! Geometry helpers for blobs travelling along straight edges
//!
//! A blob's position is never stored. It is interpolated between the
//! endpoints of its edge from the blob's progress.

use glam::Vec2;

use super::error::SimError;
use super::state::{BlobId, GameMap, Node};
use crate::consts::{MAX_MASS, RADIUS_SCALE};

/// Collision radius of a body of the given mass
#[inline]
pub fn mass_to_radius(mass: f32) -> f32 {
    (mass / MAX_MASS) * RADIUS_SCALE
}

/// Euclidean distance between two points
#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Snapshot of the node a blob departed from
pub fn start_node(map: &GameMap, blob: &BlobId) -> Result<Node, SimError> {
    let blob = map.blob(blob)?;
    let edge = map.edge(&blob.edge)?;
    map.node(edge.start(blob.a_to_b)).cloned()
}

/// Snapshot of the node a blob is heading to
pub fn end_node(map: &GameMap, blob: &BlobId) -> Result<Node, SimError> {
    let blob = map.blob(blob)?;
    let edge = map.edge(&blob.edge)?;
    map.node(edge.end(blob.a_to_b)).cloned()
}

/// World position of a blob, optionally at a progress other than its own
pub fn blob_pos(map: &GameMap, blob: &BlobId, progress: Option<f32>) -> Result<Vec2, SimError> {
    let b = map.blob(blob)?;
    let start = start_node(map, blob)?;
    let end = end_node(map, blob)?;
    Ok(start.pos.lerp(end.pos, progress.unwrap_or(b.progress)))
}
