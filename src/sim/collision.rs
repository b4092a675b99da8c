//! Collision detection and response for blobs and nodes
//!
//! Bodies are circles whose radius scales with mass. Responses follow the
//! mass rules of the game: friendly mass merges, hostile mass cancels out.

use glam::Vec2;

use super::geometry::{dist, mass_to_radius};
use super::state::{Blob, BlobId, Node, Team};
use crate::clamp_mass;

/// Whether two bodies at the given positions and masses overlap
#[inline]
pub fn overlaps(a_pos: Vec2, a_mass: f32, b_pos: Vec2, b_mass: f32) -> bool {
    dist(a_pos, b_pos) < mass_to_radius(a_mass) + mass_to_radius(b_mass)
}

/// What a blob did to the node it reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// Friendly blob; its mass joined the node
    Reinforced,
    /// Hostile blob that was absorbed by the node's mass
    Damaged,
    /// Hostile blob that overran the node; ownership moved to the blob's team
    Captured { previous_team: Team },
}

/// Merge an arriving blob into its destination node.
///
/// Friendly mass adds up to MAX_MASS. Hostile mass is subtracted; if that
/// leaves the node below zero it changes hands and keeps the overflow as
/// its new mass.
pub fn resolve_arrival(blob: &Blob, node: &mut Node) -> ArrivalOutcome {
    if blob.team == node.team {
        node.mass = clamp_mass(node.mass + blob.mass);
        return ArrivalOutcome::Reinforced;
    }

    let remaining = node.mass - blob.mass;
    if remaining < 0.0 {
        let previous_team = node.team;
        node.team = blob.team;
        node.mass = clamp_mass(-remaining);
        ArrivalOutcome::Captured { previous_team }
    } else {
        node.mass = clamp_mass(remaining);
        ArrivalOutcome::Damaged
    }
}

/// Result of two blobs meeting on an edge
#[derive(Debug, Clone, PartialEq)]
pub struct DuelOutcome {
    pub survivor: BlobId,
    pub destroyed: BlobId,
    /// Same team: the blobs merged instead of fighting
    pub merged: bool,
}

/// Resolve a meeting between `blob` and `other`.
///
/// The heavier blob survives; on equal mass `other` does. Friendly blobs
/// merge. Against an enemy the survivor loses as much mass as the smaller
/// blob had, and the smaller blob is destroyed outright. The survivor's
/// mass is updated in place; the caller removes the destroyed blob (and the
/// survivor too if it was left with no mass).
pub fn resolve_duel(blob: &mut Blob, other: &mut Blob) -> DuelOutcome {
    let merged = blob.team == other.team;
    let (bigger, smaller) = if blob.mass > other.mass {
        (blob, other)
    } else {
        (other, blob)
    };

    if merged {
        bigger.mass += smaller.mass;
    } else {
        bigger.mass -= smaller.mass;
    }

    DuelOutcome {
        survivor: bigger.id.clone(),
        destroyed: smaller.id.clone(),
        merged,
    }
}
