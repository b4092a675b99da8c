//! Simulation errors
//!
//! Rejected player actions are not errors (they produce an empty delta).
//! These variants are invariant violations the caller must not ignore.

use super::state::{BlobId, EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Map generation needs at least one player.
    #[error("player count must be at least 1 (got {count})")]
    InvalidPlayerCount { count: u32 },

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("unknown blob {0}")]
    UnknownBlob(BlobId),

    /// A created blob reuses an id that is already live.
    #[error("blob {0} already exists")]
    DuplicateBlob(BlobId),

    #[error("step multiplier must be finite and positive (got {0})")]
    InvalidMultiplier(f32),

    #[error("grow mass must be finite and non-negative (got {0})")]
    InvalidGrowMass(f32),
}
