//! Map deltas and the delta applier
//!
//! Commands and the step engine never touch the map. They describe their
//! effect as a `MapUpdate`, and `apply_updates` folds a batch of those into a
//! fresh map.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::state::{Blob, BlobId, GameMap, NodeId, Team};
use crate::clamp_mass;

/// Partial blob record; `None` fields are left as they are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobUpdate {
    pub id: BlobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

impl BlobUpdate {
    pub fn progress(id: BlobId, progress: f32) -> Self {
        Self {
            id,
            progress: Some(progress),
            mass: None,
            team: None,
        }
    }

    pub fn mass(id: BlobId, mass: f32) -> Self {
        Self {
            id,
            progress: None,
            mass: Some(mass),
            team: None,
        }
    }

    fn apply_to(&self, blob: &mut Blob) {
        if let Some(progress) = self.progress {
            blob.progress = progress;
        }
        if let Some(mass) = self.mass {
            blob.mass = mass;
        }
        if let Some(team) = self.team {
            blob.team = team;
        }
    }
}

/// Node mass update, optionally changing ownership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    pub id: NodeId,
    pub mass: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

/// A description of created, updated and deleted entities.
///
/// Empty lists mean "nothing of this kind". A command that was rejected
/// returns an entirely empty update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapUpdate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created_blobs: Vec<Blob>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated_blobs: Vec<BlobUpdate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_blobs: Vec<BlobId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated_nodes: Vec<NodeUpdate>,
}

impl MapUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.created_blobs.is_empty()
            && self.updated_blobs.is_empty()
            && self.deleted_blobs.is_empty()
            && self.updated_nodes.is_empty()
    }

    /// Append every list of `other` to the matching list of `self`
    pub fn extend(&mut self, other: MapUpdate) {
        self.created_blobs.extend(other.created_blobs);
        self.updated_blobs.extend(other.updated_blobs);
        self.deleted_blobs.extend(other.deleted_blobs);
        self.updated_nodes.extend(other.updated_nodes);
    }

    /// Concatenate deltas field by field, preserving input order
    pub fn concat<'a>(updates: impl IntoIterator<Item = &'a MapUpdate>) -> MapUpdate {
        let mut total = MapUpdate::new();
        for update in updates {
            total.extend(update.clone());
        }
        total
    }
}

/// Merge a batch of deltas into `map`, producing a new map.
///
/// The batch is concatenated first, then applied in a fixed order: created
/// blobs, surviving pre-existing blobs, deletions, blob updates, node
/// updates. Later entries win per field. Edges pass through unchanged.
///
/// Updates or deletions aimed at a blob deleted earlier in the same batch
/// are ignored. Any other reference to an id missing from the map is an
/// error.
pub fn apply_updates(map: &GameMap, updates: &[MapUpdate]) -> Result<GameMap, SimError> {
    let update = MapUpdate::concat(updates);

    let mut blobs = map.blobs.clone();
    for created in &update.created_blobs {
        if !map.edges.contains_key(&created.edge) {
            return Err(SimError::UnknownEdge(created.edge.clone()));
        }
        if blobs.insert(created.id.clone(), created.clone()).is_some() {
            return Err(SimError::DuplicateBlob(created.id.clone()));
        }
    }

    let mut deleted = BTreeSet::new();
    for id in &update.deleted_blobs {
        if blobs.remove(id).is_some() {
            deleted.insert(id);
        } else if !deleted.contains(id) {
            return Err(SimError::UnknownBlob(id.clone()));
        }
    }

    for blob_update in &update.updated_blobs {
        match blobs.get_mut(&blob_update.id) {
            Some(blob) => blob_update.apply_to(blob),
            None if deleted.contains(&blob_update.id) => {}
            None => return Err(SimError::UnknownBlob(blob_update.id.clone())),
        }
    }

    let mut nodes = map.nodes.clone();
    for node_update in &update.updated_nodes {
        let node = nodes
            .get_mut(&node_update.id)
            .ok_or_else(|| SimError::UnknownNode(node_update.id.clone()))?;
        node.mass = clamp_mass(node_update.mass);
        if let Some(team) = node_update.team {
            node.team = team;
        }
    }

    Ok(GameMap {
        nodes,
        edges: map.edges.clone(),
        blobs,
    })
}
