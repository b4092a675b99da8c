//! Deterministic simulation module
//!
//! All gameplay logic lives here. Every operation takes a map snapshot and
//! returns a delta or a new map; nothing mutates its input:
//! - Fixed timestep only (`step` advances one nominal tick times a multiplier)
//! - Seeded RNG only (ids come from `IdGen`)
//! - Stable iteration order (by entity ID)
//! - No rendering, transport or platform dependencies

pub mod collision;
pub mod command;
pub mod error;
pub mod geometry;
pub mod mapgen;
pub mod session;
pub mod state;
pub mod tick;
pub mod update;

pub use collision::{ArrivalOutcome, DuelOutcome, resolve_arrival, resolve_duel};
pub use command::{click, grow};
pub use error::SimError;
pub use geometry::{blob_pos, dist, end_node, mass_to_radius, start_node};
pub use mapgen::generate_map;
pub use session::{Command, Session};
pub use state::{Blob, BlobId, Edge, EdgeId, GameMap, IdGen, NEUTRAL_TEAM, Node, NodeId, Team};
pub use tick::{move_blobs, step};
pub use update::{BlobUpdate, MapUpdate, NodeUpdate, apply_updates};
