//! Blob Game - authoritative simulation core for a node-and-blob territory game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map model, commands, step engine, deltas)
//! - `settings`: Configuration for the reference session driver

pub mod settings;
pub mod sim;

pub use settings::{SessionSettings, SettingsError};
pub use sim::{
    Blob, BlobId, Command, Edge, EdgeId, GameMap, IdGen, MapUpdate, Node, NodeId, Session,
    SimError, Team, apply_updates, click, generate_map, grow, step,
};

/// Game configuration constants
pub mod consts {
    /// Upper bound for node mass; also the reference mass for radius and drag
    pub const MAX_MASS: f32 = 100.0;
    /// Nominal simulated time covered by one `step` (multiplier 1)
    pub const STEP_INTERVAL_MS: f32 = 50.0;
    /// Time a weightless blob needs to cross an edge
    pub const EDGE_TRAVEL_DURATION_S: f32 = 2.0;
    /// Collision radius of a MAX_MASS body, in normalized map units
    pub const RADIUS_SCALE: f32 = 0.05;
    /// A node needs at least this much mass to launch a blob
    pub const MIN_LAUNCH_MASS: f32 = 5.0;

    /// Map generation
    pub const MIN_NODE_COUNT: u32 = 4;
    pub const PLAYER_START_MASS: f32 = 50.0;
    pub const NEUTRAL_START_MASS: f32 = 20.0;
    pub const GROW_INTERVAL_MS: u32 = 2000;
    pub const GROW_MASS: f32 = 10.0;

    /// Maximum ticks the session driver runs per `advance` call
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Default lifetime of a game session in simulated milliseconds (10 minutes)
    pub const INSTANCE_TIMEOUT_MS: u64 = 10 * 60 * 1000;
}

/// Clamp a node mass to the valid range `[0, MAX_MASS]`
#[inline]
pub fn clamp_mass(mass: f32) -> f32 {
    mass.clamp(0.0, consts::MAX_MASS)
}
