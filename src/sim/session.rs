//! Reference single-writer driver
//!
//! A `Session` owns the authoritative map and is the only thing that writes
//! to it. Commands are queued and processed at tick boundaries, growth
//! timers fire on simulated time, and every delta is committed before the
//! next one is computed.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::command::{click, grow};
use super::error::SimError;
use super::mapgen::generate_map;
use super::state::{EdgeId, GameMap, IdGen, NodeId, Team};
use super::tick::step;
use super::update::{MapUpdate, apply_updates};
use crate::consts::STEP_INTERVAL_MS;
use crate::settings::SessionSettings;

/// A player action delivered by the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Launch a blob from the start node of `edge`
    #[serde(rename_all = "camelCase")]
    Launch {
        edge: EdgeId,
        a_to_b: bool,
        team: Team,
    },
}

pub struct Session {
    settings: SessionSettings,
    map: GameMap,
    ids: IdGen,
    pending: VecDeque<Command>,
    /// Simulated ms until each node grows next
    grow_timers: BTreeMap<NodeId, f32>,
    accumulator_ms: f32,
    ticks: u64,
    elapsed_ms: f64,
    announced_end: bool,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Result<Self, SimError> {
        let mut ids = IdGen::new(settings.seed);
        let map = generate_map(settings.player_count, &mut ids)?;
        let grow_timers = map
            .nodes
            .values()
            .map(|n| (n.id.clone(), n.grow_interval_ms as f32))
            .collect();

        log::info!(
            "Session started: seed {}, {} players, x{} speed",
            settings.seed,
            settings.player_count,
            settings.multiplier
        );

        Ok(Self {
            settings,
            map,
            ids,
            pending: VecDeque::new(),
            grow_timers,
            accumulator_ms: 0.0,
            ticks: 0,
            elapsed_ms: 0.0,
            announced_end: false,
        })
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time so far
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Queue a command for the next tick.
    ///
    /// Commands naming an edge that does not exist are refused here, so a
    /// bad client cannot fail a tick later.
    pub fn submit(&mut self, command: Command) -> Result<(), SimError> {
        match &command {
            Command::Launch { edge, .. } => {
                self.map.edge(edge)?;
            }
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Advance by `elapsed_ms` of wall time, running whole ticks only.
    ///
    /// At most `max_substeps` ticks run per call; time beyond that is
    /// dropped. Returns the non-empty deltas committed, in order.
    pub fn advance(&mut self, elapsed_ms: f32) -> Result<Vec<MapUpdate>, SimError> {
        let max_ms = STEP_INTERVAL_MS * self.settings.max_substeps as f32;
        self.accumulator_ms = (self.accumulator_ms + elapsed_ms.max(0.0)).min(max_ms);

        let mut committed = Vec::new();
        while self.accumulator_ms >= STEP_INTERVAL_MS {
            self.tick(&mut committed)?;
            self.accumulator_ms -= STEP_INTERVAL_MS;
        }

        if !self.announced_end && self.is_over() {
            self.announced_end = true;
            match self.winner() {
                Some(team) => log::info!("Team {} wins after {} ticks", team, self.ticks),
                None => log::info!("Session timed out after {} ticks", self.ticks),
            }
        }

        Ok(committed)
    }

    /// Run exactly one tick: queued commands, due growth, then the step
    pub fn tick(&mut self, committed: &mut Vec<MapUpdate>) -> Result<(), SimError> {
        while let Some(command) = self.pending.pop_front() {
            let update = match command {
                Command::Launch { edge, a_to_b, team } => {
                    click(&self.map, &edge, a_to_b, team, &mut self.ids)?
                }
            };
            self.commit(update, committed)?;
        }

        let sim_ms = self.settings.tick_sim_ms();
        let mut due = Vec::new();
        for (id, remaining) in self.grow_timers.iter_mut() {
            let node = self.map.node(id)?;
            let interval = (node.grow_interval_ms as f32).max(STEP_INTERVAL_MS);
            *remaining -= sim_ms;
            while *remaining <= 0.0 {
                due.push((id.clone(), node.grow_mass));
                *remaining += interval;
            }
        }
        for (id, amount) in due {
            let update = grow(&self.map, &id, amount)?;
            self.commit(update, committed)?;
        }

        let update = step(&self.map, self.settings.multiplier)?;
        self.commit(update, committed)?;

        self.ticks += 1;
        self.elapsed_ms += f64::from(sim_ms);
        Ok(())
    }

    fn commit(
        &mut self,
        update: MapUpdate,
        committed: &mut Vec<MapUpdate>,
    ) -> Result<(), SimError> {
        if update.is_empty() {
            return Ok(());
        }
        self.map = apply_updates(&self.map, std::slice::from_ref(&update))?;
        committed.push(update);
        Ok(())
    }

    /// The only player team left holding nodes or blobs
    pub fn winner(&self) -> Option<Team> {
        let teams = self.map.active_teams();
        match (teams.len(), teams.first()) {
            (1, Some(&team)) => Some(team),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.elapsed_ms >= self.settings.instance_timeout_ms as f64
    }
}
