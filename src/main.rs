//! Blob Game headless runner
//!
//! Runs a session with scripted players and prints a JSON summary.
//!
//! Usage: `blob-game [player_count] [settings.json]`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use blob_game::consts::{MIN_LAUNCH_MASS, STEP_INTERVAL_MS};
use blob_game::{Command, GameMap, Session, SessionSettings, Team};

/// Ticks between two launches of a scripted player
const LAUNCH_EVERY_TICKS: u64 = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    ticks: u64,
    elapsed_ms: f64,
    winner: Option<Team>,
    team_mass: BTreeMap<Team, f32>,
    map: &'a GameMap,
}

/// Every owned node heavy enough to launch sends a blob along its first edge
fn scripted_commands(map: &GameMap, players: u32) -> Vec<Command> {
    map.nodes
        .values()
        .filter(|n| (1..=players).contains(&n.team) && n.mass >= MIN_LAUNCH_MASS)
        .filter_map(|n| {
            let (edge, a_to_b) = map.edges_from(&n.id).into_iter().next()?;
            Some(Command::Launch {
                edge,
                a_to_b,
                team: n.team,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let player_count = args
        .next()
        .map(|arg| arg.parse::<u32>())
        .transpose()
        .context("player count must be a positive integer")?;
    let mut settings = match args.next() {
        Some(path) => SessionSettings::load(&path)?,
        None => SessionSettings::default(),
    };
    if let Some(count) = player_count {
        settings.player_count = count;
    }
    settings.validate()?;

    log::info!("Blob Game (headless) starting...");
    let mut session = Session::new(settings)?;
    let players = session.settings().player_count;

    while !session.is_over() {
        if session.ticks() % LAUNCH_EVERY_TICKS == 0 {
            for command in scripted_commands(session.map(), players) {
                session.submit(command)?;
            }
        }
        session.advance(STEP_INTERVAL_MS)?;
    }

    let map = session.map();
    let summary = Summary {
        ticks: session.ticks(),
        elapsed_ms: session.elapsed_ms(),
        winner: session.winner(),
        team_mass: (1..=players).map(|team| (team, map.team_mass(team))).collect(),
        map,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
