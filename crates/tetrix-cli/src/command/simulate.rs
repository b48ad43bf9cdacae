use std::path::PathBuf;

use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use tetrix_engine::{EngineConfig, GameEngine, ShapeSeed};

use crate::{
    driver::{self, GameSummary, RandomPlayer},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the whole run as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<ShapeSeed>,
    /// Engine configuration JSON file (defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Commands to run per game before giving up on it
    #[arg(long, default_value_t = 100_000)]
    max_steps: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: ShapeSeed,
    config: EngineConfig,
    games: Vec<GameSummary>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        config,
        games,
        max_steps,
        output,
    } = arg;

    let config = util::read_config_file(config.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut seeds = Pcg32::from_seed(seed.into());

    eprintln!("Simulating {games} games from seed {seed}...");
    let mut summaries = Vec::with_capacity(*games);
    for game in 0..*games {
        let game_seed: ShapeSeed = seeds.random();
        let mut engine = GameEngine::with_seed(config.clone(), game_seed)
            .context("Failed to create game engine")?;
        let mut player = RandomPlayer::new(player_rng(game_seed));
        let summary = driver::play_game(&mut engine, game_seed, &mut player, *max_steps);
        eprintln!(
            "Game {}: score {} at level {}, {} lines in {} steps{}",
            game + 1,
            summary.score,
            summary.level,
            summary.cleared_lines,
            summary.steps,
            if summary.game_over { "" } else { " (step limit)" },
        );
        summaries.push(summary);
    }

    let report = SimulationReport {
        seed,
        config,
        games: summaries,
    };
    util::write_json(&report, output.as_deref())?;

    Ok(())
}

/// Derives the player's input stream from a game seed, so a game replays
/// exactly from the seed in its summary.
fn player_rng(seed: ShapeSeed) -> Pcg32 {
    let bytes: [u8; 16] = seed.into();
    let mut state = [0; 8];
    state.copy_from_slice(&bytes[8..]);
    Pcg32::seed_from_u64(u64::from_le_bytes(state))
}
