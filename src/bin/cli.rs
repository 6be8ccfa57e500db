//! Runs a battle from a setup file with seeded random move choices, or replays a
//! recorded history.

use anyhow::{bail, Context, Result};
use battle_hooks::core::log::TracingSink;
use battle_hooks::{replay_battle, Action, Battle, BattleHistory, BattleOptions, BattleSetup, Catalog, Dex};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "battle-cli", about = "Drive a singles battle through the effect hook engine")]
struct Args {
    /// Team setup (YAML).
    #[arg(long, default_value = "data/demo_battle.yaml")]
    setup: PathBuf,

    /// Battle options (YAML). Missing keys use the defaults.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Overrides the seed from the options file and BATTLE_SEED.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many turns.
    #[arg(long, default_value_t = 50)]
    turns: u32,

    /// Write the recorded history as JSON.
    #[arg(long)]
    history_out: Option<PathBuf>,

    /// Replay a recorded history instead of playing.
    #[arg(long, conflicts_with = "history_out")]
    replay: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (catalog, report) = Catalog::load_default();
    for rejected in &report.rejected {
        warn!(%rejected, "content rejected");
    }
    let catalog = Arc::new(catalog);
    let dex = Arc::new(Dex::load_default().context("loading game data")?);

    if let Some(path) = &args.replay {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let history: BattleHistory = serde_json::from_str(&text).context("parsing history")?;
        let battle = replay_battle(catalog, dex, &history)?;
        print_log(&battle);
        return Ok(());
    }

    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            BattleOptions::from_yaml_str(&text).context("parsing battle options")?
        }
        None => BattleOptions::default(),
    };
    if let Ok(seed) = std::env::var("BATTLE_SEED") {
        options.seed = seed.parse().context("BATTLE_SEED must be an integer")?;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }

    let text = fs::read_to_string(&args.setup).with_context(|| format!("reading {}", args.setup.display()))?;
    let setup = BattleSetup::from_yaml_str(&text).context("parsing battle setup")?;

    let mut chooser = StdRng::seed_from_u64(options.seed.wrapping_add(1));
    let mut battle = Battle::new(catalog, dex, setup, options)?;
    battle.log.set_sink(Box::new(TracingSink));
    battle.start()?;
    while !battle.is_over() && battle.turn < args.turns {
        let actions = choose_actions(&battle, &mut chooser);
        if actions.is_empty() {
            bail!("no side has a usable move");
        }
        if let Err(err) = battle.run_turn(&actions) {
            warn!(%err, "turn failed");
            break;
        }
    }

    print_log(&battle);
    if let Some(summary) = battle.abort_summary() {
        println!("{}", summary);
    }
    match battle.winner {
        Some(side) => info!(winner = %battle.sides[side].name, turn = battle.turn, "finished"),
        None => info!(turn = battle.turn, "stopped without a winner"),
    }

    if let (Some(path), Some(history)) = (&args.history_out, &battle.history) {
        let json = serde_json::to_string_pretty(history)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn choose_actions(battle: &Battle, rng: &mut StdRng) -> Vec<Action> {
    battle
        .sides
        .iter()
        .filter_map(|side| {
            let active = battle.participant(side.active?).ok()?;
            let move_id = active.moves.choose(rng)?;
            Some(Action::use_move(side.index, move_id))
        })
        .collect()
}

fn print_log(battle: &Battle) {
    for line in battle.log_lines() {
        println!("{}", line);
    }
}
