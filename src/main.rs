//! Plays one automated game of Coup from a TOML config.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coup_court::record::CsvRecorder;
use coup_court::store::JsonFileStore;
use coup_court::{EngineConfig, Game, LogKind, RandomPolicy, Session};
use rand::SeedableRng;
use rand_pcg::Pcg64;

#[derive(Parser, Debug)]
#[command(name = "coup-court", about = "Plays a game of Coup between automated seats")]
struct Cli {
    /// Path to the engine config, created with defaults if missing
    #[arg(long, default_value = "coup-court.toml")]
    config: PathBuf,

    /// Overrides the seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Session id the game is saved under
    #[arg(long, default_value = "local")]
    session: String,

    /// Stop after this many moves even if nobody has won
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Save the final state and append the result to the results file
    #[arg(long)]
    persist: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.debug { "debug" } else { "coup_court=info,warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .init();

    let cfg = EngineConfig::load_or_create(&cli.config)
        .with_context(|| format!("loading or creating config '{}'", cli.config.display()))?;

    let seed = cli.seed.or(cfg.seed).unwrap_or_else(rand::random);
    tracing::info!(config = %cli.config.display(), seed, seats = cfg.seats.len());

    let mut rng = Pcg64::seed_from_u64(seed);
    let game = Game::new(&cfg.seats, cfg.starting_coins, &mut rng).context("setting up the table")?;

    // every seat, the human one included, is played by the same random policy here
    let mut policy = RandomPolicy::new(Pcg64::seed_from_u64(seed.wrapping_add(1)));
    let mut session = Session::new(cli.session.clone(), game, rng, cfg.log_window);
    let steps = session.run_to_completion(&mut policy, cli.max_steps);

    for entry in session.game().log_entries() {
        let marker = match entry.kind {
            LogKind::Info => " ",
            LogKind::Alert => "!",
            LogKind::Success => "*",
            LogKind::Danger => "x",
        };
        println!("[T{:>3}] {marker} {}", entry.turn, entry.text);
    }

    match session.game().winner() {
        Some(winner) => {
            let name = session.game().players()[winner].name();
            println!("game over after {steps} moves, winner is {name}");
        }
        None => println!("no winner after {steps} moves"),
    }

    if cli.persist {
        let mut store = JsonFileStore::new(cfg.data_dir.join("sessions"));
        session
            .save(&mut store)
            .with_context(|| format!("saving session '{}'", cli.session))?;

        if let Some(human) = cfg.human_seat() {
            let mut recorder = CsvRecorder::new(cfg.data_dir.join("results.csv"));
            // best effort, a lost result is not worth failing the run over
            if let Err(err) = session.report(&mut recorder, human) {
                tracing::warn!(%err, "could not record result");
            }
        }
    }

    Ok(())
}
