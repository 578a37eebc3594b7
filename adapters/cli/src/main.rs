#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for playing tile-merge sessions in a terminal.

mod config;
mod input;
mod render;
mod session;
mod session_transfer;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use tilemerge_world::{query, World};

use crate::{
    config::Overrides,
    input::{parse_script, Input},
    render::render,
    session::{Reply, ResetPolicy, Session},
};

const WELCOME_BANNER: &str = "Tile merge: u/d/l/r to slide, n for a new game, q to quit.";

/// Command-line arguments accepted by the tile-merge binary.
#[derive(Debug, Parser)]
#[command(name = "tilemerge", about = "Slide and merge tiles on a 4x4 grid")]
struct Cli {
    /// Seed for the spawn generator; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a spawned tile is a 4.
    #[arg(long, value_name = "P")]
    four_probability: Option<f64>,

    /// When a new game may be started.
    #[arg(long, value_enum)]
    reset_policy: Option<ResetPolicy>,

    /// TOML file providing defaults for the flags above.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Session string produced by `--export` to continue from.
    #[arg(long, value_name = "SESSION")]
    resume: Option<String>,

    /// Moves to play instead of reading standard input, e.g. "llur".
    #[arg(long, value_name = "SCRIPT")]
    moves: Option<String>,

    /// Print a session string for `--resume` before exiting.
    #[arg(long)]
    export: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            four_probability: self.four_probability,
            reset_policy: self.reset_policy,
        }
    }
}

/// Entry point for the tile-merge command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => Overrides::load(path)?,
        None => Overrides::default(),
    };
    let settings = cli.overrides().or(file).resolve(rand::random::<u64>)?;
    info!(
        "starting session with seed {} and reset policy {:?}",
        settings.world.rng_seed(),
        settings.reset_policy
    );

    let world = match &cli.resume {
        Some(encoded) => {
            let snapshot =
                session_transfer::decode(encoded).context("failed to read --resume session")?;
            World::from_snapshot(snapshot, settings.world)
                .context("failed to resume session")?
        }
        None => World::new(settings.world),
    };
    let mut session = Session::new(world, settings.reset_policy);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{WELCOME_BANNER}")?;
    writeln!(out, "{}", render(session.world()))?;

    match &cli.moves {
        Some(script) => {
            for input in parse_script(script)? {
                if !step(&mut session, input, &mut out)? {
                    break;
                }
            }
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read standard input")?;
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Input>() {
                    Ok(input) => {
                        if !step(&mut session, input, &mut out)? {
                            break;
                        }
                    }
                    Err(error) => writeln!(out, "{error}")?,
                }
            }
        }
    }

    if cli.export {
        let encoded = session_transfer::encode(&query::snapshot(session.world()))?;
        writeln!(out, "{encoded}")?;
    }
    Ok(())
}

/// Handles one input and prints the reply. Returns `false` once the player quits.
fn step(session: &mut Session, input: Input, out: &mut impl Write) -> Result<bool> {
    let reply = session.handle(input);
    writeln!(out, "{reply}")?;
    if reply == Reply::Quit {
        return Ok(false);
    }
    writeln!(out, "{}", render(session.world()))?;
    Ok(true)
}
