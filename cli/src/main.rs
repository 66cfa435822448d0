use bombbroom_core::{CellCount, Dimension, GameEngine};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use events::{Announcer, EventLog};
use settings::Settings;

mod events;
mod game;
mod settings;

#[derive(Parser, Debug)]
#[command(version, about = "Play minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board width in tiles
    #[arg(long)]
    width: Option<Dimension>,

    /// Board height in tiles
    #[arg(long)]
    height: Option<Dimension>,

    /// Number of mines, must leave at least one empty tile
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file with default settings, flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write every game event as a JSON line to stderr
    #[arg(long)]
    events: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            width: self.width,
            height: self.height,
            mines: self.mines,
            seed: self.seed,
            events: self.events.then_some(true),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let file_settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let settings = file_settings.overridden_by(args.settings());
    log::debug!("settings: {:?}", settings);

    let config = settings.game_config()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "{}x{} board with {} mines, seed: {}",
        config.width(),
        config.height(),
        config.mines(),
        seed
    );

    let mut engine = GameEngine::with_seed(config, seed);
    let announcer = Rc::new(Announcer::default());
    engine.add_observer(&announcer);
    let event_log = settings
        .events
        .unwrap_or(false)
        .then(|| Rc::new(EventLog::new(io::stderr())));
    if let Some(event_log) = &event_log {
        engine.add_observer(event_log);
    }

    game::run(&mut engine, &announcer, io::stdin().lock(), io::stdout().lock())
}
