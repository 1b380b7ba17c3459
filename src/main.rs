use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use structopt::StructOpt;

use star_catcher::{
    autopilot,
    config::GameConfig,
    entities::CharacterSet,
    event_dispatch::{Dispatcher, Message, MessageHandler},
    state::{app_state::AppState, events::Event, game_state::GameSession},
};

// ---------------------------------------------------------------------------------------------------------------------

#[derive(StructOpt, Debug)]
#[structopt(name = "star_catcher", about = "Headless star collecting platformer")]
struct Options {
    /// TOML config file
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Directory to load assets from; nominal sizes are used when absent
    #[structopt(long, parse(from_os_str))]
    assets: Option<PathBuf>,

    /// Character variant, "bones" or "dude"
    #[structopt(long)]
    character: Option<CharacterSet>,

    /// Seed for the random source
    #[structopt(long)]
    seed: Option<u64>,

    /// Number of frames to run
    #[structopt(long, default_value = "3600")]
    frames: u64,

    /// Don't drive the player; it stands still
    #[structopt(long)]
    idle: bool,

    /// Verbose logging, and log physics separations
    #[structopt(short, long)]
    debug: bool,
}

// ---------------------------------------------------------------------------------------------------------------------

/// Counts session notifications for the run summary.
#[derive(Debug, Default)]
struct Tally {
    score: u32,
    replenishes: u32,
    bombs: u32,
    game_over: bool,
}

impl MessageHandler for Tally {
    fn handle_message(&mut self, message: &Message) {
        match message.event {
            Event::ScoreChanged { score } => self.score = score,
            Event::StarsReplenished { .. } => self.replenishes += 1,
            Event::HazardSpawned { .. } => self.bombs += 1,
            Event::GameOver { score } => {
                self.score = score;
                self.game_over = true;
            }
            Event::Overlap { .. } => {}
        }
    }
}

fn main() -> Result<()> {
    let opt = Options::from_args();
    let filter = if opt.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = match &opt.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Unable to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(character) = opt.character {
        config.character = character;
    }
    if opt.debug {
        config.physics.debug = true;
    }

    let seed = opt.seed.unwrap_or_else(rand::random);
    info!("Using seed {} and character \"{}\"", seed, config.character);

    let session = GameSession::new(&config, StdRng::seed_from_u64(seed));
    let mut app = AppState::new(&config, session, opt.assets.as_deref())?;
    let dt = config.timestep();
    let mut tally = Tally::default();

    while app.frame() < opt.frames {
        if !opt.idle {
            if let Some(handles) = app.scene.handles() {
                autopilot::steer(&app.world, handles).apply(&mut app.input);
            }
        }

        app.update(dt)?;
        Dispatcher::dispatch(&app.scene.drain_notifications(), &mut tally);

        if tally.game_over {
            break;
        }
    }

    let stars_active = app
        .scene
        .handles()
        .map(|h| app.world.count_active(h.stars))
        .unwrap_or(0);

    println!("frames:       {}", app.frame());
    println!("score:        {}", tally.score);
    println!("stars active: {}", stars_active);
    println!("replenishes:  {}", tally.replenishes);
    println!("bombs:        {}", tally.bombs);
    println!("game over:    {}", tally.game_over);
    Ok(())
}
