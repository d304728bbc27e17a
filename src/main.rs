//! Brickout entry point
//!
//! Native builds run a headless round driven by the autopilot. Progress is
//! saved after every cleared level and the final score goes to the
//! leaderboard.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Play a round of Brickout on autopilot
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Rebound RNG seed (random when omitted)
    seed: Option<u64>,
    /// Stop after this many ticks (10 minutes at 60 Hz)
    #[arg(default_value_t = u64::from(brickout::consts::TICK_HZ) * 60 * 10)]
    max_ticks: u64,
    /// Initials for the leaderboard
    #[arg(default_value = "AI")]
    initials: String,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let args = Args::parse();

    brickout::platform::init_logging();
    log::info!("Brickout (native) starting...");

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    if let Err(err) = headless::run(seed, args.max_ticks, &args.initials) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brickout::platform::time::now_ms;
    use brickout::sim::{GameEvent, apply_command, autopilot_command, tick};
    use brickout::{EngineError, HighScores, Settings, persistence};

    pub fn run(seed: u64, max_ticks: u64, initials: &str) -> Result<(), EngineError> {
        let settings = Settings::load();
        let mut round = persistence::load_or_new(settings, seed)?;
        log::info!("Game initialized with seed: {seed}");

        let mut ticks = 0;
        while !round.is_over() && ticks < max_ticks {
            let command = autopilot_command(&round);
            apply_command(&mut round, command);
            tick(&mut round);
            ticks += 1;

            for event in round.drain_events() {
                match event {
                    GameEvent::BricksDestroyed { count, score } => {
                        log::debug!("{count} brick(s) for {score}");
                    }
                    GameEvent::LevelCleared { level } => {
                        log::info!("Reached level {level}");
                        if let Err(err) = persistence::save(&round) {
                            log::warn!("Could not save: {err}");
                        }
                    }
                    GameEvent::GameOver { final_score } => {
                        record_score(initials, final_score, round.level);
                    }
                    other => log::debug!("{other:?}"),
                }
            }
        }

        if round.is_over() {
            persistence::clear()?;
        } else {
            log::info!(
                "Stopped after {ticks} ticks: level {}, score {}, {} lives",
                round.level,
                round.score,
                round.lives
            );
            persistence::save(&round)?;
        }
        Ok(())
    }

    fn record_score(initials: &str, score: u64, level: u32) {
        let mut scores = HighScores::load();
        match scores.add_score(initials, score, level, now_ms()) {
            Some(rank) => {
                log::info!("New high score {score}, rank {rank}");
                if let Err(err) = scores.save() {
                    log::warn!("Could not save high scores: {err}");
                }
            }
            None => log::info!("Final score {score}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
    brickout::platform::init_logging();
}
