//! Tri-Spin headless runner
//!
//! Drives the engine the way a frontend would: one `tick` per frame, one
//! `clock_second` every `TICKS_PER_SECOND` frames, until the clock runs out.
//!
//! Usage: tri-spin [settings.json] [seed]

use std::path::Path;

use tri_spin::Settings;
use tri_spin::consts::TICKS_PER_SECOND;
use tri_spin::sim::{GameEvent, GameState, Snapshot, TickInput, clock_second, tick};

/// Viewport the runner pretends to have
const VIEWPORT: (f32, f32) = (800.0, 600.0);

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x7215_5EED);

    log::info!(
        "Tri-Spin starting ({} variant, seed {})",
        settings.variant.as_str(),
        seed
    );

    let mut state = GameState::new(settings, VIEWPORT.0, VIEWPORT.1, seed);
    let mut input = TickInput::default();
    let mut frame: u64 = 0;
    let mut stats = RunStats::default();

    let last = loop {
        let snapshot = tick(&mut state, &input);
        stats.record(&snapshot);
        if snapshot.game_over {
            break snapshot;
        }

        input = autopilot(&snapshot);
        frame += 1;
        if frame % TICKS_PER_SECOND as u64 == 0 {
            clock_second(&mut state);
        }
    };

    log::info!(
        "Finished after {} frames: {} wall hits, {} flipper hits ({} boosts), {} zone triggers",
        frame,
        stats.wall_hits,
        stats.flipper_hits,
        stats.boosts,
        stats.zone_triggers
    );

    match serde_json::to_string_pretty(&last) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not encode final snapshot: {}", e),
    }
}

#[derive(Debug, Default)]
struct RunStats {
    wall_hits: u32,
    flipper_hits: u32,
    boosts: u32,
    zone_triggers: u32,
}

impl RunStats {
    fn record(&mut self, snapshot: &Snapshot) {
        for event in &snapshot.events {
            match event {
                GameEvent::WallHit { .. } => self.wall_hits += 1,
                GameEvent::FlipperHit { boosted, .. } => {
                    self.flipper_hits += 1;
                    if *boosted {
                        self.boosts += 1;
                    }
                }
                GameEvent::ZoneScored { .. } => self.zone_triggers += 1,
                GameEvent::LevelUp { level } => log::info!("Level {}", level),
                GameEvent::GameOver { score } => log::info!("Final score {}", score),
            }
        }
    }
}

/// Flip the side the ball is on once it drops into the lower third
fn autopilot(snapshot: &Snapshot) -> TickInput {
    let arena = &snapshot.arena;
    let low = snapshot.ball.y > arena.c.y + (arena.a.y - arena.c.y) * 2.0 / 3.0;
    let left_half = snapshot.ball.x < arena.c.x;
    TickInput {
        flip_left: low && left_half,
        flip_right: low && !left_half,
    }
}
