//! Per-frame simulation tick
//!
//! One tick runs every phase in order:
//! flippers → arena spin → ball motion → collisions → effects → scoring → level
//!
//! The host owns the run loop: call `tick` once per frame and stop when the
//! returned snapshot reports game over. The 1 Hz countdown is a separate driver
//! that calls `clock_second`.

use super::collision::{Contact, Surface, resolve_collisions};
use super::geometry::Side;
use super::scoring;
use super::snapshot::Snapshot;
use super::state::{GameEvent, GamePhase, GameState};

/// Player input sampled once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left flippers (bottom-left and slope-left) held
    pub flip_left: bool,
    /// Right flippers (bottom-right and slope-right) held
    pub flip_right: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    // Terminal: no physics, just report
    if state.phase == GamePhase::GameOver {
        let events = std::mem::take(&mut state.events);
        return Snapshot::capture(state, events);
    }

    state.time_ticks += 1;

    step_flippers(state, input);
    spin_arena(state);
    state.ball.integrate(state.settings.gravity);
    let contacts = collide(state);
    update_effects(state, &contacts);
    score_zones(state);
    progress_level(state);

    let events = std::mem::take(&mut state.events);
    Snapshot::capture(state, events)
}

/// One second elapsed on the host's countdown
///
/// Returns true when this second ended the game.
pub fn clock_second(state: &mut GameState) -> bool {
    if state.phase == GamePhase::GameOver {
        return false;
    }

    state.clock.remaining = state.clock.remaining.saturating_sub(1);
    if state.clock.remaining == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score.total,
        });
        log::info!(
            "Game over - score {} at level {}",
            state.score.total,
            state.score.level
        );
        return true;
    }
    false
}

fn step_flippers(state: &mut GameState, input: &TickInput) {
    for flipper in &mut state.flippers {
        let active = match flipper.kind.side() {
            Side::Left => input.flip_left,
            Side::Right => input.flip_right,
        };
        flipper.step(active);
    }
}

fn spin_arena(state: &mut GameState) {
    state.rotation += state.settings.rotation_for_level(state.score.level);
}

fn collide(state: &mut GameState) -> Vec<Contact> {
    let contacts = resolve_collisions(
        &mut state.ball,
        &state.geometry,
        &state.flippers,
        state.settings.base_speed,
        state.settings.boost_factor,
    );

    for contact in &contacts {
        state.events.push(match contact.surface {
            Surface::Wall(edge) => GameEvent::WallHit {
                edge,
                point: contact.point,
            },
            Surface::Flipper(kind) => GameEvent::FlipperHit {
                kind,
                point: contact.point,
                boosted: contact.boosted,
            },
        });
    }
    contacts
}

/// Age what exists, then add this tick's collision bursts
fn update_effects(state: &mut GameState, contacts: &[Contact]) {
    state.effects.age();
    for contact in contacts {
        state.spawn_effect(contact.point, contact.surface.color());
    }
}

fn score_zones(state: &mut GameState) {
    let deltas = scoring::evaluate(
        state.ball.pos,
        &state.geometry,
        &mut state.score,
        state.settings.scoring_mode,
    );

    for delta in deltas {
        state.spawn_effect(delta.point, delta.wedge.color());
        state.events.push(GameEvent::ZoneScored {
            delta: delta.points,
            point: delta.point,
        });
    }
}

fn progress_level(state: &mut GameState) {
    let threshold = state.settings.level_score_threshold;
    if scoring::check_level_up(&mut state.score, threshold, state.clock.remaining) {
        state.clock.remaining = state.settings.game_duration;
        state.events.push(GameEvent::LevelUp {
            level: state.score.level,
        });
        log::info!(
            "Level {} reached (score {})",
            state.score.level,
            state.score.total
        );
        state.launch_ball();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{ScoringMode, Settings, Variant};
    use crate::sim::effects::EffectColor;
    use crate::sim::geometry::FlipperKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn new_state(settings: Settings) -> GameState {
        let mut state = GameState::new(settings, 800.0, 600.0, 12345);
        state.events.clear();
        state
    }

    /// Park the ball where nothing can touch it
    fn park_ball(state: &mut GameState) {
        state.ball.pos = state.geometry.centroid;
        state.ball.vel = Vec2::ZERO;
    }

    #[test]
    fn test_straight_flight_without_collisions() {
        let settings = Settings {
            base_speed: 3.0,
            gravity: 0.0,
            ..Settings::default()
        };
        let mut state = new_state(settings);
        state.launch_ball_at_angle(0.0);
        let start = state.ball.pos;
        let vel = state.ball.vel;
        assert_eq!(vel, Vec2::new(3.0, 0.0));

        let mut snapshot = None;
        for _ in 0..10 {
            snapshot = Some(tick(&mut state, &TickInput::default()));
            assert!(snapshot.as_ref().unwrap().events.is_empty());
        }
        assert_eq!(state.ball.pos, start + 10.0 * vel);
        assert_eq!(state.ball.vel, vel);

        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.tick, 10);
        assert_eq!(snapshot.ball.x, start.x + 30.0);
    }

    #[test]
    fn test_gravity_variant_accelerates_downward() {
        let mut state = new_state(Settings::from_preset(Variant::Classic));
        state.launch_ball_at_angle(0.0);
        tick(&mut state, &TickInput::default());
        assert!((state.ball.vel.y - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_wall_hit_spawns_effects() {
        let mut state = new_state(Settings::default());
        let base = state.settings.base_speed;
        let mid = (state.geometry.a + state.geometry.b) * 0.5;
        // Midway along AB the bottom flippers are out of reach
        state.ball.pos = Vec2::new(state.geometry.a.x + 40.0, mid.y - BALL_RADIUS);
        state.ball.vel = Vec2::new(0.0, base);

        let snapshot = tick(&mut state, &TickInput::default());
        assert!(matches!(snapshot.events.as_slice(), [GameEvent::WallHit { .. }]));
        assert_eq!(snapshot.particles.len(), SPARK_COUNT);
        assert!(snapshot.particles.iter().all(|p| p.color == EffectColor::Cyan));
        assert!(snapshot.particles.iter().all(|p| p.life_ratio == 1.0));
        assert_eq!(snapshot.ripples.len(), 1);
        assert_eq!(snapshot.deformations.len(), 1);
        assert!(state.ball.vel.y < 0.0);
        assert!((state.ball.speed() - base).abs() < 1e-5);

        // Next tick ages the burst
        park_ball(&mut state);
        let snapshot = tick(&mut state, &TickInput::default());
        assert_eq!(snapshot.particles.len(), SPARK_COUNT);
        assert!(
            snapshot
                .particles
                .iter()
                .all(|p| (p.life_ratio - (SPARK_LIFE - 1) as f32 / SPARK_LIFE as f32).abs() < 1e-6)
        );
    }

    #[test]
    fn test_inputs_drive_matching_flippers() {
        let mut state = new_state(Settings::default());
        park_ball(&mut state);
        let input = TickInput {
            flip_left: true,
            flip_right: false,
        };
        for _ in 0..3 {
            tick(&mut state, &input);
        }
        assert!(state.flipper(FlipperKind::BottomLeft).current_angle > 0.0);
        assert!(state.flipper(FlipperKind::SlopeLeft).current_angle > 0.0);
        assert_eq!(state.flipper(FlipperKind::BottomRight).current_angle, 0.0);
        assert_eq!(state.flipper(FlipperKind::SlopeRight).current_angle, 0.0);
    }

    #[test]
    fn test_flipper_hit_through_tick() {
        let mut state = new_state(Settings::default());
        let base = state.settings.base_speed;
        state.flipper_mut(FlipperKind::BottomLeft).current_angle = MAX_FLIP_ANGLE;

        let left = state.flipper(FlipperKind::BottomLeft).clone();
        let mid = (left.pivot + left.tip()) * 0.5;
        let seg = (left.tip() - left.pivot).normalize();
        let up = if seg.perp().y < 0.0 { seg.perp() } else { -seg.perp() };

        // Holding the button keeps it fully extended; one tick of travel lands at 8 units out
        state.ball.pos = mid + up * (BALL_RADIUS - 2.0 + base);
        state.ball.vel = -up * base;
        let input = TickInput {
            flip_left: true,
            ..Default::default()
        };
        let snapshot = tick(&mut state, &input);
        assert!(snapshot.events.iter().any(|e| matches!(
            e,
            GameEvent::FlipperHit {
                kind: FlipperKind::BottomLeft,
                boosted: true,
                ..
            }
        )));
        assert!((state.ball.speed() - base * state.settings.boost_factor).abs() < 1e-4);
        assert!(snapshot.particles.iter().all(|p| p.color == EffectColor::Amber));
    }

    #[test]
    fn test_falling_flipper_keeps_ball_inside() {
        let mut state = new_state(Settings::default());
        let max = state.flipper(FlipperKind::BottomLeft).max_angle;
        state.flipper_mut(FlipperKind::BottomLeft).current_angle = max;

        // Sitting under the raised flipper, just clear of AB
        let left = state.flipper(FlipperKind::BottomLeft).clone();
        let along = (left.tip() - left.pivot).normalize();
        state.ball.pos = Vec2::new(
            left.pivot.x + along.x * 40.0,
            state.geometry.a.y - BALL_RADIUS - 5.0,
        );
        state.ball.vel = Vec2::ZERO;

        let mut hit_by_flipper = false;
        for _ in 0..120 {
            let snapshot = tick(&mut state, &TickInput::default());
            hit_by_flipper |= snapshot
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::FlipperHit { .. }));
            assert!(state.geometry.contains(state.ball.pos));
        }
        assert!(hit_by_flipper);
        assert_eq!(state.flipper(FlipperKind::BottomLeft).current_angle, 0.0);
    }

    #[test]
    fn test_arena_spin() {
        let mut state = new_state(Settings::default());
        park_ball(&mut state);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!((state.rotation - 0.01).abs() < 1e-6);

        // Gravity variant stays still on level 1
        let mut state = new_state(Settings::from_preset(Variant::Classic));
        park_ball(&mut state);
        state.settings.gravity = 0.0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.rotation, 0.0);
    }

    #[test]
    fn test_score_wedge_through_tick() {
        let settings = Settings {
            level_score_threshold: 1000,
            ..Settings::default()
        };
        let mut state = new_state(settings);
        state.ball.pos = state.geometry.c + Vec2::new(0.0, state.geometry.zone / 2.0);
        state.ball.vel = Vec2::ZERO;

        let mut snapshot = None;
        for _ in 0..4 {
            snapshot = Some(tick(&mut state, &TickInput::default()));
        }
        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.score, 40);
        assert!(matches!(
            snapshot.events.as_slice(),
            [GameEvent::ZoneScored { delta: 10, .. }]
        ));
        assert!(snapshot.particles.iter().any(|p| p.color == EffectColor::Lime));
        assert_eq!(snapshot.ripples.len(), 4);
    }

    #[test]
    fn test_debounced_wedge_through_tick() {
        let settings = Settings {
            scoring_mode: ScoringMode::Debounced,
            ..Settings::default()
        };
        let mut state = new_state(settings);
        let zone = state.geometry.zone;
        // Inside the corner wedge but clear of both walls
        state.ball.pos = state.geometry.b + Vec2::new(-0.8 * zone, -0.3 * zone);
        state.ball.vel = Vec2::ZERO;

        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score.total, -10);
    }

    #[test]
    fn test_level_up_restarts_clock_and_relaunches() {
        let mut state = new_state(Settings::default());
        for _ in 0..12 {
            clock_second(&mut state);
        }
        assert_eq!(state.clock.remaining, 18);

        state.score.level_score = 20;
        state.ball.pos = state.geometry.c + Vec2::new(0.0, state.geometry.zone / 2.0);
        state.ball.vel = Vec2::ZERO;

        let snapshot = tick(&mut state, &TickInput::default());
        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.level_score, 0);
        assert_eq!(snapshot.time_remaining, 30);
        assert!(snapshot.events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(state.ball.pos, state.geometry.ball_spawn());
        assert!((state.ball.speed() - state.settings.base_speed).abs() < 1e-5);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut state = new_state(Settings::default());
        for second in 1..30 {
            assert!(!clock_second(&mut state), "ended early at {}", second);
        }
        assert!(clock_second(&mut state));
        assert!(state.is_game_over());
        assert_eq!(state.clock.remaining, 0);

        // Further seconds are ignored
        assert!(!clock_second(&mut state));
        assert_eq!(state.clock.remaining, 0);

        let snapshot = tick(&mut state, &TickInput::default());
        assert!(snapshot.game_over);
        assert_eq!(snapshot.events, vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = new_state(Settings::from_preset(Variant::Classic));
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        state.clock.remaining = 1;
        clock_second(&mut state);

        let ball = state.ball.clone();
        let score = state.score.clone();
        let flippers = state.flippers.clone();
        let rotation = state.rotation;
        let ticks = state.time_ticks;

        let input = TickInput {
            flip_left: true,
            flip_right: true,
        };
        for _ in 0..50 {
            let snapshot = tick(&mut state, &input);
            assert!(snapshot.game_over);
        }
        assert_eq!(state.ball, ball);
        assert_eq!(state.score, score);
        assert_eq!(state.flippers, flippers);
        assert_eq!(state.rotation, rotation);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = new_state(Settings::default());
        state.clock.remaining = 1;
        clock_second(&mut state);
        assert!(state.is_game_over());

        state.reset();
        assert!(!state.is_game_over());
        let snapshot = tick(&mut state, &TickInput::default());
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.time_remaining, 30);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(Settings::default());
        let mut state2 = new_state(Settings::default());

        for i in 0..600 {
            let input = TickInput {
                flip_left: i % 40 < 10,
                flip_right: i % 55 < 12,
            };
            let s1 = tick(&mut state1, &input);
            let s2 = tick(&mut state2, &input);
            assert_eq!(s1, s2);
        }
    }

    #[test]
    fn test_snapshot_rotation() {
        let mut state = new_state(Settings::default());
        park_ball(&mut state);
        let snapshot = tick(&mut state, &TickInput::default());
        let rotated = snapshot.rotated_vertices();
        assert_eq!(snapshot.flippers.len(), 4);
        for (v, r) in [snapshot.arena.a, snapshot.arena.b, snapshot.arena.c]
            .iter()
            .zip(rotated.iter())
        {
            // Rotation keeps distance to the centroid
            let d0 = (*v - snapshot.arena.centroid).length();
            let d1 = (*r - snapshot.arena.centroid).length();
            assert!((d0 - d1).abs() < 1e-3);
            assert!(*v != *r);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_wall_speed_single_boost_and_containment(
            seed in any::<u64>(),
            classic in any::<bool>(),
            presses in proptest::collection::vec((any::<bool>(), any::<bool>(), 1usize..40), 1..40),
        ) {
            let variant = if classic { Variant::Classic } else { Variant::Arcade };
            let mut state = GameState::new(Settings::from_preset(variant), 800.0, 600.0, seed);
            let base = state.settings.base_speed;
            let mut boosts_in_episode = 0;

            for (flip_left, flip_right, hold) in presses {
                let input = TickInput { flip_left, flip_right };
                for _ in 0..hold {
                    let snapshot = tick(&mut state, &input);

                    let mut wall_last = false;
                    for event in &snapshot.events {
                        match event {
                            GameEvent::WallHit { .. } => {
                                boosts_in_episode = 0;
                                wall_last = true;
                            }
                            GameEvent::FlipperHit { boosted, .. } => {
                                if *boosted {
                                    boosts_in_episode += 1;
                                }
                                wall_last = false;
                            }
                            GameEvent::LevelUp { .. } => boosts_in_episode = 0,
                            _ => {}
                        }
                        prop_assert!(boosts_in_episode <= 1);
                    }

                    if wall_last && !snapshot.events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })) {
                        prop_assert!((state.ball.speed() - base).abs() < 1e-3);
                    }
                    prop_assert!(
                        state.geometry.contains(state.ball.pos),
                        "ball escaped at {:?}",
                        state.ball.pos
                    );
                    for flipper in &state.flippers {
                        prop_assert!(flipper.current_angle >= 0.0);
                        prop_assert!(flipper.current_angle <= flipper.max_angle);
                    }
                }
            }
        }
    }
}
