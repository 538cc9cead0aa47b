//! Immutable per-tick view of the engine for renderers and HUDs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::EffectColor;
use super::geometry::FlipperKind;
use super::state::{GameEvent, GameState};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaView {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub centroid: Vec2,
    /// Spin about the centroid to apply when drawing
    pub rotation: f32,
    pub zone: f32,
    pub score_wedge: [Vec2; 3],
    pub penalty_wedge: [Vec2; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperView {
    pub kind: FlipperKind,
    pub pivot: Vec2,
    pub tip: Vec2,
    /// Absolute segment angle
    pub angle: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    /// 1.0 fresh, approaching 0.0 as it fades
    pub life_ratio: f32,
    pub color: EffectColor,
}

/// Ripple or dent marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkView {
    pub x: f32,
    pub y: f32,
    pub life_ratio: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub arena: ArenaView,
    pub flippers: Vec<FlipperView>,
    pub ball: BallView,
    pub particles: Vec<ParticleView>,
    pub ripples: Vec<MarkView>,
    pub deformations: Vec<MarkView>,
    pub score: i64,
    pub level: u32,
    pub level_score: i64,
    pub time_remaining: u32,
    pub game_over: bool,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Capture the current state; `events` are the ones drained for this frame
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        let g = &state.geometry;
        let effects = &state.effects;

        Self {
            tick: state.time_ticks,
            arena: ArenaView {
                a: g.a,
                b: g.b,
                c: g.c,
                centroid: g.centroid,
                rotation: state.rotation,
                zone: g.zone,
                score_wedge: g.score_wedge(),
                penalty_wedge: g.penalty_wedge(),
            },
            flippers: state
                .flippers
                .iter()
                .map(|f| FlipperView {
                    kind: f.kind,
                    pivot: f.pivot,
                    tip: f.tip(),
                    angle: f.angle(),
                    thickness: f.thickness,
                })
                .collect(),
            ball: BallView {
                x: state.ball.pos.x,
                y: state.ball.pos.y,
                scale: state.ball.scale,
                radius: state.ball.radius,
            },
            particles: effects
                .particles
                .iter()
                .map(|p| ParticleView {
                    x: p.pos.x,
                    y: p.pos.y,
                    life_ratio: p.life as f32 / SPARK_LIFE as f32,
                    color: p.color,
                })
                .collect(),
            ripples: effects
                .ripples
                .iter()
                .map(|r| MarkView {
                    x: r.pos.x,
                    y: r.pos.y,
                    life_ratio: r.life as f32 / RIPPLE_LIFE as f32,
                })
                .collect(),
            deformations: effects
                .deformations
                .iter()
                .map(|d| MarkView {
                    x: d.pos.x,
                    y: d.pos.y,
                    life_ratio: d.life as f32 / DEFORMATION_LIFE as f32,
                })
                .collect(),
            score: state.score.total,
            level: state.score.level,
            level_score: state.score.level_score,
            time_remaining: state.clock.remaining,
            game_over: state.is_game_over(),
            events,
        }
    }

    /// Vertex positions after applying the arena spin
    pub fn rotated_vertices(&self) -> [Vec2; 3] {
        let arena = &self.arena;
        [arena.a, arena.b, arena.c]
            .map(|v| crate::rotate_about(v, arena.centroid, arena.rotation))
    }
}
