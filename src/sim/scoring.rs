//! Zone scoring and level progression
//!
//! Two wedges, tested against the unrotated ball position every tick:
//! - score wedge just under the apex C (+10)
//! - penalty wedge in corner B (-10)

use glam::Vec2;

use super::effects::EffectColor;
use super::geometry::Geometry;
use super::state::ScoreState;
use crate::consts::*;
use crate::settings::ScoringMode;

/// Which wedge triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wedge {
    Score,
    Penalty,
}

impl Wedge {
    pub fn points(&self) -> i64 {
        match self {
            Wedge::Score => ZONE_POINTS,
            Wedge::Penalty => -ZONE_POINTS,
        }
    }

    pub fn color(&self) -> EffectColor {
        match self {
            Wedge::Score => EffectColor::Lime,
            Wedge::Penalty => EffectColor::Red,
        }
    }
}

/// A score change reported by the evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDelta {
    pub wedge: Wedge,
    pub points: i64,
    /// Ball position when it triggered
    pub point: Vec2,
}

pub fn in_score_wedge(pos: Vec2, geometry: &Geometry) -> bool {
    let c = geometry.c;
    pos.y > c.y
        && pos.y < c.y + geometry.zone + SCORE_ZONE_PAD
        && (pos.x - c.x).abs() < geometry.zone / 2.0
}

pub fn in_penalty_wedge(pos: Vec2, geometry: &Geometry) -> bool {
    let b = geometry.b;
    pos.x > b.x - geometry.zone && pos.y > b.y - geometry.zone
}

/// Apply wedge scoring for this tick and report what changed
pub fn evaluate(
    pos: Vec2,
    geometry: &Geometry,
    score: &mut ScoreState,
    mode: ScoringMode,
) -> Vec<ScoreDelta> {
    let mut deltas = Vec::new();

    let checks = [
        (Wedge::Score, in_score_wedge(pos, geometry)),
        (Wedge::Penalty, in_penalty_wedge(pos, geometry)),
    ];

    for (wedge, inside) in checks {
        let latch = match wedge {
            Wedge::Score => &mut score.in_score_zone,
            Wedge::Penalty => &mut score.in_penalty_zone,
        };
        let was_inside = std::mem::replace(latch, inside);

        let counts = match mode {
            ScoringMode::PerTick => inside,
            ScoringMode::Debounced => inside && !was_inside,
        };
        if !counts {
            continue;
        }

        let points = wedge.points();
        score.total += points;
        score.level_score += points;
        log::debug!("{:?} wedge: {:+} (total {})", wedge, points, score.total);
        deltas.push(ScoreDelta {
            wedge,
            points,
            point: pos,
        });
    }

    deltas
}

/// Advance the level once enough points were earned on it
///
/// Returns true when the level went up; the caller restarts the clock.
pub fn check_level_up(score: &mut ScoreState, threshold: i64, time_remaining: u32) -> bool {
    if score.level_score >= threshold && time_remaining > 0 {
        score.level += 1;
        score.level_score = 0;
        true
    } else {
        false
    }
}
