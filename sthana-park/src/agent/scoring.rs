//! Goal-entry scoring: proximity to the intended space and parking alignment.

use crate::config::{GoalKind, ScoringSection};
use crate::core::{Pose, Vec3, clamp01, inverse_lerp, lerp};

use super::state::RewardEvent;

/// Result of scoring one goal entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalScore {
    /// Shaping reward for how close the entered goal is to the intended one.
    /// `None` when no goal had been selected.
    pub proximity: Option<f32>,
    /// Alignment angle (degrees); `None` for milestone goals.
    pub alignment: Option<f32>,
    /// Reward event to route through the agent.
    pub event: RewardEvent,
}

/// Scores goal entries.
#[derive(Clone, Debug)]
pub struct AlignmentScorer {
    config: ScoringSection,
    kind: GoalKind,
}

impl AlignmentScorer {
    /// Create a scorer for goals of `kind`.
    pub fn new(config: ScoringSection, kind: GoalKind) -> Self {
        Self { config, kind }
    }

    /// Goal kind being scored.
    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    /// Reward for entering a goal `distance` meters from the intended one.
    ///
    /// Bonus inside `exact_radius`, flat penalty up to `adjacent_radius`,
    /// then a penalty growing linearly to `max_penalty` at
    /// `max_penalty_distance`.
    pub fn proximity(&self, distance: f32) -> f32 {
        let c = &self.config;
        if distance <= c.exact_radius {
            c.exact_bonus
        } else if distance <= c.adjacent_radius {
            c.adjacent_penalty
        } else {
            let t = inverse_lerp(c.adjacent_radius, c.max_penalty_distance, distance);
            lerp(c.adjacent_penalty, c.max_penalty, t)
        }
    }

    /// Angle between the vehicle axis and the line from the vehicle to the
    /// goal, on the ground plane. Facing either way along the line is 0°.
    pub fn alignment_angle(vehicle: Pose, goal_position: Vec3) -> f32 {
        let forward = vehicle.forward().flattened().normalized();
        let to_goal = (goal_position - vehicle.position).flattened().normalized();
        forward.angle(to_goal).min((-forward).angle(to_goal))
    }

    /// Reward event for a final-destination entry at `alignment` degrees.
    pub fn alignment_event(&self, alignment: f32) -> RewardEvent {
        let c = &self.config;
        let base = c.goal_reward;

        if alignment <= c.min_rotation || !c.enforce_min_rotation {
            let amount = if alignment <= c.perfect_alignment {
                base + c.perfect_bonus
            } else {
                base
            };
            return RewardEvent::GivePoints {
                amount,
                is_final: true,
                is_aligned: true,
            };
        }

        let amount = if alignment > c.degrade_end {
            base + c.misaligned_offset
        } else {
            let t = clamp01((alignment - c.degrade_start) / (c.degrade_end - c.degrade_start));
            lerp(base + c.degrade_near_offset, base + c.degrade_far_offset, t)
        };
        RewardEvent::GivePoints {
            amount,
            is_final: true,
            is_aligned: false,
        }
    }

    /// Score a vehicle at `vehicle` entering the goal at `goal_position`.
    ///
    /// `intended` is the goal selected when parking started.
    pub fn score(&self, goal_position: Vec3, intended: Option<Vec3>, vehicle: Pose) -> GoalScore {
        let proximity = intended.map(|target| self.proximity(goal_position.distance(target)));

        match self.kind {
            GoalKind::Milestone => GoalScore {
                proximity,
                alignment: None,
                event: RewardEvent::GivePoints {
                    amount: self.config.goal_reward,
                    is_final: false,
                    is_aligned: false,
                },
            },
            GoalKind::FinalDestination => {
                let alignment = Self::alignment_angle(vehicle, goal_position);
                GoalScore {
                    proximity,
                    alignment: Some(alignment),
                    event: self.alignment_event(alignment),
                }
            }
        }
    }
}
