//! Goal placement and goal-entry scoring sections.

use serde::{Deserialize, Serialize};

/// What entering a goal means for the episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Intermediate reward; the episode continues.
    Milestone,
    /// Parking attempt; alignment is scored and the episode ends.
    FinalDestination,
}

/// Goal marker placement settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsSection {
    /// Scoring behaviour of placed goals
    pub kind: GoalKind,

    /// Minimum distance between two placed goals (meters)
    pub min_separation: f32,

    /// Height of the goal marker above the candidate center (meters)
    pub height_offset: f32,

    /// Absolute height of the ground highlight (meters)
    pub highlight_height: f32,

    /// Marker heading for angled spaces (degrees)
    pub angled_yaw: f32,
}

impl Default for GoalsSection {
    fn default() -> Self {
        Self {
            kind: GoalKind::FinalDestination,
            min_separation: 2.0,
            height_offset: 0.1,
            highlight_height: -0.0496,
            angled_yaw: 45.0,
        }
    }
}

/// Goal-entry scoring settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Base reward for entering a goal
    pub goal_reward: f32,

    /// Require alignment within `min_rotation` for full success
    pub enforce_min_rotation: bool,

    /// Alignment accepted as success (degrees)
    pub min_rotation: f32,

    /// Alignment earning the perfect-parking bonus (degrees)
    pub perfect_alignment: f32,

    /// Extra reward for perfect alignment
    pub perfect_bonus: f32,

    /// Alignment where degradation starts (degrees)
    pub degrade_start: f32,

    /// Alignment where degradation ends; beyond it parking is misaligned (degrees)
    pub degrade_end: f32,

    /// Offset from the base reward at `degrade_start`
    pub degrade_near_offset: f32,

    /// Offset from the base reward at `degrade_end`
    pub degrade_far_offset: f32,

    /// Offset from the base reward when misaligned
    pub misaligned_offset: f32,

    /// Goal-to-nearest distance counted as the intended space (meters)
    pub exact_radius: f32,

    /// Bonus for parking in the intended space
    pub exact_bonus: f32,

    /// Goal-to-nearest distance counted as an adjacent space (meters)
    pub adjacent_radius: f32,

    /// Penalty for parking in an adjacent space
    pub adjacent_penalty: f32,

    /// Distance at which the proximity penalty saturates (meters)
    pub max_penalty_distance: f32,

    /// Saturated proximity penalty
    pub max_penalty: f32,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            goal_reward: 0.8,
            enforce_min_rotation: false,
            min_rotation: 10.0,
            perfect_alignment: 5.0,
            perfect_bonus: 0.5,
            degrade_start: 15.0,
            degrade_end: 45.0,
            degrade_near_offset: -0.2,
            degrade_far_offset: -1.0,
            misaligned_offset: -1.5,
            exact_radius: 0.5,
            exact_bonus: 0.2,
            adjacent_radius: 4.0,
            adjacent_penalty: -0.1,
            max_penalty_distance: 30.0,
            max_penalty: -1.0,
        }
    }
}
