//! Reward shaping, obstacle penalty and maneuver tracking sections.

use serde::{Deserialize, Serialize};

/// Per-tick reward shaping settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSection {
    /// One-time reward when the first parking space is found
    pub detection_reward: f32,

    /// Actions per episode; drives the time cost and interrupts the episode (0 = unlimited)
    pub max_episode_steps: u32,

    /// Speed below which the vehicle counts as stationary (m/s)
    pub stationary_speed: f32,

    /// Stationary time before the penalty applies (seconds)
    pub stationary_time: f32,

    /// Penalty per action while stationary past the threshold
    pub stationary_penalty: f32,

    /// Length of the distance / reversal window (seconds)
    pub check_interval: f32,

    /// Minimum distance covered per window (meters)
    pub min_window_distance: f32,

    /// Penalty when a window covers too little distance
    pub window_distance_penalty: f32,

    /// Forward and backward transitions each must reach this count per window
    pub reversal_min_count: u32,

    /// Penalty per transition once both counts are reached
    pub reversal_penalty_per_change: f32,

    /// Route window penalties through the terminal path
    pub window_penalties_terminal: bool,

    /// Local height at or below which the vehicle has left the ground plane
    pub fall_height: f32,

    /// Terminal penalty for leaving the ground plane
    pub fall_penalty: f32,

    /// Final bonus used when maneuver tracking is disabled
    pub final_bonus_without_tracker: f32,
}

impl Default for RewardSection {
    fn default() -> Self {
        Self {
            detection_reward: 0.2,
            max_episode_steps: 5000,
            stationary_speed: 0.2,
            stationary_time: 1.5,
            stationary_penalty: -0.2,
            check_interval: 2.0,
            min_window_distance: 6.0,
            window_distance_penalty: -0.2,
            reversal_min_count: 6,
            reversal_penalty_per_change: -0.05,
            window_penalties_terminal: true,
            fall_height: 0.0,
            fall_penalty: -0.5,
            final_bonus_without_tracker: 0.8,
        }
    }
}

/// Obstacle contact penalties
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstaclesSection {
    /// Barrier contact (non-terminal)
    pub barrier: f32,

    /// Tree contact (non-terminal)
    pub tree: f32,

    /// Driving on grass (non-terminal)
    pub grass: f32,

    /// Entering a pedestrian's trigger volume (non-terminal)
    pub pedestrian_contact: f32,

    /// Entering a parked car's trigger volume (terminal)
    pub parked_car_contact: f32,

    /// Physical collision with a parked car (terminal)
    pub parked_car_collision: f32,
}

impl Default for ObstaclesSection {
    fn default() -> Self {
        Self {
            barrier: -0.2,
            tree: -0.1,
            grass: -0.08,
            pedestrian_contact: -0.5,
            parked_car_contact: -0.01,
            parked_car_collision: -0.25,
        }
    }
}

/// Maneuver tracking settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverSection {
    /// Track maneuvers (disabled = flat final bonus)
    pub enabled: bool,

    /// Heading change registered as one maneuver (degrees)
    pub turn_threshold: f32,

    /// Maneuvers allowed before penalties
    pub limit: u32,

    /// Per-tick heading changes below this are ignored (degrees)
    pub deadband: f32,

    /// Opposite rotation needed to flip the tracked direction (degrees)
    pub direction_change_threshold: f32,

    /// Same-direction rotation counted as spinning in place (degrees)
    pub full_rotation: f32,

    /// Terminal penalty for spinning in place
    pub full_rotation_penalty: f32,

    /// Final bonus when parked within the maneuver limit
    pub reward_within_limit: f32,

    /// Final bonus when parked over the maneuver limit
    pub reward_over_limit: f32,

    /// Minimum time between recall evaluations (seconds)
    pub recall_interval: f32,

    /// Margin over the limit for the terminal recall tier
    pub recall_severe_margin: u32,

    /// Terminal recall penalty
    pub recall_severe_penalty: f32,

    /// Margin over the limit for the moderate recall tier
    pub recall_moderate_margin: u32,

    /// Moderate recall penalty
    pub recall_moderate_penalty: f32,

    /// Penalty for any count over the limit
    pub recall_mild_penalty: f32,
}

impl Default for ManeuverSection {
    fn default() -> Self {
        Self {
            enabled: true,
            turn_threshold: 45.0,
            limit: 2,
            deadband: 0.5,
            direction_change_threshold: 45.0,
            full_rotation: 230.0,
            full_rotation_penalty: -0.4,
            reward_within_limit: 1.2,
            reward_over_limit: 0.8,
            recall_interval: 0.5,
            recall_severe_margin: 3,
            recall_severe_penalty: -0.2,
            recall_moderate_margin: 1,
            recall_moderate_penalty: -0.1,
            recall_mild_penalty: -0.05,
        }
    }
}
