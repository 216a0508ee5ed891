//! Vehicle speed caps and end-of-episode sequence sections.

use serde::{Deserialize, Serialize};

/// Vehicle speed settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSection {
    /// Speed cap while parking (m/s)
    pub max_speed: f32,

    /// Fraction of `max_speed` allowed while searching
    pub search_speed_factor: f32,
}

impl Default for VehicleSection {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            search_speed_factor: 0.5,
        }
    }
}

/// End-of-episode sequence settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeSection {
    /// Keep driving towards the nearest goal after a successful park
    pub drive_to_goal: bool,

    /// Give up driving towards the goal after this long (seconds)
    pub drive_timeout: f32,

    /// Distance at which the goal counts as reached (meters)
    pub arrive_distance: f32,

    /// Bearing error below which the vehicle drives straight (degrees)
    pub steer_tolerance: f32,

    /// Delay from stop to ground feedback (seconds)
    pub feedback_delay: f32,

    /// Delay from stop to pedestrian scoring (seconds)
    pub finalize_delay: f32,
}

impl Default for EpisodeSection {
    fn default() -> Self {
        Self {
            drive_to_goal: true,
            drive_timeout: 2.0,
            arrive_distance: 1.0,
            steer_tolerance: 15.0,
            feedback_delay: 0.5,
            finalize_delay: 0.1,
        }
    }
}
