//! Maneuver counting and spin detection.
//!
//! Two independent statistics are kept from the vehicle heading:
//!
//! - **Maneuvers**: a maneuver is registered each time the heading has moved
//!   `turn_threshold` degrees from where the last maneuver was registered.
//! - **Same-direction rotation**: per-tick heading changes are summed while
//!   they keep the same sign. Opposite rotation is collected separately and
//!   only takes over once it reaches `direction_change_threshold`, so short
//!   counter-steering does not clear the sum. Reaching `full_rotation` means
//!   the vehicle is spinning in place and fails the episode.

use crate::config::ManeuverSection;
use crate::core::Vec3;

use super::state::RewardEvent;

/// Slack for accumulated float rotation (degrees).
const ANGLE_EPSILON: f32 = 1e-3;

/// Heading statistics for one episode.
#[derive(Clone, Debug)]
pub struct ManeuverTracker {
    config: ManeuverSection,
    count: u32,
    last_forward: Vec3,
    last_maneuver_forward: Vec3,
    total_rotation: f32,
    opposite_rotation: f32,
    rotation_sign: i8,
    since_recall: f32,
}

impl ManeuverTracker {
    /// Create a tracker for a vehicle currently facing `forward`.
    pub fn new(config: ManeuverSection, forward: Vec3) -> Self {
        let since_recall = config.recall_interval;
        Self {
            config,
            count: 0,
            last_forward: forward,
            last_maneuver_forward: forward,
            total_rotation: 0.0,
            opposite_rotation: 0.0,
            rotation_sign: 0,
            since_recall,
        }
    }

    /// Clear all statistics (episode start).
    pub fn reset(&mut self, forward: Vec3) {
        self.count = 0;
        self.last_forward = forward;
        self.last_maneuver_forward = forward;
        self.total_rotation = 0.0;
        self.opposite_rotation = 0.0;
        self.rotation_sign = 0;
        self.since_recall = self.config.recall_interval;
        log::debug!("Maneuver tracker reset");
    }

    /// Maneuvers registered this episode.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Accumulated same-direction rotation (degrees).
    pub fn total_rotation(&self) -> f32 {
        self.total_rotation
    }

    /// Accumulated opposite-direction rotation (degrees).
    pub fn opposite_rotation(&self) -> f32 {
        self.opposite_rotation
    }

    /// Feed the current heading. Returns the spin penalty when the vehicle
    /// has rotated `full_rotation` degrees in one direction.
    pub fn update(&mut self, forward: Vec3) -> Option<RewardEvent> {
        let since_maneuver = self.last_maneuver_forward.signed_angle(forward, Vec3::UP);
        if since_maneuver.abs() + ANGLE_EPSILON >= self.config.turn_threshold {
            self.count += 1;
            self.last_maneuver_forward = forward;
            log::debug!("Maneuver {} registered ({:.1} deg)", self.count, since_maneuver);
        }

        let delta = self.last_forward.signed_angle(forward, Vec3::UP);
        self.last_forward = forward;
        if delta.abs() >= self.config.deadband {
            self.accumulate(delta);
        }

        if self.total_rotation + ANGLE_EPSILON >= self.config.full_rotation {
            log::info!(
                "Vehicle rotated {:.0} deg in one direction",
                self.total_rotation
            );
            self.total_rotation = 0.0;
            self.opposite_rotation = 0.0;
            return Some(RewardEvent::TakeAwayPoints(self.config.full_rotation_penalty));
        }
        None
    }

    fn accumulate(&mut self, delta: f32) {
        let sign: i8 = if delta > 0.0 { 1 } else { -1 };
        let magnitude = delta.abs();

        if self.rotation_sign == 0 || sign == self.rotation_sign {
            self.rotation_sign = sign;
            self.total_rotation += magnitude;
            self.opposite_rotation = 0.0;
            return;
        }

        self.opposite_rotation += magnitude;
        if self.opposite_rotation + ANGLE_EPSILON >= self.config.direction_change_threshold {
            log::trace!(
                "Rotation direction flipped after {:.1} deg",
                self.opposite_rotation
            );
            self.total_rotation = self.opposite_rotation;
            self.opposite_rotation = 0.0;
            self.rotation_sign = sign;
        }
    }

    /// Final bonus for the maneuvers used. Zero unless `parked`.
    pub fn evaluate(&self, parked: bool) -> f32 {
        if !parked {
            0.0
        } else if self.count <= self.config.limit {
            self.config.reward_within_limit
        } else {
            self.config.reward_over_limit
        }
    }

    /// Tiered penalty for maneuvers over the limit, at most once per
    /// `recall_interval`. The interval restarts on every evaluation.
    pub fn recall(&mut self, dt: f32) -> Option<RewardEvent> {
        self.since_recall += dt;
        if self.since_recall < self.config.recall_interval {
            return None;
        }
        self.since_recall = 0.0;

        let limit = self.config.limit;
        if self.count > limit + self.config.recall_severe_margin {
            Some(RewardEvent::TakeAwayPoints(self.config.recall_severe_penalty))
        } else if self.count > limit + self.config.recall_moderate_margin {
            Some(RewardEvent::Add(self.config.recall_moderate_penalty))
        } else if self.count > limit {
            Some(RewardEvent::Add(self.config.recall_mild_penalty))
        } else {
            None
        }
    }
}
