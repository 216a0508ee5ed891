//! Time-windowed reward shaping while parking.
//!
//! Three checks run on every action:
//!
//! - **Stationary**: once the vehicle has been below `stationary_speed` for
//!   `stationary_time`, every action costs `stationary_penalty` until it moves.
//! - **Distance window**: every `check_interval`, the distance covered in the
//!   window must reach `min_window_distance`.
//! - **Reversals**: transitions into forward and into backward motion are
//!   counted per window; when both reach `reversal_min_count` each transition
//!   costs `reversal_penalty_per_change`.
//!
//! Window accumulators reset at every boundary whether or not a penalty fired.

use crate::config::RewardSection;
use crate::core::Vec3;

use super::action::Direction;
use super::state::RewardEvent;

/// Per-episode shaping state.
#[derive(Clone, Debug)]
pub struct RewardShaper {
    config: RewardSection,
    stationary_time: f32,
    window_elapsed: f32,
    window_distance: f32,
    last_position: Vec3,
    forward_changes: u32,
    backward_changes: u32,
    last_direction: Direction,
}

impl RewardShaper {
    /// Create a shaper for a vehicle at `position`.
    pub fn new(config: RewardSection, position: Vec3) -> Self {
        Self {
            config,
            stationary_time: 0.0,
            window_elapsed: 0.0,
            window_distance: 0.0,
            last_position: position,
            forward_changes: 0,
            backward_changes: 0,
            last_direction: Direction::Idle,
        }
    }

    /// Clear all accumulators (episode start).
    pub fn reset(&mut self, position: Vec3) {
        self.stationary_time = 0.0;
        self.last_position = position;
        self.last_direction = Direction::Idle;
        self.reset_window();
    }

    fn reset_window(&mut self) {
        self.window_elapsed = 0.0;
        self.window_distance = 0.0;
        self.forward_changes = 0;
        self.backward_changes = 0;
    }

    /// Time spent below the stationary speed (seconds).
    pub fn stationary_time(&self) -> f32 {
        self.stationary_time
    }

    /// Distance covered in the current window (meters).
    pub fn window_distance(&self) -> f32 {
        self.window_distance
    }

    /// Transitions into forward and backward motion in the current window.
    pub fn direction_changes(&self) -> (u32, u32) {
        (self.forward_changes, self.backward_changes)
    }

    fn window_penalty(&self, amount: f32) -> RewardEvent {
        if self.config.window_penalties_terminal {
            RewardEvent::TakeAwayPoints(amount)
        } else {
            RewardEvent::Add(amount)
        }
    }

    /// Run the checks for one action.
    ///
    /// `direction` is the command the vehicle is currently executing.
    pub fn check(
        &mut self,
        dt: f32,
        speed: f32,
        position: Vec3,
        direction: Direction,
    ) -> Vec<RewardEvent> {
        let mut events = Vec::new();

        if speed < self.config.stationary_speed {
            self.stationary_time += dt;
            if self.stationary_time >= self.config.stationary_time {
                log::debug!("Stationary for {:.2}s", self.stationary_time);
                events.push(RewardEvent::Add(self.config.stationary_penalty));
            }
        } else {
            self.stationary_time = 0.0;
        }

        self.window_elapsed += dt;
        self.window_distance += position.distance(self.last_position);
        self.last_position = position;

        if self.window_elapsed >= self.config.check_interval {
            if self.window_distance < self.config.min_window_distance {
                log::debug!(
                    "Covered {:.2} m in {:.1}s window",
                    self.window_distance,
                    self.window_elapsed
                );
                events.push(self.window_penalty(self.config.window_distance_penalty));
            }

            let min = self.config.reversal_min_count;
            if self.forward_changes >= min && self.backward_changes >= min {
                let total = self.forward_changes + self.backward_changes;
                log::debug!("{} forward/backward reversals in window", total);
                let penalty = self.config.reversal_penalty_per_change * total as f32;
                events.push(self.window_penalty(penalty));
            }

            self.reset_window();
        }

        if direction != self.last_direction {
            match direction {
                Direction::MoveForward => self.forward_changes += 1,
                Direction::MoveBackward => self.backward_changes += 1,
                _ => {}
            }
        }
        self.last_direction = direction;

        events
    }
}
