//! End-of-episode sequence as deferred work on the tick loop.
//!
//! When an episode ends the vehicle may first drive toward the selected goal,
//! then stops, shows feedback and finalizes pedestrian scoring after fixed
//! delays. Steps are timers processed by [`EndSequence::advance`]; nothing
//! blocks and nothing runs on another thread.
//!
//! Every step carries the episode generation it was scheduled for. A reset
//! bumps the generation, so steps left over from an earlier episode are
//! dropped when they come due instead of acting on the new episode.

use std::collections::VecDeque;

use crate::config::EpisodeSection;
use crate::core::{Pose, Vec3};
use crate::world::EpisodeFeedback;

use super::action::Direction;

/// Side effect the agent performs for a due step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequenceAction {
    /// Steer toward the selected goal for this tick.
    Steer(Direction),
    /// Zero vehicle motion.
    Halt,
    /// Swap the ground visual.
    ShowFeedback(EpisodeFeedback),
    /// Add the pedestrian monitor's final score.
    FinalizePedestrians,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    ShowFeedback(EpisodeFeedback),
    FinalizePedestrians,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due: f32,
    generation: u64,
    step: Step,
}

#[derive(Clone, Copy, Debug)]
struct DrivePhase {
    target: Option<Vec3>,
    elapsed: f32,
    generation: u64,
    feedback: EpisodeFeedback,
}

/// Timer queue for the end-of-episode sequence.
#[derive(Clone, Debug)]
pub struct EndSequence {
    config: EpisodeSection,
    clock: f32,
    generation: u64,
    queue: VecDeque<Scheduled>,
    drive: Option<DrivePhase>,
}

impl EndSequence {
    /// Create an idle sequence.
    pub fn new(config: EpisodeSection) -> Self {
        Self {
            config,
            clock: 0.0,
            generation: 0,
            queue: VecDeque::new(),
            drive: None,
        }
    }

    /// Enter episode `generation`. Pending steps from earlier generations
    /// stay queued and are discarded when due.
    pub fn reset(&mut self, generation: u64) {
        self.generation = generation;
        if self.drive.is_some_and(|drive| drive.generation != generation) {
            log::debug!("Abandoning drive phase from an earlier episode");
            self.drive = None;
        }
    }

    /// Current episode generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Steps still queued, stale ones included.
    pub fn pending(&self) -> usize {
        self.queue.len() + usize::from(self.drive.is_some())
    }

    /// Is any step pending?
    pub fn is_active(&self) -> bool {
        self.pending() > 0
    }

    /// Is the vehicle being driven toward the goal?
    pub fn is_driving(&self) -> bool {
        self.drive.is_some()
    }

    /// Schedule the sequence for `generation`.
    ///
    /// With a `drive_target` the vehicle is steered there first; otherwise
    /// it halts on the next advance.
    pub fn start(
        &mut self,
        generation: u64,
        feedback: EpisodeFeedback,
        drive_target: Option<Vec3>,
    ) {
        let target = drive_target.filter(|_| self.config.drive_to_goal);
        log::debug!(
            "End sequence scheduled for episode {} ({:?}, drive: {})",
            generation,
            feedback,
            target.is_some()
        );
        self.drive = Some(DrivePhase {
            target,
            elapsed: 0.0,
            generation,
            feedback,
        });
    }

    fn schedule(&mut self, delay: f32, generation: u64, step: Step) {
        let due = self.clock + delay;
        let index = self
            .queue
            .iter()
            .position(|scheduled| scheduled.due > due)
            .unwrap_or(self.queue.len());
        self.queue.insert(
            index,
            Scheduled {
                due,
                generation,
                step,
            },
        );
    }

    /// Advance the clock by `dt` and return the actions now due.
    pub fn advance(&mut self, dt: f32, vehicle: Pose) -> Vec<SequenceAction> {
        self.clock += dt;
        let mut actions = Vec::new();

        if let Some(mut drive) = self.drive.take() {
            if drive.generation != self.generation {
                log::warn!(
                    "Dropping drive phase from episode {} (now {})",
                    drive.generation,
                    self.generation
                );
            } else if let Some(direction) = self.drive_step(&mut drive, dt, vehicle) {
                actions.push(SequenceAction::Steer(direction));
                self.drive = Some(drive);
            } else {
                actions.push(SequenceAction::Halt);
                self.schedule(
                    self.config.feedback_delay,
                    drive.generation,
                    Step::ShowFeedback(drive.feedback),
                );
                self.schedule(
                    self.config.finalize_delay,
                    drive.generation,
                    Step::FinalizePedestrians,
                );
            }
        }

        while let Some(next) = self.queue.front() {
            if next.due > self.clock {
                break;
            }
            let Some(scheduled) = self.queue.pop_front() else {
                break;
            };
            if scheduled.generation != self.generation {
                log::warn!(
                    "Dropping stale {:?} from episode {} (now {})",
                    scheduled.step,
                    scheduled.generation,
                    self.generation
                );
                continue;
            }
            actions.push(match scheduled.step {
                Step::ShowFeedback(feedback) => SequenceAction::ShowFeedback(feedback),
                Step::FinalizePedestrians => SequenceAction::FinalizePedestrians,
            });
        }

        actions
    }

    /// Steering for one tick of the drive phase, `None` once it is over.
    fn drive_step(&self, drive: &mut DrivePhase, dt: f32, vehicle: Pose) -> Option<Direction> {
        let target = drive.target?;
        let to_target = (target - vehicle.position).flattened();
        if to_target.length() <= self.config.arrive_distance {
            log::debug!("Reached selected goal after {:.2}s", drive.elapsed);
            return None;
        }
        if drive.elapsed >= self.config.drive_timeout {
            log::warn!(
                "Timed out driving to goal, {:.2} m left after {:.1}s",
                to_target.length(),
                drive.elapsed
            );
            return None;
        }
        drive.elapsed += dt;

        let bearing = vehicle.forward().flattened().signed_angle(to_target, Vec3::UP);
        Some(if bearing > self.config.steer_tolerance {
            Direction::TurnRight
        } else if bearing < -self.config.steer_tolerance {
            Direction::TurnLeft
        } else {
            Direction::MoveForward
        })
    }
}
