//! Kinematic vehicle for the sandbox.

use crate::agent::Direction;
use crate::core::{Pose, Vec3};
use crate::world::{DriveCommand, VehicleMotor};

/// Vehicle dynamics parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleDynamics {
    /// Acceleration while a move command is held (m/s²).
    pub acceleration: f32,
    /// Deceleration while idle or turning (m/s²).
    pub braking: f32,
    /// Yaw rate while a turn command is held (deg/s).
    pub turn_rate: f32,
}

impl Default for VehicleDynamics {
    fn default() -> Self {
        Self {
            acceleration: 4.0,
            braking: 2.0,
            turn_rate: 90.0,
        }
    }
}

/// Point-mass vehicle with a heading.
///
/// Move commands accelerate along the heading up to the command's speed cap,
/// turns rotate in place while the vehicle coasts down.
#[derive(Clone, Debug)]
pub struct SandboxVehicle {
    pose: Pose,
    /// Signed speed along the heading.
    speed: f32,
    command: DriveCommand,
    dynamics: VehicleDynamics,
}

impl SandboxVehicle {
    /// Vehicle at rest at `pose`.
    pub fn new(pose: Pose) -> Self {
        Self::with_dynamics(pose, VehicleDynamics::default())
    }

    /// Vehicle at rest with custom dynamics.
    pub fn with_dynamics(pose: Pose, dynamics: VehicleDynamics) -> Self {
        Self {
            pose,
            speed: 0.0,
            command: DriveCommand::idle(0.0),
            dynamics,
        }
    }

    /// Signed speed along the heading (m/s).
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Last applied command.
    pub fn command(&self) -> DriveCommand {
        self.command
    }

    /// Teleport without resetting the speed.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Integrate the last command over `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let cap = self.command.speed_cap.max(0.0);
        let d = &self.dynamics;
        match self.command.direction {
            Direction::MoveForward => {
                self.speed = (self.speed + d.acceleration * dt).min(cap);
            }
            Direction::MoveBackward => {
                self.speed = (self.speed - d.acceleration * dt).max(-cap);
            }
            Direction::TurnLeft | Direction::TurnRight | Direction::Idle => {
                let slowed = self.speed.abs() - d.braking * dt;
                self.speed = slowed.max(0.0).copysign(self.speed);
            }
        }

        let yaw_rate = match self.command.direction {
            Direction::TurnLeft => -d.turn_rate,
            Direction::TurnRight => d.turn_rate,
            _ => 0.0,
        };
        let yaw = self.pose.yaw + yaw_rate * dt;
        let position = self.pose.position + self.pose.forward() * (self.speed * dt);
        self.pose = Pose::new(position, yaw);
    }
}

impl VehicleMotor for SandboxVehicle {
    fn apply(&mut self, command: DriveCommand) {
        self.command = command;
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn velocity(&self) -> Vec3 {
        self.pose.forward() * self.speed
    }

    fn halt(&mut self) {
        self.speed = 0.0;
        self.command = DriveCommand::idle(self.command.speed_cap);
    }

    fn reset_to(&mut self, pose: Pose) {
        self.pose = pose;
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn start() -> SandboxVehicle {
        SandboxVehicle::new(Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0))
    }

    #[test]
    fn test_forward_respects_cap() {
        let mut v = start();
        v.apply(DriveCommand::new(Direction::MoveForward, 1.0));
        for _ in 0..10 {
            v.step(0.1);
        }
        assert_relative_eq!(v.speed(), 1.0);
        assert!(v.pose().position.z > 0.5);
        assert_relative_eq!(v.velocity().z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_backward() {
        let mut v = start();
        v.apply(DriveCommand::new(Direction::MoveBackward, 2.0));
        v.step(0.25);
        assert_relative_eq!(v.speed(), -1.0);
        assert!(v.pose().position.z < 0.0);
    }

    #[test]
    fn test_turns_change_heading() {
        let mut v = start();
        v.apply(DriveCommand::new(Direction::TurnRight, 2.0));
        v.step(0.5);
        assert_relative_eq!(v.pose().yaw, 45.0, epsilon = 1e-4);
        v.apply(DriveCommand::new(Direction::TurnLeft, 2.0));
        v.step(1.0);
        assert_relative_eq!(v.pose().yaw, 315.0, epsilon = 1e-4);
    }

    #[test]
    fn test_idle_coasts_to_stop() {
        let mut v = start();
        v.apply(DriveCommand::new(Direction::MoveForward, 2.0));
        v.step(0.5);
        v.apply(DriveCommand::idle(2.0));
        v.step(0.5);
        assert_relative_eq!(v.speed(), 1.0);
        v.step(1.0);
        assert_eq!(v.speed(), 0.0);
    }

    #[test]
    fn test_reset_to_stops() {
        let mut v = start();
        v.apply(DriveCommand::new(Direction::MoveForward, 2.0));
        v.step(0.5);
        let target = Pose::new(Vec3::new(3.0, 0.5, 3.0), 90.0);
        v.reset_to(target);
        assert_eq!(v.pose(), target);
        assert_eq!(v.velocity(), Vec3::ZERO);
        assert_eq!(v.command().direction, Direction::Idle);
    }
}
