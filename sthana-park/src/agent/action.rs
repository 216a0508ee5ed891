//! Discrete movement actions.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Movement requested from the vehicle for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// No input.
    #[default]
    Idle,
    /// Accelerate forward.
    MoveForward,
    /// Accelerate backward.
    MoveBackward,
    /// Yaw left.
    TurnLeft,
    /// Yaw right.
    TurnRight,
}

impl Direction {
    /// All actions in index order.
    pub const ALL: [Direction; 5] = [
        Direction::Idle,
        Direction::MoveForward,
        Direction::MoveBackward,
        Direction::TurnLeft,
        Direction::TurnRight,
    ];

    /// Action index of this direction.
    pub fn index(self) -> i32 {
        match self {
            Direction::Idle => 0,
            Direction::MoveForward => 1,
            Direction::MoveBackward => 2,
            Direction::TurnLeft => 3,
            Direction::TurnRight => 4,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = ActionError;

    fn try_from(action: i32) -> Result<Self, Self::Error> {
        match action {
            0 => Ok(Direction::Idle),
            1 => Ok(Direction::MoveForward),
            2 => Ok(Direction::MoveBackward),
            3 => Ok(Direction::TurnLeft),
            4 => Ok(Direction::TurnRight),
            other => Err(ActionError::OutOfRange(other)),
        }
    }
}
