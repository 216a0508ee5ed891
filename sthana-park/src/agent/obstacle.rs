//! Obstacle collision categories and their penalties.

use serde::{Deserialize, Serialize};

use crate::config::ObstaclesSection;
use crate::world::Tag;

use super::state::RewardEvent;

/// What the vehicle collided with, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleCategory {
    /// Road barrier.
    Barrier,
    /// Roadside tree.
    Tree,
    /// Off-path grass.
    Grass,
    /// Entered a pedestrian's proximity volume.
    PedestrianContact,
    /// Entered the trigger volume around a parked car.
    ParkedCarContact,
    /// Solid collision with a parked car.
    ParkedCarCollision,
    /// Anything else; ignored.
    Unknown,
}

impl ObstacleCategory {
    /// Category for a collider tag. Parked cars map to a solid collision.
    pub fn from_tag(tag: Tag) -> Self {
        match tag {
            Tag::Barrier => ObstacleCategory::Barrier,
            Tag::Tree => ObstacleCategory::Tree,
            Tag::Grass => ObstacleCategory::Grass,
            Tag::Pedestrian => ObstacleCategory::PedestrianContact,
            Tag::Car => ObstacleCategory::ParkedCarCollision,
            _ => ObstacleCategory::Unknown,
        }
    }

    /// Does hitting this category end the episode?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ObstacleCategory::ParkedCarContact | ObstacleCategory::ParkedCarCollision
        )
    }

    /// Reward event for a hit, `None` for unknown categories.
    pub fn penalty(self, config: &ObstaclesSection) -> Option<RewardEvent> {
        let amount = match self {
            ObstacleCategory::Barrier => config.barrier,
            ObstacleCategory::Tree => config.tree,
            ObstacleCategory::Grass => config.grass,
            ObstacleCategory::PedestrianContact => config.pedestrian_contact,
            ObstacleCategory::ParkedCarContact => config.parked_car_contact,
            ObstacleCategory::ParkedCarCollision => config.parked_car_collision,
            ObstacleCategory::Unknown => return None,
        };
        Some(if self.is_terminal() {
            RewardEvent::TakeAwayPoints(amount)
        } else {
            RewardEvent::Add(amount)
        })
    }
}
