//! Goal placement for candidate parking spaces.

use crate::config::GoalsSection;
use crate::core::{Pose, Vec3};
use crate::perception::{CandidateSet, CandidateSpace, OrientationClass};
use crate::world::{MarkerKind, SceneObjects};

use super::arena::{GoalArena, GoalId};

/// Places one goal and highlight per candidate, keeping goals apart.
#[derive(Clone, Debug)]
pub struct GoalAllocator {
    config: GoalsSection,
    arena: GoalArena,
}

impl GoalAllocator {
    /// Create an allocator with an empty arena.
    pub fn new(config: GoalsSection) -> Self {
        Self {
            config,
            arena: GoalArena::new(),
        }
    }

    /// Placed goals.
    pub fn arena(&self) -> &GoalArena {
        &self.arena
    }

    /// Placed goals, mutable.
    pub fn arena_mut(&mut self) -> &mut GoalArena {
        &mut self.arena
    }

    /// Tombstone goals the host no longer reports alive.
    ///
    /// Returns the number of entries tombstoned.
    pub fn prune<W: SceneObjects + ?Sized>(&mut self, scene: &W) -> usize {
        let dead: Vec<GoalId> = self
            .arena
            .live()
            .filter(|entry| !scene.is_alive(entry.goal))
            .map(|entry| entry.id)
            .collect();
        for id in &dead {
            log::debug!("Goal {} vanished from the scene", id);
            self.arena.tombstone(*id);
        }
        dead.len()
    }

    /// Place goals for every candidate not already covered.
    ///
    /// Returns the number of goals placed.
    pub fn place<W: SceneObjects + ?Sized>(
        &mut self,
        scene: &mut W,
        candidates: &CandidateSet,
    ) -> usize {
        self.prune(&*scene);
        let mut placed = 0;
        for candidate in candidates.iter() {
            if self.place_one(&mut *scene, candidate).is_some() {
                placed += 1;
            }
        }
        placed
    }

    /// Place a goal for one candidate unless a live goal is within
    /// `min_separation`.
    pub fn place_one<W: SceneObjects + ?Sized>(
        &mut self,
        scene: &mut W,
        candidate: &CandidateSpace,
    ) -> Option<GoalId> {
        if self.arena.any_within(candidate.center, self.config.min_separation) {
            log::trace!(
                "Candidate at ({:.2}, {:.2}) already has a goal nearby",
                candidate.center.x,
                candidate.center.z
            );
            return None;
        }

        let yaw = match candidate.orientation {
            OrientationClass::Angled => self.config.angled_yaw,
            OrientationClass::Rectangular => 0.0,
        };
        let goal_position = candidate.center + Vec3::UP * self.config.height_offset;
        let Some(goal) = scene.spawn_marker(MarkerKind::Goal, Pose::new(goal_position, yaw)) else {
            log::warn!(
                "Host refused to spawn a goal at ({:.2}, {:.2})",
                goal_position.x,
                goal_position.z
            );
            return None;
        };

        let highlight_position = Vec3::new(
            candidate.center.x,
            self.config.highlight_height,
            candidate.center.z,
        );
        let highlight =
            scene.spawn_marker(MarkerKind::Highlight, Pose::new(highlight_position, yaw));
        if highlight.is_none() {
            log::warn!("Host refused to spawn a highlight for goal {}", goal);
        }

        let id = self
            .arena
            .insert(goal, highlight, goal_position, yaw, candidate.orientation);
        log::info!(
            "Placed {} ({:?}) at ({:.2}, {:.2})",
            id,
            candidate.orientation,
            goal_position.x,
            goal_position.z
        );
        Some(id)
    }

    /// Destroy every placed marker and clear the arena.
    pub fn reset<W: SceneObjects + ?Sized>(&mut self, scene: &mut W) {
        for entry in self.arena.entries() {
            scene.despawn(entry.goal);
            if let Some(highlight) = entry.highlight {
                scene.despawn(highlight);
            }
        }
        let count = self.arena.entries().len();
        self.arena.clear();
        log::debug!("Removed {} placed goals", count);
    }
}
