//! Placed goal markers keyed by stable identifiers.
//!
//! Entries are never moved or reused within an episode. A goal whose object
//! disappears from the scene is tombstoned so its identifier stays valid and
//! lookups by object identity keep failing cleanly.

use std::collections::HashMap;
use std::fmt;

use crate::core::Vec3;
use crate::perception::OrientationClass;
use crate::world::ObjectId;

/// Identifier of a placed goal, stable for the episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoalId(pub usize);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "goal-{}", self.0)
    }
}

/// A goal marker and its ground highlight.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGoal {
    /// Arena identifier.
    pub id: GoalId,
    /// Goal trigger object.
    pub goal: ObjectId,
    /// Paired highlight object, if the host created one.
    pub highlight: Option<ObjectId>,
    /// World position of the goal marker.
    pub position: Vec3,
    /// Marker heading (degrees).
    pub yaw: f32,
    /// Class of the candidate the goal was placed for.
    pub orientation: OrientationClass,
    /// Already scored this episode.
    pub used: bool,
    alive: bool,
}

impl PlacedGoal {
    /// Is the entry still live (not tombstoned)?
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Arena of placed goals.
#[derive(Clone, Debug, Default)]
pub struct GoalArena {
    entries: Vec<PlacedGoal>,
    by_object: HashMap<ObjectId, GoalId>,
}

impl GoalArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly placed goal.
    pub fn insert(
        &mut self,
        goal: ObjectId,
        highlight: Option<ObjectId>,
        position: Vec3,
        yaw: f32,
        orientation: OrientationClass,
    ) -> GoalId {
        let id = GoalId(self.entries.len());
        self.entries.push(PlacedGoal {
            id,
            goal,
            highlight,
            position,
            yaw,
            orientation,
            used: false,
            alive: true,
        });
        self.by_object.insert(goal, id);
        id
    }

    /// Entry by identifier, tombstoned or not.
    pub fn get(&self, id: GoalId) -> Option<&PlacedGoal> {
        self.entries.get(id.0)
    }

    /// Live entry for a goal object.
    pub fn find_by_object(&self, object: ObjectId) -> Option<&PlacedGoal> {
        self.by_object
            .get(&object)
            .and_then(|id| self.entries.get(id.0))
            .filter(|entry| entry.alive)
    }

    /// Tombstone an entry. Returns false if it was already dead or unknown.
    pub fn tombstone(&mut self, id: GoalId) -> bool {
        match self.entries.get_mut(id.0) {
            Some(entry) if entry.alive => {
                entry.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Flag a live goal as scored. Returns false if it was already used, dead
    /// or unknown.
    pub fn mark_used(&mut self, id: GoalId) -> bool {
        match self.entries.get_mut(id.0) {
            Some(entry) if entry.alive && !entry.used => {
                entry.used = true;
                true
            }
            _ => false,
        }
    }

    /// Live entries in placement order.
    pub fn live(&self) -> impl Iterator<Item = &PlacedGoal> {
        self.entries.iter().filter(|e| e.alive)
    }

    /// Number of live entries.
    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// All entries including tombstones.
    pub fn entries(&self) -> &[PlacedGoal] {
        &self.entries
    }

    /// True if nothing live is placed.
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Is any live goal closer than `radius` to `point`?
    pub fn any_within(&self, point: Vec3, radius: f32) -> bool {
        self.live().any(|e| e.position.distance(point) < radius)
    }

    /// Drop every entry, tombstones included.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_object.clear();
    }
}
