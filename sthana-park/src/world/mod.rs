//! Interfaces to the host simulation.
//!
//! Physics, rendering and object lifecycle live outside this crate. The agent
//! only talks to them through the traits below, wired once at construction:
//!
//! - [`PhysicsQuery`]: sphere casts, box overlaps, object poses
//! - [`SceneObjects`]: spawn/destroy goal markers, episode feedback
//! - [`VehicleMotor`]: movement commands in, pose and velocity out
//!
//! [`crate::sandbox`] provides in-memory implementations for tests and demos.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent::Direction;
use crate::core::{Pose, Vec3};

/// Stable identity of a scene object, assigned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic tag carried by scene objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Painted floor marking bounding a parking space.
    Line,
    /// Parked vehicle.
    Car,
    /// Placed goal marker.
    Goal,
    /// Ground highlight paired with a goal.
    Highlight,
    /// Walking pedestrian.
    Pedestrian,
    /// Barrier / wall.
    Barrier,
    /// Tree.
    Tree,
    /// Off-path grass.
    Grass,
    /// The agent's own vehicle.
    Player,
    /// Anything else.
    Other,
}

/// Bit set of physics layers a query is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: LayerMask = LayerMask(0);
    /// Default layer for untagged geometry.
    pub const DEFAULT: LayerMask = LayerMask(1 << 0);
    /// Painted floor markings.
    pub const MARKINGS: LayerMask = LayerMask(1 << 1);
    /// Parked cars and other occupants of the parking rows.
    pub const PARKING_GROUP: LayerMask = LayerMask(1 << 2);
    /// Pedestrians.
    pub const PEDESTRIANS: LayerMask = LayerMask(1 << 3);
    /// Barriers, trees, grass.
    pub const OBSTACLES: LayerMask = LayerMask(1 << 4);
    /// Goal markers and highlights.
    pub const GOALS: LayerMask = LayerMask(1 << 5);
    /// Matches everything.
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Does this mask share any layer with `other`?
    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two masks.
    #[inline]
    pub const fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// First object struck by a sphere cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastHit {
    /// Identity of the struck object.
    pub object: ObjectId,
    /// Tag of the struck object.
    pub tag: Tag,
    /// Contact point along the cast.
    pub point: Vec3,
    /// Distance travelled by the sphere before contact.
    pub distance: f32,
    /// Pose of the struck object itself.
    pub object_pose: Pose,
}

/// Object found by an overlap query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlapHit {
    /// Identity of the overlapping object.
    pub object: ObjectId,
    /// Tag of the overlapping object.
    pub tag: Tag,
}

/// Spatial queries against the host physics.
pub trait PhysicsQuery {
    /// Sweep a sphere of `radius` from `origin` along `direction` (normalized by
    /// the implementation) up to `max_distance`, returning the first object hit
    /// on any of `layers`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<CastHit>;

    /// All objects on `layers` whose bounds intersect the axis-aligned box.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> Vec<OverlapHit>;

    /// Current pose of a live object.
    fn object_pose(&self, id: ObjectId) -> Option<Pose>;
}

/// Kind of marker the agent asks the host to materialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Goal trigger volume, tagged `goal`.
    Goal,
    /// Ground highlight, tagged `highlight`.
    Highlight,
}

impl MarkerKind {
    /// Tag the host should attach to the spawned object.
    pub fn tag(self) -> Tag {
        match self {
            MarkerKind::Goal => Tag::Goal,
            MarkerKind::Highlight => Tag::Highlight,
        }
    }
}

/// Visual feedback shown when an episode ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeFeedback {
    /// Parked and aligned.
    Success,
    /// Parked but not aligned.
    PartialSuccess,
    /// Episode failed.
    Failure,
}

/// Object lifecycle owned by the host.
pub trait SceneObjects {
    /// Create a tagged marker at `pose`. `None` if the host cannot create it.
    fn spawn_marker(&mut self, kind: MarkerKind, pose: Pose) -> Option<ObjectId>;

    /// Destroy an object. Unknown identities are ignored.
    fn despawn(&mut self, id: ObjectId);

    /// Whether the object still exists and is enabled.
    fn is_alive(&self, id: ObjectId) -> bool;

    /// Enable or disable an object by identity.
    fn set_enabled(&mut self, id: ObjectId, enabled: bool);

    /// Swap the ground visual to signal an episode outcome.
    fn show_feedback(&mut self, feedback: EpisodeFeedback);
}

/// Movement command for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveCommand {
    /// Requested movement.
    pub direction: Direction,
    /// Maximum speed the motor may reach for this phase.
    pub speed_cap: f32,
}

impl DriveCommand {
    /// Create a command.
    pub fn new(direction: Direction, speed_cap: f32) -> Self {
        Self {
            direction,
            speed_cap,
        }
    }

    /// Idle command.
    pub fn idle(speed_cap: f32) -> Self {
        Self::new(Direction::Idle, speed_cap)
    }
}

/// Vehicle physics owned by the host.
pub trait VehicleMotor {
    /// Apply the movement command for this tick.
    fn apply(&mut self, command: DriveCommand);

    /// Current pose (local to the parking area).
    fn pose(&self) -> Pose;

    /// Current linear velocity.
    fn velocity(&self) -> Vec3;

    /// Zero linear and angular motion.
    fn halt(&mut self);

    /// Teleport to `pose` with zero motion.
    fn reset_to(&mut self, pose: Pose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_intersects() {
        let mask = LayerMask::MARKINGS.union(LayerMask::PEDESTRIANS);
        assert!(mask.intersects(LayerMask::MARKINGS));
        assert!(mask.intersects(LayerMask::PEDESTRIANS));
        assert!(!mask.intersects(LayerMask::PARKING_GROUP));
        assert!(LayerMask::ALL.intersects(LayerMask::GOALS));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn test_marker_kind_tags() {
        assert_eq!(MarkerKind::Goal.tag(), Tag::Goal);
        assert_eq!(MarkerKind::Highlight.tag(), Tag::Highlight);
    }

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId(42).to_string(), "#42");
    }
}
