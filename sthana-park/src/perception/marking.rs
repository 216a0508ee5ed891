//! Detected floor markings and the per-episode marking history.

use std::collections::HashSet;

use crate::core::{Pose, Vec3, direction_from_yaw};
use crate::world::ObjectId;

/// A painted floor marking struck by a detector ray.
///
/// Immutable once detected. The position and heading are the marking object's
/// own pose, not the ray contact point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMarker {
    /// Identity of the marking object.
    pub id: ObjectId,
    /// World position of the marking.
    pub position: Vec3,
    /// Heading of the marking (degrees).
    pub yaw: f32,
}

impl LineMarker {
    /// Create a marker.
    pub fn new(id: ObjectId, position: Vec3, yaw: f32) -> Self {
        Self { id, position, yaw }
    }

    /// Build from the pose of the struck object.
    pub fn from_pose(id: ObjectId, pose: Pose) -> Self {
        Self::new(id, pose.position, pose.yaw)
    }

    /// Forward vector of the marking.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        direction_from_yaw(self.yaw)
    }

    /// Angle between the forward vectors of two markings (degrees, 0..=180).
    #[inline]
    pub fn angle_to(&self, other: &LineMarker) -> f32 {
        self.forward().angle(other.forward())
    }

    /// Euclidean distance between two markings.
    #[inline]
    pub fn distance_to(&self, other: &LineMarker) -> f32 {
        self.position.distance(other.position)
    }
}

/// Markings seen during one episode.
///
/// Merged by identity in insertion order. Growth stops at `capacity`; later
/// identities are dropped and the first overflow is logged.
#[derive(Clone, Debug)]
pub struct MarkingSet {
    markers: Vec<LineMarker>,
    seen: HashSet<ObjectId>,
    capacity: usize,
    overflow_logged: bool,
}

impl MarkingSet {
    /// Create an empty set holding at most `capacity` markings.
    pub fn new(capacity: usize) -> Self {
        Self {
            markers: Vec::with_capacity(capacity.min(256)),
            seen: HashSet::with_capacity(capacity.min(256)),
            capacity,
            overflow_logged: false,
        }
    }

    /// Add a marking. Returns true if it was new and accepted.
    pub fn insert(&mut self, marker: LineMarker) -> bool {
        if self.seen.contains(&marker.id) {
            return false;
        }
        if self.markers.len() >= self.capacity {
            if !self.overflow_logged {
                log::warn!(
                    "Marking history full ({} entries), ignoring {} and later markings",
                    self.capacity,
                    marker.id
                );
                self.overflow_logged = true;
            }
            return false;
        }
        self.seen.insert(marker.id);
        self.markers.push(marker);
        true
    }

    /// Merge markings, returning how many were new.
    pub fn extend<I: IntoIterator<Item = LineMarker>>(&mut self, markers: I) -> usize {
        markers.into_iter().filter(|m| self.insert(*m)).count()
    }

    /// Has this identity been recorded?
    pub fn contains(&self, id: ObjectId) -> bool {
        self.seen.contains(&id)
    }

    /// Markings in insertion order.
    pub fn as_slice(&self) -> &[LineMarker] {
        &self.markers
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineMarker> {
        self.markers.iter()
    }

    /// Number of markings.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True if no marking has been recorded.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Maximum number of markings kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget everything (episode reset).
    pub fn clear(&mut self) {
        self.markers.clear();
        self.seen.clear();
        self.overflow_logged = false;
    }
}
