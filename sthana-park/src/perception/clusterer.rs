//! Parking-space clustering.
//!
//! Turns the marking history into candidate parking spaces. A space is bounded
//! by three markings: an anchor `A`, a partner `B` forming an accepted angle with
//! `A` closer than `max_pair_distance`, and a third marking `C` forming an
//! accepted angle with `A` no farther than `d(A, B) + third_distance_slack`.
//! The candidate center is the centroid of the triple.
//!
//! Two passes exist:
//!
//! - **Rectangular**: pairwise angles within tolerance of 90°.
//! - **Angled**: the anchor must face `angled_anchor_yaw`, the other two
//!   markings one of `angled_side_yaws`, and pairwise angles are within
//!   tolerance of 45° or 135°.
//!
//! A candidate is rejected if any car overlaps the box spanned by the triple.
//! The check happens once, at cluster time; candidates are never re-validated.
//!
//! Each pass is O(n³) over the marking history. The history is bounded by
//! `detector.max_markings`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ClusteringSection;
use crate::core::{Vec3, approx_degrees};
use crate::world::{ObjectId, PhysicsQuery, Tag};

use super::marking::LineMarker;

/// Quantization applied to candidate centers for equality (meters).
const CENTER_QUANTUM: f32 = 1e-4;

/// Geometry class of a parking space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationClass {
    /// Bounded by markings at right angles.
    Rectangular,
    /// Bounded by markings at 45° / 135°.
    Angled,
}

impl OrientationClass {
    /// Class as its characteristic angle (90 or 45).
    pub fn degrees(self) -> u32 {
        match self {
            OrientationClass::Rectangular => 90,
            OrientationClass::Angled => 45,
        }
    }
}

/// An inferred empty parking space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateSpace {
    /// Centroid of the bounding markings.
    pub center: Vec3,
    /// Geometry class.
    pub orientation: OrientationClass,
}

impl CandidateSpace {
    /// Create a candidate.
    pub fn new(center: Vec3, orientation: OrientationClass) -> Self {
        Self {
            center,
            orientation,
        }
    }

    fn key(&self) -> (i64, i64, i64, OrientationClass) {
        let q = |v: f32| (v / CENTER_QUANTUM).round() as i64;
        (
            q(self.center.x),
            q(self.center.y),
            q(self.center.z),
            self.orientation,
        )
    }
}

/// Duplicate-free set of candidates in insertion order.
///
/// Two candidates are equal when their centers agree to within 0.1 mm and
/// their classes match.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    items: Vec<CandidateSpace>,
    keys: HashSet<(i64, i64, i64, OrientationClass)>,
}

impl CandidateSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate. Returns false if an equal one is present.
    pub fn insert(&mut self, candidate: CandidateSpace) -> bool {
        if !self.keys.insert(candidate.key()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    /// Merge another set, returning how many were new.
    pub fn merge(&mut self, other: &CandidateSet) -> usize {
        other.iter().filter(|c| self.insert(**c)).count()
    }

    /// Is an equal candidate present?
    pub fn contains(&self, candidate: &CandidateSpace) -> bool {
        self.keys.contains(&candidate.key())
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateSpace> {
        self.items.iter()
    }

    /// Candidates in insertion order.
    pub fn as_slice(&self) -> &[CandidateSpace] {
        &self.items
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all candidates.
    pub fn clear(&mut self) {
        self.items.clear();
        self.keys.clear();
    }

    /// Candidate closest to `point`. Ties go to the earliest inserted.
    pub fn nearest_to(&self, point: Vec3) -> Option<&CandidateSpace> {
        let mut best: Option<(&CandidateSpace, f32)> = None;
        for candidate in &self.items {
            let d = candidate.center.distance(point);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((candidate, d)),
            }
        }
        best.map(|(c, _)| c)
    }
}

/// Finds candidate parking spaces in a marking set.
#[derive(Clone, Debug)]
pub struct SpaceClusterer {
    config: ClusteringSection,
}

impl SpaceClusterer {
    /// Create a clusterer.
    pub fn new(config: ClusteringSection) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClusteringSection {
        &self.config
    }

    /// Run every enabled pass and merge the results.
    pub fn cluster<P: PhysicsQuery + ?Sized>(
        &self,
        markings: &[LineMarker],
        physics: &P,
    ) -> CandidateSet {
        let mut all = CandidateSet::new();
        if self.config.rectangular {
            all.merge(&self.rectangular(markings, physics));
        }
        if self.config.angled {
            all.merge(&self.angled(markings, physics));
        }
        all
    }

    /// Rectangular (90°) spaces.
    pub fn rectangular<P: PhysicsQuery + ?Sized>(
        &self,
        markings: &[LineMarker],
        physics: &P,
    ) -> CandidateSet {
        let target = self.config.rectangular_angle;
        self.search(
            markings,
            physics,
            OrientationClass::Rectangular,
            |_| true,
            |_| true,
            |angle| self.near_angle(angle, target),
        )
    }

    /// Angled (45° / 135°) spaces.
    pub fn angled<P: PhysicsQuery + ?Sized>(
        &self,
        markings: &[LineMarker],
        physics: &P,
    ) -> CandidateSet {
        let tolerance = self.config.yaw_tolerance;
        let anchor_yaw = self.config.angled_anchor_yaw;
        let side_yaws = &self.config.angled_side_yaws;
        let angles = &self.config.angled_angles;
        self.search(
            markings,
            physics,
            OrientationClass::Angled,
            |m| approx_degrees(m.yaw, anchor_yaw, tolerance),
            |m| side_yaws.iter().any(|&yaw| approx_degrees(m.yaw, yaw, tolerance)),
            |angle| angles.iter().any(|&target| self.near_angle(angle, target)),
        )
    }

    #[inline]
    fn near_angle(&self, angle: f32, target: f32) -> bool {
        (angle - target).abs() < self.config.angle_tolerance
    }

    /// Shared triple search.
    ///
    /// Each unordered seed pair is evaluated once, trying either member as the
    /// anchor. Triples are emitted once per unordered identity set. The
    /// occupancy box depends on which side marking seeds the pair, so a
    /// triple is only recorded once one of its orderings finds a free box.
    fn search<P, A, S, G>(
        &self,
        markings: &[LineMarker],
        physics: &P,
        class: OrientationClass,
        is_anchor: A,
        is_side: S,
        angle_ok: G,
    ) -> CandidateSet
    where
        P: PhysicsQuery + ?Sized,
        A: Fn(&LineMarker) -> bool,
        S: Fn(&LineMarker) -> bool,
        G: Fn(f32) -> bool,
    {
        let mut result = CandidateSet::new();
        if markings.len() < 3 {
            log::debug!(
                "{} markings, not enough for a {:?} space",
                markings.len(),
                class
            );
            return result;
        }

        let mut processed: HashSet<(ObjectId, ObjectId)> = HashSet::new();
        let mut emitted: HashSet<[ObjectId; 3]> = HashSet::new();

        for x in markings {
            for y in markings {
                if x.id == y.id || !processed.insert(pair_key(x.id, y.id)) {
                    continue;
                }

                let pair_distance = x.distance_to(y);
                if !(angle_ok(x.angle_to(y)) && pair_distance < self.config.max_pair_distance) {
                    continue;
                }

                for (a, b) in [(x, y), (y, x)] {
                    if !(is_anchor(a) && is_side(b)) {
                        continue;
                    }

                    for c in markings.iter().filter(|m| is_side(*m)) {
                        if c.id == a.id || c.id == b.id {
                            continue;
                        }
                        let third_distance = a.distance_to(c);
                        if !(angle_ok(a.angle_to(c))
                            && third_distance <= pair_distance + self.config.third_distance_slack)
                        {
                            continue;
                        }
                        let key = triple_key(a.id, b.id, c.id);
                        if emitted.contains(&key) {
                            continue;
                        }

                        let center = (a.position + b.position + c.position) / 3.0;
                        let half_extents = Vec3::new(
                            pair_distance / 2.0,
                            self.config.box_half_height,
                            third_distance / 2.0,
                        );
                        if self.is_occupied(physics, center, half_extents) {
                            log::debug!(
                                "{:?} space at ({:.2}, {:.2}) occupied, rejected",
                                class,
                                center.x,
                                center.z
                            );
                            continue;
                        }

                        emitted.insert(key);
                        if result.insert(CandidateSpace::new(center, class)) {
                            log::debug!(
                                "{:?} space at ({:.2}, {:.2}) from {} {} {}",
                                class,
                                center.x,
                                center.z,
                                a.id,
                                b.id,
                                c.id
                            );
                        }
                    }
                }
            }
        }

        result
    }

    fn is_occupied<P: PhysicsQuery + ?Sized>(
        &self,
        physics: &P,
        center: Vec3,
        half_extents: Vec3,
    ) -> bool {
        physics
            .overlap_box(center, half_extents, self.config.occupancy_layers)
            .iter()
            .any(|hit| hit.tag == Tag::Car)
    }
}

fn pair_key(a: ObjectId, b: ObjectId) -> (ObjectId, ObjectId) {
    if a <= b { (a, b) } else { (b, a) }
}

fn triple_key(a: ObjectId, b: ObjectId, c: ObjectId) -> [ObjectId; 3] {
    let mut key = [a, b, c];
    key.sort_unstable();
    key
}
