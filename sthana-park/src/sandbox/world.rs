//! In-memory scene of axis-aligned boxes.

use std::collections::BTreeMap;

use crate::core::{Pose, Vec3};
use crate::world::{
    CastHit, EpisodeFeedback, LayerMask, MarkerKind, ObjectId, OverlapHit, PhysicsQuery,
    SceneObjects, Tag,
};

/// Painted line thickness (half width, meters).
const LINE_HALF_WIDTH: f32 = 0.05;
/// Painted line height above the floor (half height, meters).
const LINE_HALF_HEIGHT: f32 = 0.01;

/// One object of the sandbox scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SandboxObject {
    /// Identity.
    pub id: ObjectId,
    /// Semantic tag.
    pub tag: Tag,
    /// Physics layer (a single bit).
    pub layer: LayerMask,
    /// Pose reported to queries.
    pub pose: Pose,
    /// Half extents in the object's own frame.
    pub half_extents: Vec3,
    /// Disabled objects are invisible to queries.
    pub enabled: bool,
}

impl SandboxObject {
    /// World-space axis-aligned half extents of the rotated box.
    pub fn aabb_half_extents(&self) -> Vec3 {
        let (sin, cos) = self.pose.yaw.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Vec3::new(
            cos * self.half_extents.x + sin * self.half_extents.z,
            self.half_extents.y,
            sin * self.half_extents.x + cos * self.half_extents.z,
        )
    }

    fn aabb(&self) -> (Vec3, Vec3) {
        let half = self.aabb_half_extents();
        (self.pose.position - half, self.pose.position + half)
    }
}

/// Scene used by tests and the demo in place of a game engine.
///
/// Boxes are queried as axis-aligned bounds of their rotated extents. Sphere
/// casts are ray casts against the bounds inflated by the radius; a cast
/// starting inside a box ignores that box.
#[derive(Clone, Debug, Default)]
pub struct SandboxWorld {
    objects: BTreeMap<ObjectId, SandboxObject>,
    next_id: u64,
    feedback: Vec<EpisodeFeedback>,
    markers: Vec<(ObjectId, MarkerKind)>,
}

impl SandboxWorld {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box and return its identity.
    pub fn add_box(
        &mut self,
        tag: Tag,
        layer: LayerMask,
        pose: Pose,
        half_extents: Vec3,
    ) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(
            id,
            SandboxObject {
                id,
                tag,
                layer,
                pose,
                half_extents,
                enabled: true,
            },
        );
        id
    }

    /// Paint a floor marking of `length` centered at `center` along `yaw`.
    pub fn add_line(&mut self, center: Vec3, yaw: f32, length: f32) -> ObjectId {
        self.add_box(
            Tag::Line,
            LayerMask::MARKINGS,
            Pose::new(Vec3::new(center.x, LINE_HALF_HEIGHT, center.z), yaw),
            Vec3::new(LINE_HALF_WIDTH, LINE_HALF_HEIGHT, length / 2.0),
        )
    }

    /// Park a car with its center at `center` (floor level) facing `yaw`.
    pub fn add_car(&mut self, center: Vec3, yaw: f32) -> ObjectId {
        self.add_box(
            Tag::Car,
            LayerMask::PARKING_GROUP,
            Pose::new(Vec3::new(center.x, 0.75, center.z), yaw),
            Vec3::new(0.9, 0.75, 2.2),
        )
    }

    /// Place a pedestrian standing at `position` (floor level).
    pub fn add_pedestrian(&mut self, position: Vec3) -> ObjectId {
        self.add_box(
            Tag::Pedestrian,
            LayerMask::PEDESTRIANS,
            Pose::new(Vec3::new(position.x, 0.9, position.z), 0.0),
            Vec3::new(0.3, 0.9, 0.3),
        )
    }

    /// Add a static obstacle (barrier, tree, grass patch).
    pub fn add_obstacle(&mut self, tag: Tag, center: Vec3, half_extents: Vec3) -> ObjectId {
        self.add_box(tag, LayerMask::OBSTACLES, Pose::new(center, 0.0), half_extents)
    }

    /// Paint a row of rectangular spaces.
    ///
    /// The row is laid out in the frame of `row`: space `i` is centered at
    /// local `(i * width, depth / 2)` and opens towards local -Z. Each space has
    /// a back line at local `z = depth` and side lines shared with its
    /// neighbours. Spaces listed in `occupied` get a parked car. Returns the
    /// floor-level center of every space.
    pub fn add_rectangular_row(
        &mut self,
        row: Pose,
        spaces: usize,
        width: f32,
        depth: f32,
        occupied: &[usize],
    ) -> Vec<Vec3> {
        let mut centers = Vec::with_capacity(spaces);
        for i in 0..=spaces {
            let side = row.transform_point(Vec3::new((i as f32 - 0.5) * width, 0.0, depth / 2.0));
            self.add_line(side, row.yaw, depth);
        }
        for i in 0..spaces {
            let back = row.transform_point(Vec3::new(i as f32 * width, 0.0, depth));
            self.add_line(back, row.yaw + 90.0, width);
            let center = row.transform_point(Vec3::new(i as f32 * width, 0.0, depth / 2.0));
            if occupied.contains(&i) {
                self.add_car(center, row.yaw);
            }
            centers.push(center);
        }
        centers
    }

    /// Paint a row of angled spaces along +Z, extending towards +X.
    ///
    /// Each space has its own curb segment along the row at `origin.x` and two
    /// 45° side lines shared with its neighbours. Returns the floor-level
    /// center of every space. A `spacing` of 4 m or more keeps parked cars
    /// out of the neighbouring spaces.
    pub fn add_angled_row(
        &mut self,
        origin: Vec3,
        spaces: usize,
        spacing: f32,
        occupied: &[usize],
    ) -> Vec<Vec3> {
        let side_offset = spacing / 2.0;
        let mut centers = Vec::with_capacity(spaces);
        for i in 0..=spaces {
            let z = origin.z + (i as f32 - 0.5) * spacing;
            self.add_line(Vec3::new(origin.x + side_offset, 0.0, z), 45.0, spacing * 1.2);
        }
        for i in 0..spaces {
            let z = origin.z + i as f32 * spacing;
            self.add_line(Vec3::new(origin.x, 0.0, z), 0.0, spacing * 0.8);
            let center = Vec3::new(origin.x + side_offset * 2.0 / 3.0, 0.0, z);
            if occupied.contains(&i) {
                self.add_car(center, 45.0);
            }
            centers.push(center);
        }
        centers
    }

    /// Object by identity.
    pub fn object(&self, id: ObjectId) -> Option<&SandboxObject> {
        self.objects.get(&id)
    }

    /// All objects in identity order.
    pub fn objects(&self) -> impl Iterator<Item = &SandboxObject> {
        self.objects.values()
    }

    /// Live objects carrying `tag`.
    pub fn tagged(&self, tag: Tag) -> impl Iterator<Item = &SandboxObject> + '_ {
        self.objects
            .values()
            .filter(move |object| object.tag == tag && object.enabled)
    }

    /// Move an object. Returns false for unknown identities.
    pub fn set_pose(&mut self, id: ObjectId, pose: Pose) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.pose = pose;
                true
            }
            None => false,
        }
    }

    /// Every feedback shown so far, oldest first.
    pub fn feedback_history(&self) -> &[EpisodeFeedback] {
        &self.feedback
    }

    /// Most recent feedback.
    pub fn last_feedback(&self) -> Option<EpisodeFeedback> {
        self.feedback.last().copied()
    }

    /// Markers spawned through [`SceneObjects`], including destroyed ones.
    pub fn spawned_markers(&self) -> &[(ObjectId, MarkerKind)] {
        &self.markers
    }

    /// Objects whose bounds touch a box of `half_extents` around `pose`,
    /// on any layer. Hosts use this to raise goal and obstacle triggers.
    pub fn contacts(&self, pose: Pose, half_extents: Vec3) -> Vec<OverlapHit> {
        let probe = SandboxObject {
            id: ObjectId(0),
            tag: Tag::Player,
            layer: LayerMask::ALL,
            pose,
            half_extents,
            enabled: true,
        };
        self.overlap_box(pose.position, probe.aabb_half_extents(), LayerMask::ALL)
    }

    fn visible(&self, layers: LayerMask) -> impl Iterator<Item = &SandboxObject> + '_ {
        self.objects
            .values()
            .filter(move |object| object.enabled && object.layer.intersects(layers))
    }
}

/// Entry distance of a ray into an axis-aligned box (slab method).
///
/// `None` if the ray misses, starts inside, or enters beyond `max_distance`.
fn ray_box_entry(
    origin: Vec3,
    direction: Vec3,
    min: Vec3,
    max: Vec3,
    max_distance: f32,
) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for (o, d, lo, hi) in [
        (origin.x, direction.x, min.x, max.x),
        (origin.y, direction.y, min.y, max.y),
        (origin.z, direction.z, min.z, max.z),
    ] {
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a <= b { (a, b) } else { (b, a) }
        };
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > max_distance {
        None
    } else {
        Some(t_enter)
    }
}

impl PhysicsQuery for SandboxWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<CastHit> {
        let direction = direction.normalized();
        if direction == Vec3::ZERO {
            return None;
        }
        let inflate = Vec3::new(radius, radius, radius);

        let mut best: Option<(f32, &SandboxObject)> = None;
        for object in self.visible(layers) {
            let (min, max) = object.aabb();
            let Some(t) = ray_box_entry(
                origin,
                direction,
                min - inflate,
                max + inflate,
                max_distance,
            ) else {
                continue;
            };
            if best.is_none_or(|(closest, _)| t < closest) {
                best = Some((t, object));
            }
        }

        best.map(|(distance, object)| CastHit {
            object: object.id,
            tag: object.tag,
            point: origin + direction * distance,
            distance,
            object_pose: object.pose,
        })
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> Vec<OverlapHit> {
        let (min, max) = (center - half_extents, center + half_extents);
        self.visible(layers)
            .filter(|object| {
                let (lo, hi) = object.aabb();
                lo.x <= max.x
                    && hi.x >= min.x
                    && lo.y <= max.y
                    && hi.y >= min.y
                    && lo.z <= max.z
                    && hi.z >= min.z
            })
            .map(|object| OverlapHit {
                object: object.id,
                tag: object.tag,
            })
            .collect()
    }

    fn object_pose(&self, id: ObjectId) -> Option<Pose> {
        self.objects
            .get(&id)
            .filter(|object| object.enabled)
            .map(|object| object.pose)
    }
}

impl SceneObjects for SandboxWorld {
    fn spawn_marker(&mut self, kind: MarkerKind, pose: Pose) -> Option<ObjectId> {
        let half_extents = match kind {
            MarkerKind::Goal => Vec3::new(1.0, 0.5, 2.0),
            MarkerKind::Highlight => Vec3::new(1.2, 0.01, 2.4),
        };
        let id = self.add_box(kind.tag(), LayerMask::GOALS, pose, half_extents);
        self.markers.push((id, kind));
        Some(id)
    }

    fn despawn(&mut self, id: ObjectId) {
        if self.objects.remove(&id).is_none() {
            log::trace!("Despawn of unknown object {}", id);
        }
    }

    fn is_alive(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(|object| object.enabled)
    }

    fn set_enabled(&mut self, id: ObjectId, enabled: bool) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.enabled = enabled;
        }
    }

    fn show_feedback(&mut self, feedback: EpisodeFeedback) {
        log::debug!("Ground feedback: {:?}", feedback);
        self.feedback.push(feedback);
    }
}
