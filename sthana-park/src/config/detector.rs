//! Sensor, clustering and pedestrian-monitor configuration sections.

use serde::{Deserialize, Serialize};

use crate::core::Vec3;
use crate::world::LayerMask;

/// A ranging sensor mounted on the vehicle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorMount {
    /// Name used in logs.
    pub name: String,
    /// Offset from the vehicle origin in the vehicle frame (X right, Y up, Z forward).
    pub offset: Vec3,
    /// Heading relative to the vehicle (degrees).
    #[serde(default)]
    pub yaw: f32,
}

impl SensorMount {
    /// Create a mount.
    pub fn new(name: impl Into<String>, offset: Vec3, yaw: f32) -> Self {
        Self {
            name: name.into(),
            offset,
            yaw,
        }
    }
}

/// Floor-marking detector settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSection {
    /// Roof sensors that sweep the floor for markings
    pub sensors: Vec<SensorMount>,

    /// Rays on each side of the sensor heading
    pub rays_per_direction: i32,

    /// Half-width of the ray fan (degrees)
    pub max_ray_degrees: f32,

    /// Ray length (meters)
    pub ray_length: f32,

    /// Vertical offset of the ray start above the sensor (meters)
    pub start_vertical_offset: f32,

    /// Vertical offset of the ray end for the first pass (meters)
    pub end_vertical_offset: f32,

    /// Fans cast per sensor; pass `k` lowers the end offset by `k/2`
    /// and uses `rays_per_direction - 2k` rays per side
    pub passes_per_sensor: usize,

    /// Radius of the swept sphere (meters)
    pub sphere_cast_radius: f32,

    /// Layers the casts are restricted to
    pub layers: LayerMask,

    /// Upper bound on distinct markings remembered per episode
    pub max_markings: usize,
}

impl Default for DetectorSection {
    fn default() -> Self {
        Self {
            sensors: vec![
                SensorMount::new("TopSensorFront", Vec3::new(0.0, 1.5, 0.5), 0.0),
                SensorMount::new("TopSensorLeft", Vec3::new(-0.5, 1.5, 0.0), -90.0),
                SensorMount::new("TopSensorRight", Vec3::new(0.5, 1.5, 0.0), 90.0),
            ],
            rays_per_direction: 6,
            max_ray_degrees: 70.0,
            ray_length: 12.0,
            start_vertical_offset: 0.0,
            end_vertical_offset: -1.5,
            passes_per_sensor: 3,
            sphere_cast_radius: 0.5,
            layers: LayerMask::MARKINGS,
            max_markings: 128,
        }
    }
}

/// Parking-space clustering settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringSection {
    /// Run the rectangular (90°) pass
    pub rectangular: bool,

    /// Run the angled (45°) pass
    pub angled: bool,

    /// Pairwise angle accepted for rectangular spaces (degrees)
    pub rectangular_angle: f32,

    /// Pairwise angles accepted for angled spaces (degrees)
    pub angled_angles: Vec<f32>,

    /// Tolerance on pairwise angles (degrees, exclusive)
    pub angle_tolerance: f32,

    /// Heading the anchor marking of an angled space must have (degrees)
    pub angled_anchor_yaw: f32,

    /// Headings the side markings of an angled space must have (degrees)
    pub angled_side_yaws: Vec<f32>,

    /// Tolerance on marking headings for the angled pass (degrees)
    pub yaw_tolerance: f32,

    /// Maximum distance between the two markings of a seed pair (meters, exclusive)
    pub max_pair_distance: f32,

    /// Extra distance allowed for the third marking beyond the seed pair (meters)
    pub third_distance_slack: f32,

    /// Half-height of the occupancy box (meters)
    pub box_half_height: f32,

    /// Layers searched by the occupancy check
    pub occupancy_layers: LayerMask,
}

impl Default for ClusteringSection {
    fn default() -> Self {
        Self {
            rectangular: true,
            angled: true,
            rectangular_angle: 90.0,
            angled_angles: vec![45.0, 135.0],
            angle_tolerance: 5.0,
            angled_anchor_yaw: 0.0,
            angled_side_yaws: vec![45.0, 135.0],
            yaw_tolerance: 0.01,
            max_pair_distance: 4.0,
            third_distance_slack: 0.5,
            box_half_height: 1.0,
            occupancy_layers: LayerMask::PARKING_GROUP,
        }
    }
}

/// Pedestrian proximity monitor settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PedestrianSection {
    /// Enable the monitor
    pub enabled: bool,

    /// Forward-looking pivot sensor
    pub sensor: SensorMount,

    /// Rays on each side of the sensor heading
    pub rays_per_direction: i32,

    /// Half-width of the ray fan (degrees)
    pub max_ray_degrees: f32,

    /// Ray length (meters)
    pub ray_length: f32,

    /// Vertical offset of the ray start (meters)
    pub start_vertical_offset: f32,

    /// Vertical offset of the ray end (meters)
    pub end_vertical_offset: f32,

    /// Radius of the swept sphere (meters)
    pub sphere_cast_radius: f32,

    /// Layers the casts are restricted to
    pub layers: LayerMask,

    /// Distances below this are accumulated as critical (meters)
    pub critical_distance: f32,

    /// Penalty when the mean critical distance is at the threshold
    pub far_penalty: f32,

    /// Penalty when the mean critical distance is zero
    pub near_penalty: f32,

    /// Bonus when no critical distance was ever seen
    pub clear_bonus: f32,
}

impl Default for PedestrianSection {
    fn default() -> Self {
        Self {
            enabled: true,
            sensor: SensorMount::new("PivotSensor", Vec3::new(0.0, 1.0, 0.5), 0.0),
            rays_per_direction: 5,
            max_ray_degrees: 60.0,
            ray_length: 20.0,
            start_vertical_offset: 0.0,
            end_vertical_offset: 0.0,
            sphere_cast_radius: 0.5,
            layers: LayerMask::ALL,
            critical_distance: 7.0,
            far_penalty: -0.1,
            near_penalty: -0.4,
            clear_bonus: 0.3,
        }
    }
}
