//! Root ParkConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigLoadError;

use super::detector::{ClusteringSection, DetectorSection, PedestrianSection};
use super::episode::{EpisodeSection, VehicleSection};
use super::goals::{GoalsSection, ScoringSection};
use super::reward::{ManeuverSection, ObstaclesSection, RewardSection};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/park.yaml";

/// Full agent configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ParkConfig {
    /// Floor-marking detector
    #[serde(default)]
    pub detector: DetectorSection,

    /// Parking-space clustering
    #[serde(default)]
    pub clustering: ClusteringSection,

    /// Goal placement
    #[serde(default)]
    pub goals: GoalsSection,

    /// Goal-entry scoring
    #[serde(default)]
    pub scoring: ScoringSection,

    /// Per-tick reward shaping
    #[serde(default)]
    pub reward: RewardSection,

    /// Obstacle penalties
    #[serde(default)]
    pub obstacles: ObstaclesSection,

    /// Maneuver tracking
    #[serde(default)]
    pub maneuver: ManeuverSection,

    /// Vehicle speed caps
    #[serde(default)]
    pub vehicle: VehicleSection,

    /// End-of-episode sequence
    #[serde(default)]
    pub episode: EpisodeSection,

    /// Pedestrian proximity monitor
    #[serde(default)]
    pub pedestrian: PedestrianSection,
}

impl ParkConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from `configs/park.yaml` if it exists, defaults otherwise
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using default config", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ParkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the tick loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigLoadError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigLoadError::invalid(
                    field,
                    format!("must be positive, got {}", value),
                ))
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigLoadError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigLoadError::invalid(
                    field,
                    format!("must not be negative, got {}", value),
                ))
            }
        }

        positive("detector.ray_length", self.detector.ray_length)?;
        non_negative("detector.sphere_cast_radius", self.detector.sphere_cast_radius)?;
        non_negative("detector.max_ray_degrees", self.detector.max_ray_degrees)?;
        if self.detector.rays_per_direction < 0 {
            return Err(ConfigLoadError::invalid(
                "detector.rays_per_direction",
                "must not be negative",
            ));
        }
        if self.detector.max_markings < 3 {
            return Err(ConfigLoadError::invalid(
                "detector.max_markings",
                "must allow at least three markings",
            ));
        }

        positive("clustering.max_pair_distance", self.clustering.max_pair_distance)?;
        positive("clustering.angle_tolerance", self.clustering.angle_tolerance)?;
        positive("clustering.box_half_height", self.clustering.box_half_height)?;

        non_negative("goals.min_separation", self.goals.min_separation)?;

        if self.scoring.degrade_end <= self.scoring.degrade_start {
            return Err(ConfigLoadError::invalid(
                "scoring.degrade_end",
                "must be greater than scoring.degrade_start",
            ));
        }
        if self.scoring.max_penalty_distance <= self.scoring.adjacent_radius {
            return Err(ConfigLoadError::invalid(
                "scoring.max_penalty_distance",
                "must be greater than scoring.adjacent_radius",
            ));
        }

        positive("reward.check_interval", self.reward.check_interval)?;
        positive("reward.stationary_time", self.reward.stationary_time)?;

        positive("maneuver.turn_threshold", self.maneuver.turn_threshold)?;
        positive("maneuver.full_rotation", self.maneuver.full_rotation)?;
        non_negative("maneuver.recall_interval", self.maneuver.recall_interval)?;

        positive("vehicle.max_speed", self.vehicle.max_speed)?;
        non_negative("vehicle.search_speed_factor", self.vehicle.search_speed_factor)?;

        non_negative("episode.drive_timeout", self.episode.drive_timeout)?;
        non_negative("episode.feedback_delay", self.episode.feedback_delay)?;
        non_negative("episode.finalize_delay", self.episode.finalize_delay)?;

        if self.pedestrian.enabled {
            positive("pedestrian.critical_distance", self.pedestrian.critical_distance)?;
            positive("pedestrian.ray_length", self.pedestrian.ray_length)?;
        }

        Ok(())
    }
}
