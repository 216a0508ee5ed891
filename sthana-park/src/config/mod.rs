//! Unified configuration loading.
//!
//! Every threshold the agent uses is an option in one YAML file. Missing
//! sections and fields fall back to the defaults below.

mod detector;
mod episode;
mod goals;
mod park;
mod reward;

pub use detector::{ClusteringSection, DetectorSection, PedestrianSection, SensorMount};
pub use episode::{EpisodeSection, VehicleSection};
pub use goals::{GoalKind, GoalsSection, ScoringSection};
pub use park::{DEFAULT_CONFIG_PATH, ParkConfig};
pub use reward::{ManeuverSection, ObstaclesSection, RewardSection};
