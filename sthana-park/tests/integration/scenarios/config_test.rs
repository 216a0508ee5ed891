//! Configuration files driving the agent.

use std::io::Write;
use std::path::Path;

use sthana_park::config::{DEFAULT_CONFIG_PATH, GoalKind};
use sthana_park::sandbox::{SandboxVehicle, SandboxWorld};
use sthana_park::{ConfigLoadError, Error, ParkConfig, ParkingAgent};

/// Shipped configuration file.
fn shipped_config() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The shipped file matches the built-in defaults.
    #[test]
    fn test_shipped_config_matches_defaults() {
        let loaded = ParkConfig::load(&shipped_config()).expect("shipped config loads");
        let defaults = ParkConfig::default();

        assert_eq!(loaded.detector.sensors.len(), defaults.detector.sensors.len());
        assert_eq!(loaded.detector.layers, defaults.detector.layers);
        assert_eq!(loaded.clustering.occupancy_layers, defaults.clustering.occupancy_layers);
        assert_eq!(loaded.pedestrian.layers, defaults.pedestrian.layers);
        assert_eq!(loaded.goals.kind, defaults.goals.kind);
        assert_eq!(loaded.reward.max_episode_steps, defaults.reward.max_episode_steps);
        assert_eq!(loaded.scoring.degrade_end, defaults.scoring.degrade_end);
        assert_eq!(loaded.episode.feedback_delay, defaults.episode.feedback_delay);
        assert_eq!(loaded.maneuver.limit, defaults.maneuver.limit);
    }

    /// A partial file from disk configures a working agent.
    #[test]
    fn test_partial_file_builds_agent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "goals:\n  kind: milestone\nvehicle:\n  max_speed: 4.0\npedestrian:\n  enabled: false"
        )
        .unwrap();

        let config = ParkConfig::load(file.path()).unwrap();
        assert_eq!(config.goals.kind, GoalKind::Milestone);

        let agent = ParkingAgent::with_config_rig(
            config,
            SandboxWorld::new(),
            SandboxVehicle::new(Default::default()),
        )
        .unwrap();
        assert_eq!(agent.command().speed_cap, 2.0);
        assert!(!agent.pedestrians().is_enabled());
        assert_eq!(agent.generation(), 1);
    }

    /// The agent refuses configurations that fail validation.
    #[test]
    fn test_agent_rejects_invalid_config() {
        let mut config = ParkConfig::default();
        config.scoring.degrade_end = config.scoring.degrade_start;

        let result = ParkingAgent::with_config_rig(
            config,
            SandboxWorld::new(),
            SandboxVehicle::new(Default::default()),
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigLoadError::Invalid {
                field: "scoring.degrade_end",
                ..
            }))
        ));
    }
}
