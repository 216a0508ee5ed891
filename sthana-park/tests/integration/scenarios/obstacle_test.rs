//! Obstacle and pedestrian scenarios.

use crate::harness::{HarnessConfig, ParkHarness};
use sthana_park::core::{Pose, Vec3};
use sthana_park::sandbox::SandboxWorld;
use sthana_park::{AgentState, EpisodeFeedback, EpisodeOutcome, ObstacleCategory, Tag};

/// Straight road with a barrier, then a parked car blocking the lane.
fn blocked_road() -> SandboxWorld {
    let mut world = SandboxWorld::new();
    world.add_obstacle(Tag::Barrier, Vec3::new(0.0, 0.5, 6.0), Vec3::new(2.0, 0.5, 0.2));
    world.add_car(Vec3::new(0.0, 0.0, 15.0), 0.0);
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A barrier costs points once; the parked car ends the episode.
    #[test]
    fn test_barrier_then_parked_car() {
        env_logger::try_init().ok();

        let mut harness = ParkHarness::new(HarnessConfig::default(), blocked_road());

        let report = harness
            .run_until(300, |r| r.cumulative_reward < 0.0)
            .expect("vehicle reaches the barrier");
        assert_eq!(report.state, AgentState::SearchingForParking);
        assert_relative_eq!(harness.agent.cumulative_reward(), -0.2, epsilon = 1e-6);

        harness
            .run_until(300, |r| r.ended)
            .expect("vehicle reaches the parked car");
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Failure);
        assert_relative_eq!(harness.agent.cumulative_reward(), -0.45, epsilon = 1e-6);

        assert!(harness.drain_sequence(50));
        let result = harness.result();
        assert_eq!(result.feedback, vec![EpisodeFeedback::Failure]);
        // No pedestrian came close, so the clear bonus is added
        assert_relative_eq!(result.reward, -0.15, epsilon = 1e-6);
    }

    /// Static obstacles never end the episode.
    #[test]
    fn test_static_obstacles_are_not_terminal() {
        let mut harness = ParkHarness::new(HarnessConfig::default(), SandboxWorld::new());

        harness.agent.on_obstacle_hit(ObstacleCategory::Tree);
        harness.agent.on_obstacle_hit(ObstacleCategory::Grass);
        harness.agent.on_obstacle_hit(ObstacleCategory::PedestrianContact);
        harness.agent.on_obstacle_hit(ObstacleCategory::Unknown);

        assert_eq!(harness.agent.state(), AgentState::SearchingForParking);
        assert_relative_eq!(
            harness.agent.cumulative_reward(),
            -0.1 - 0.08 - 0.5,
            epsilon = 1e-6
        );

        harness.agent.on_obstacle_hit(ObstacleCategory::ParkedCarContact);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Failure);
    }

    /// A pedestrian inside the critical radius turns the clear bonus into
    /// a distance-scaled penalty when the episode is finalized.
    #[test]
    fn test_pedestrian_penalty_on_finalize() {
        let mut world = SandboxWorld::new();
        world.add_pedestrian(Vec3::new(0.0, 0.0, 5.0));
        let start = Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0);
        let mut harness = ParkHarness::new(HarnessConfig::default().stationary(start), world);

        harness.step(None);
        assert_eq!(harness.agent.pedestrians().tracked().len(), 1);

        harness.agent.on_obstacle_hit(ObstacleCategory::ParkedCarCollision);
        assert_relative_eq!(harness.agent.cumulative_reward(), -0.25, epsilon = 1e-6);
        assert!(harness.drain_sequence(50));

        // Pedestrian stands at (0, 0.9, 5), the vehicle at (0, 0.5, 0)
        let distance = (0.4f32 * 0.4 + 25.0).sqrt();
        let t = (7.0 - distance) / 7.0;
        let penalty = -0.1 + (-0.4 + 0.1) * t;
        assert_relative_eq!(harness.agent.cumulative_reward(), -0.25 + penalty, epsilon = 1e-4);
    }

    /// Without the monitor nothing is added at the end.
    #[test]
    fn test_pedestrian_monitor_disabled() {
        let mut config = HarnessConfig::default();
        config.park.pedestrian.enabled = false;
        let mut world = SandboxWorld::new();
        world.add_pedestrian(Vec3::new(0.0, 0.0, 5.0));
        let mut harness = ParkHarness::new(config, world);

        harness.step(None);
        assert!(harness.agent.pedestrians().tracked().is_empty());

        harness.agent.take_away_points(-0.5);
        assert!(harness.drain_sequence(50));
        assert_relative_eq!(harness.agent.cumulative_reward(), -0.5);
    }
}
