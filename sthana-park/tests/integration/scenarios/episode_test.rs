//! Full-episode scenarios.
//!
//! The reference lot is a row of four rectangular spaces on the right of the
//! vehicle, with cars in spaces 0 and 2. From the start pose a dense fan sees
//! exactly one free space, so the detection tick is deterministic.

use crate::harness::{HarnessConfig, ParkHarness, approach_pose, line_ids};
use sthana_park::config::GoalKind;
use sthana_park::core::{Pose, Vec3};
use sthana_park::sandbox::SandboxWorld;
use sthana_park::{AgentState, Direction, EpisodeFeedback, EpisodeOutcome, SceneObjects, Tag};

/// Row frame: spaces open towards the road at x = 7.3 and run towards -Z.
fn row() -> Pose {
    Pose::new(Vec3::new(7.3, 0.0, 17.5), 90.0)
}

/// Vehicle start beside the row, facing +Z.
fn start() -> Pose {
    Pose::new(Vec3::new(0.0, 0.5, 17.5), 0.0)
}

/// Lot with spaces 1 and 3 free. Returns the world and the space centers.
fn lot() -> (SandboxWorld, Vec<Vec3>) {
    let mut world = SandboxWorld::new();
    let centers = world.add_rectangular_row(row(), 4, 2.5, 5.0, &[0, 2]);
    (world, centers)
}

/// Harness that detects the free space on its first tick.
fn detecting_harness(mut config: HarnessConfig) -> (ParkHarness, Vec<Vec3>) {
    let (world, centers) = lot();
    config = config.stationary(start());
    (ParkHarness::new(config, world), centers)
}

/// Harness ticked into `Parking`. Returns the placed goal's object and position.
fn parked_harness(config: HarnessConfig) -> (ParkHarness, sthana_park::ObjectId, Vec3) {
    let (mut harness, _) = detecting_harness(config);
    let report = harness.step(None);
    assert_eq!(report.state, AgentState::Parking);

    let goal = harness
        .agent
        .placed_goals()
        .live()
        .next()
        .expect("a goal was placed");
    let (object, position) = (goal.goal, goal.position);
    (harness, object, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Detection on tick 5, then a 2° final entry ends the episode with
    /// the proximity and alignment bonuses and runs the end sequence.
    #[test]
    fn test_end_to_end_parking() {
        env_logger::try_init().ok();

        let (mut world, centers) = lot();
        let lines = line_ids(&world);
        for id in &lines {
            world.set_enabled(*id, false);
        }
        let config = HarnessConfig::dense_fan().stationary(start());
        let mut harness = ParkHarness::new(config, world);
        assert_eq!(harness.agent.state(), AgentState::SearchingForParking);

        for _ in 0..4 {
            let report = harness.step(None);
            assert_eq!(report.state, AgentState::SearchingForParking);
            assert_eq!(report.new_markings, 0);
            assert_eq!(report.reward_delta, 0.0);
        }

        for id in &lines {
            harness.agent.world_mut().set_enabled(*id, true);
        }
        let report = harness.step(None);
        assert_eq!(harness.ticks(), 5);
        assert_eq!(report.state, AgentState::Parking);
        assert_eq!(report.new_candidates, 1);
        assert_eq!(report.goals_placed, 1);
        assert_relative_eq!(report.reward_delta, 0.2, epsilon = 1e-6);

        // Only the free space in view is a candidate
        let nearest = harness.agent.nearest_goal().expect("goal selected");
        assert!(nearest.flattened().distance(centers[1]) < 1.0);

        let goal = harness.agent.placed_goals().live().next().unwrap();
        let (object, position) = (goal.goal, goal.position);
        assert_relative_eq!(position.distance(nearest), 0.1, epsilon = 1e-4);

        harness
            .agent
            .vehicle_mut()
            .set_pose(approach_pose(position, 90.0, 2.0, 3.0, 0.5));
        harness.agent.on_goal_entered(object);

        // 0.2 detection + 0.2 exact proximity + 0.8 goal + 0.5 perfect + 1.2 maneuvers
        assert_eq!(harness.agent.state(), AgentState::EpisodeEnded);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Success);
        assert_relative_eq!(harness.agent.cumulative_reward(), 2.9, epsilon = 1e-4);
        assert!(harness.agent.is_sequence_active());
        assert!(harness.agent.placed_goals().get(goal_id(&harness, object)).unwrap().used);

        assert!(harness.drain_sequence(100));
        let result = harness.result();
        assert_eq!(result.feedback, vec![EpisodeFeedback::Success]);
        // Pedestrian finalize adds the clear bonus
        assert_relative_eq!(result.reward, 3.2, epsilon = 1e-4);
        assert_eq!(result.outcome, EpisodeOutcome::Success);
    }

    fn goal_id(harness: &ParkHarness, object: sthana_park::ObjectId) -> sthana_park::GoalId {
        harness
            .agent
            .placed_goals()
            .find_by_object(object)
            .map(|goal| goal.id)
            .expect("goal is tracked")
    }

    /// With alignment enforced, a 20° entry scores a partial success.
    #[test]
    fn test_misaligned_entry_is_partial_success() {
        let mut config = HarnessConfig::dense_fan();
        config.park.scoring.enforce_min_rotation = true;
        let (mut harness, object, position) = parked_harness(config);

        harness
            .agent
            .vehicle_mut()
            .set_pose(approach_pose(position, 90.0, 20.0, 3.0, 0.5));
        harness.agent.on_goal_entered(object);

        // Goal reward degrades linearly from -0.2 at 15° to -1.0 at 45°
        let goal_reward = 0.8 + (-0.2 + (-1.0 + 0.2) * (5.0 / 30.0));
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::PartialSuccess);
        assert_relative_eq!(
            harness.agent.cumulative_reward(),
            0.2 + 0.2 + goal_reward + 1.2,
            epsilon = 1e-3
        );

        assert!(harness.drain_sequence(100));
        assert_eq!(
            harness.agent.world().last_feedback(),
            Some(EpisodeFeedback::PartialSuccess)
        );
    }

    /// Milestone goals pay out without ending the episode, once per goal.
    #[test]
    fn test_milestone_goal_keeps_episode_running() {
        let mut config = HarnessConfig::dense_fan();
        config.park.goals.kind = GoalKind::Milestone;
        let (mut harness, object, _) = parked_harness(config);

        harness.agent.on_goal_entered(object);
        assert_eq!(harness.agent.state(), AgentState::Parking);
        assert!(!harness.agent.is_sequence_active());
        assert_relative_eq!(harness.agent.cumulative_reward(), 0.2 + 0.2 + 0.8, epsilon = 1e-4);

        // Second entry of the same goal scores nothing
        harness.agent.on_goal_entered(object);
        assert_relative_eq!(harness.agent.cumulative_reward(), 1.2, epsilon = 1e-4);
    }

    /// Parking actions select the movement and cost 1/max_steps each.
    #[test]
    fn test_parking_actions_cost_time() {
        let (mut harness, _, _) = parked_harness(HarnessConfig::dense_fan());
        let before = harness.agent.cumulative_reward();

        harness.agent.on_action(Direction::TurnLeft.index(), 0.1);
        assert_eq!(harness.agent.command().direction, Direction::TurnLeft);
        assert_eq!(harness.agent.command().speed_cap, 2.0);
        assert_relative_eq!(
            harness.agent.cumulative_reward(),
            before - 1.0 / 5000.0,
            epsilon = 1e-6
        );

        // Out-of-range actions keep the previous command but still cost time
        harness.agent.on_action(9, 0.1);
        assert_eq!(harness.agent.command().direction, Direction::TurnLeft);
        assert_eq!(harness.agent.steps(), 2);
        assert_relative_eq!(
            harness.agent.cumulative_reward(),
            before - 2.0 / 5000.0,
            epsilon = 1e-6
        );
    }

    /// While searching the vehicle keeps driving forward at the search cap.
    #[test]
    fn test_search_ignores_policy_actions() {
        let (world, _) = lot();
        let mut harness = ParkHarness::new(HarnessConfig::default(), world);

        harness.agent.on_action(Direction::MoveBackward.index(), 0.1);
        assert_eq!(harness.agent.command().direction, Direction::MoveForward);
        assert_eq!(harness.agent.command().speed_cap, 1.0);
        assert_eq!(harness.agent.cumulative_reward(), 0.0);
    }

    /// Nothing changes once the episode is over.
    #[test]
    fn test_no_op_after_episode_end() {
        let (mut harness, object, _) = parked_harness(HarnessConfig::dense_fan());
        harness.agent.take_away_points(-0.5);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Failure);

        let reward = harness.agent.cumulative_reward();
        let steps = harness.agent.steps();
        let command = harness.agent.command();

        harness.agent.on_action(Direction::MoveForward.index(), 0.1);
        harness.agent.on_goal_entered(object);
        harness.agent.on_obstacle_hit(sthana_park::ObstacleCategory::Barrier);
        harness.agent.give_points(1.0, true, true);
        harness.agent.take_away_points(-1.0);

        assert_eq!(harness.agent.cumulative_reward(), reward);
        assert_eq!(harness.agent.steps(), steps);
        assert_eq!(harness.agent.command(), command);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Failure);
    }

    /// A new episode clears goals and drops the old end sequence.
    #[test]
    fn test_begin_episode_resets_state() {
        let (mut harness, _, _) = parked_harness(HarnessConfig::dense_fan());
        assert_eq!(harness.agent.generation(), 1);

        harness.agent.take_away_points(-0.5);
        // Halt now, feedback and finalize queued for later
        harness.step(None);
        assert!(harness.agent.is_sequence_active());

        harness.agent.begin_episode();
        assert_eq!(harness.agent.generation(), 2);
        assert_eq!(harness.agent.state(), AgentState::SearchingForParking);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Running);
        assert_eq!(harness.agent.cumulative_reward(), 0.0);
        assert_eq!(harness.agent.steps(), 0);
        assert!(harness.agent.nearest_goal().is_none());
        assert!(harness.agent.candidates().is_empty());
        assert!(harness.agent.markings().is_empty());
        assert!(harness.agent.placed_goals().is_empty());
        assert_eq!(harness.agent.world().tagged(Tag::Goal).count(), 0);
        assert_eq!(harness.agent.world().tagged(Tag::Highlight).count(), 0);

        // Stale steps from episode 1 never reach the world or the reward
        for _ in 0..10 {
            harness.step(None);
        }
        assert_eq!(harness.agent.state(), AgentState::Parking);
        assert!(harness.agent.world().feedback_history().is_empty());
        assert!(!harness.agent.is_sequence_active());
        assert_relative_eq!(harness.agent.cumulative_reward(), 0.2, epsilon = 1e-6);
    }

    /// The step limit interrupts the episode without an end sequence.
    #[test]
    fn test_step_limit_interrupts() {
        let mut config = HarnessConfig::default();
        config.park.reward.max_episode_steps = 10;
        let mut harness = ParkHarness::new(config, SandboxWorld::new());

        for _ in 0..9 {
            harness.step(Some(Direction::MoveForward.index()));
        }
        assert_eq!(harness.agent.state(), AgentState::SearchingForParking);

        harness.step(Some(Direction::MoveForward.index()));
        let result = harness.result();
        assert_eq!(result.state, AgentState::EpisodeEnded);
        assert_eq!(result.outcome, EpisodeOutcome::Interrupted);
        assert!(!harness.agent.is_sequence_active());
        assert_eq!(harness.agent.vehicle().speed(), 0.0);
    }

    /// Falling below the ground plane fails the episode.
    #[test]
    fn test_fall_fails_episode() {
        let config = HarnessConfig::default().stationary(Pose::new(Vec3::new(0.0, -1.0, 0.0), 0.0));
        let mut harness = ParkHarness::new(config, SandboxWorld::new());

        let report = harness.step(None);
        assert!(report.ended);
        assert_eq!(harness.agent.outcome(), EpisodeOutcome::Failure);
        assert_relative_eq!(report.reward_delta, -0.5);

        assert!(harness.drain_sequence(20));
        assert_eq!(harness.result().feedback, vec![EpisodeFeedback::Failure]);
    }

    /// Observations carry the selected goal once parking starts.
    #[test]
    fn test_observations_include_goal() {
        let (harness, _, position) = parked_harness(HarnessConfig::dense_fan());
        let obs = harness.agent.collect_observations();
        assert_eq!(obs.len(), sthana_park::agent::OBSERVATION_SIZE);
        assert_relative_eq!(obs[1], 0.5);
        assert_relative_eq!(obs[4], 1.0, epsilon = 1e-6);
        assert_relative_eq!(obs[5], position.x, epsilon = 1e-4);
        assert_relative_eq!(obs[7], position.z, epsilon = 1e-4);
    }
}
