//! Core test harness for integration tests
//!
//! Runs the agent, the sandbox world and the sandbox vehicle in lock step on
//! one thread. Each step is: policy action, agent tick, vehicle integration,
//! then trigger contacts.

use std::collections::HashSet;

use sthana_park::agent::TickReport;
use sthana_park::core::{Pose, Vec3, direction_from_yaw};
use sthana_park::sandbox::{SandboxVehicle, SandboxWorld};
use sthana_park::world::{ObjectId, Tag};
use sthana_park::{
    AgentState, EpisodeFeedback, EpisodeOutcome, ObstacleCategory, ParkConfig, ParkingAgent,
    VehicleMotor,
};

/// Agent type used by every scenario.
pub type SandboxAgent = ParkingAgent<SandboxWorld, SandboxVehicle>;

/// Test harness configuration.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Agent configuration
    pub park: ParkConfig,
    /// Vehicle start pose (also the episode start pose)
    pub start: Pose,
    /// Simulation timestep in seconds
    pub dt: f32,
    /// Half extents of the vehicle's trigger box
    pub vehicle_half_extents: Vec3,
    /// Step the vehicle kinematics (false keeps it where it was placed)
    pub move_vehicle: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            park: ParkConfig::default(),
            start: Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0),
            dt: 0.1,
            vehicle_half_extents: Vec3::new(0.9, 0.75, 2.2),
            move_vehicle: true,
        }
    }
}

impl HarnessConfig {
    /// Config with a dense marking fan, for single-tick detection.
    pub fn dense_fan() -> Self {
        let mut config = Self::default();
        config.park.detector.rays_per_direction = 24;
        config
    }

    /// Vehicle parked at `start` and never integrated.
    pub fn stationary(mut self, start: Pose) -> Self {
        self.start = start;
        self.move_vehicle = false;
        self
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct TestResult {
    /// Steps executed
    pub ticks: usize,
    /// Agent state at the end
    pub state: AgentState,
    /// Episode outcome at the end
    pub outcome: EpisodeOutcome,
    /// Cumulative reward at the end
    pub reward: f32,
    /// Candidate spaces found
    pub candidates: usize,
    /// Feedback shown by the end sequence
    pub feedback: Vec<EpisodeFeedback>,
}

/// Lock-step simulation of agent, world and vehicle.
pub struct ParkHarness {
    pub agent: SandboxAgent,
    config: HarnessConfig,
    touching: HashSet<ObjectId>,
    ticks: usize,
}

impl ParkHarness {
    /// Build the harness around a prepared world.
    pub fn new(config: HarnessConfig, world: SandboxWorld) -> Self {
        let vehicle = SandboxVehicle::new(config.start);
        let agent = ParkingAgent::with_config_rig(config.park.clone(), world, vehicle)
            .expect("harness config is valid");
        Self {
            agent,
            config,
            touching: HashSet::new(),
            ticks: 0,
        }
    }

    /// Simulation timestep.
    pub fn dt(&self) -> f32 {
        self.config.dt
    }

    /// Steps executed so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Run one simulation step, optionally with a policy action first.
    pub fn step(&mut self, action: Option<i32>) -> TickReport {
        let dt = self.config.dt;
        if let Some(action) = action {
            self.agent.on_action(action, dt);
        }
        let report = self.agent.tick(dt);
        if self.config.move_vehicle {
            self.agent.vehicle_mut().step(dt);
        }
        self.raise_contacts();
        self.ticks += 1;
        report
    }

    /// Step without actions until `done` holds or `max_ticks` pass.
    ///
    /// Returns the report of the step where `done` first held.
    pub fn run_until<F>(&mut self, max_ticks: usize, mut done: F) -> Option<TickReport>
    where
        F: FnMut(&TickReport) -> bool,
    {
        for _ in 0..max_ticks {
            let report = self.step(None);
            if done(&report) {
                return Some(report);
            }
        }
        None
    }

    /// Step until the end sequence has drained.
    pub fn drain_sequence(&mut self, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            if !self.agent.is_sequence_active() {
                return true;
            }
            self.step(None);
        }
        !self.agent.is_sequence_active()
    }

    /// Summary of the current episode.
    pub fn result(&self) -> TestResult {
        TestResult {
            ticks: self.ticks,
            state: self.agent.state(),
            outcome: self.agent.outcome(),
            reward: self.agent.cumulative_reward(),
            candidates: self.agent.candidates().len(),
            feedback: self.agent.world().feedback_history().to_vec(),
        }
    }

    /// Raise enter events for objects the vehicle started touching.
    fn raise_contacts(&mut self) {
        let pose = self.agent.vehicle().pose();
        let contacts = self
            .agent
            .world()
            .contacts(pose, self.config.vehicle_half_extents);

        let mut now = HashSet::new();
        for hit in contacts {
            now.insert(hit.object);
            if self.touching.contains(&hit.object) {
                continue;
            }
            match hit.tag {
                Tag::Goal => self.agent.on_goal_entered(hit.object),
                Tag::Car | Tag::Pedestrian | Tag::Barrier | Tag::Tree | Tag::Grass => {
                    self.agent.on_obstacle_hit(ObstacleCategory::from_tag(hit.tag))
                }
                _ => {}
            }
        }
        self.touching = now;
    }
}

/// Identities of every painted line in the world.
pub fn line_ids(world: &SandboxWorld) -> Vec<ObjectId> {
    world.tagged(Tag::Line).map(|object| object.id).collect()
}

/// Pose `distance` meters from `target`, facing `yaw`, such that the bearing
/// to the target is `offset` degrees off the heading.
pub fn approach_pose(target: Vec3, yaw: f32, offset: f32, distance: f32, height: f32) -> Pose {
    let bearing = direction_from_yaw(yaw - offset);
    let flat = Vec3::new(target.x, 0.0, target.z) - bearing * distance;
    Pose::new(Vec3::new(flat.x, height, flat.z), yaw)
}
