//! Parking agent state machine.

use log::{debug, info, trace, warn};

use crate::config::ParkConfig;
use crate::core::{Pose, Vec3};
use crate::error::Result;
use crate::goals::{GoalAllocator, GoalArena};
use crate::perception::{
    CandidateSet, LineDetector, MarkingSet, PedestrianMonitor, SensorRig, SpaceClusterer,
};
use crate::world::{
    DriveCommand, EpisodeFeedback, ObjectId, PhysicsQuery, SceneObjects, VehicleMotor,
};

use super::action::Direction;
use super::maneuver::ManeuverTracker;
use super::obstacle::ObstacleCategory;
use super::scoring::AlignmentScorer;
use super::sequence::{EndSequence, SequenceAction};
use super::shaper::RewardShaper;
use super::state::{AgentState, EpisodeOutcome, RewardEvent};

/// Length of the vector returned by [`ParkingAgent::collect_observations`].
pub const OBSERVATION_SIZE: usize = 11;

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// State after the tick.
    pub state: AgentState,
    /// Reward added during the tick.
    pub reward_delta: f32,
    /// Cumulative episode reward after the tick.
    pub cumulative_reward: f32,
    /// Markings added to the episode history.
    pub new_markings: usize,
    /// Candidate spaces added to the episode set.
    pub new_candidates: usize,
    /// Goals placed for new candidates.
    pub goals_placed: usize,
    /// The episode is over.
    pub ended: bool,
}

/// Perception, goal placement and reward logic for one vehicle.
///
/// The host drives it with [`tick`](Self::tick) once per physics step and
/// [`on_action`](Self::on_action) once per policy decision, and reports
/// trigger contacts through [`on_goal_entered`](Self::on_goal_entered) and
/// [`on_obstacle_hit`](Self::on_obstacle_hit).
pub struct ParkingAgent<W, V>
where
    W: PhysicsQuery + SceneObjects,
    V: VehicleMotor,
{
    config: ParkConfig,
    world: W,
    vehicle: V,

    rig: SensorRig,
    detector: LineDetector,
    markings: MarkingSet,
    clusterer: SpaceClusterer,
    candidates: CandidateSet,
    allocator: GoalAllocator,
    scorer: AlignmentScorer,
    tracker: Option<ManeuverTracker>,
    shaper: RewardShaper,
    pedestrians: PedestrianMonitor,
    sequence: EndSequence,

    state: AgentState,
    outcome: EpisodeOutcome,
    command: DriveCommand,
    cumulative_reward: f32,
    nearest_goal: Option<Vec3>,
    steps: u32,
    generation: u64,
    start_pose: Pose,
}

impl<W, V> ParkingAgent<W, V>
where
    W: PhysicsQuery + SceneObjects,
    V: VehicleMotor,
{
    /// Build an agent around `world` and `vehicle`.
    ///
    /// The vehicle's current pose becomes the start pose for every episode.
    /// The first episode begins immediately.
    pub fn new(config: ParkConfig, world: W, vehicle: V, rig: SensorRig) -> Result<Self> {
        config.validate()?;

        let start_pose = vehicle.pose();
        let forward = start_pose.forward();
        let tracker = config
            .maneuver
            .enabled
            .then(|| ManeuverTracker::new(config.maneuver.clone(), forward));

        let mut agent = Self {
            rig,
            detector: LineDetector::new(&config.detector),
            markings: MarkingSet::new(config.detector.max_markings),
            clusterer: SpaceClusterer::new(config.clustering.clone()),
            candidates: CandidateSet::new(),
            allocator: GoalAllocator::new(config.goals.clone()),
            scorer: AlignmentScorer::new(config.scoring.clone(), config.goals.kind),
            tracker,
            shaper: RewardShaper::new(config.reward.clone(), start_pose.position),
            pedestrians: PedestrianMonitor::new(&config.pedestrian),
            sequence: EndSequence::new(config.episode.clone()),
            state: AgentState::SearchingForParking,
            outcome: EpisodeOutcome::Running,
            command: DriveCommand::idle(config.vehicle.max_speed),
            cumulative_reward: 0.0,
            nearest_goal: None,
            steps: 0,
            generation: 0,
            start_pose,
            config,
            world,
            vehicle,
        };
        agent.begin_episode();
        Ok(agent)
    }

    /// Build an agent with the sensor rig from `config.detector.sensors`.
    pub fn with_config_rig(config: ParkConfig, world: W, vehicle: V) -> Result<Self> {
        let rig = SensorRig::from_config(&config.detector);
        Self::new(config, world, vehicle, rig)
    }

    fn search_command(&self) -> DriveCommand {
        let vehicle = &self.config.vehicle;
        DriveCommand::new(
            Direction::MoveForward,
            vehicle.max_speed * vehicle.search_speed_factor,
        )
    }

    /// Reset everything for a new episode.
    ///
    /// Deferred steps of the previous episode are invalidated, placed goals
    /// are destroyed and the vehicle returns to its start pose.
    pub fn begin_episode(&mut self) {
        self.generation += 1;
        self.sequence.reset(self.generation);

        self.vehicle.reset_to(self.start_pose);
        let pose = self.vehicle.pose();

        self.set_state(AgentState::SearchingForParking);
        self.outcome = EpisodeOutcome::Running;
        self.cumulative_reward = 0.0;
        self.nearest_goal = None;
        self.steps = 0;

        self.markings.clear();
        self.candidates.clear();
        self.allocator.reset(&mut self.world);

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset(pose.forward());
        }
        self.shaper.reset(pose.position);
        self.pedestrians.reset();

        self.command = self.search_command();
        info!("[Park] Episode {} started", self.generation);
    }

    /// Advance one physics step.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let before = self.cumulative_reward;
        let mut report = TickReport::default();

        self.run_sequence(dt);
        if self.state.is_terminal() {
            return self.finish_report(report, before);
        }

        let pose = self.vehicle.pose();
        if pose.position.y <= self.config.reward.fall_height {
            warn!("[Park] Vehicle fell below the ground plane (y = {:.2})", pose.position.y);
            self.take_away_points(self.config.reward.fall_penalty);
            return self.finish_report(report, before);
        }

        report.new_markings = self
            .detector
            .scan(&self.world, &self.rig, pose, &mut self.markings);
        let found = self.clusterer.cluster(self.markings.as_slice(), &self.world);
        report.new_candidates = self.candidates.merge(&found);
        if report.new_candidates > 0 {
            debug!(
                "[Park] {} new candidate spaces ({} total)",
                report.new_candidates,
                self.candidates.len()
            );
        }
        report.goals_placed = self.allocator.place(&mut self.world, &self.candidates);

        if self.pedestrians.is_enabled() {
            self.pedestrians.update(&self.world, pose);
        }

        let mut events = Vec::new();
        if let Some(tracker) = self.tracker.as_mut() {
            events.extend(tracker.update(pose.forward()));
            if self.state == AgentState::Parking {
                events.extend(tracker.recall(dt));
            }
        }
        self.apply_events(events);

        if self.state == AgentState::SearchingForParking && !self.candidates.is_empty() {
            self.add_reward(self.config.reward.detection_reward);
            self.nearest_goal = self
                .candidates
                .nearest_to(pose.position)
                .map(|candidate| candidate.center);
            self.command = DriveCommand::new(self.command.direction, self.config.vehicle.max_speed);
            self.set_state(AgentState::Parking);
            if let Some(goal) = self.nearest_goal {
                info!(
                    "[Park] Parking space found, heading for ({:.2}, {:.2})",
                    goal.x, goal.z
                );
            }
        }

        if !self.state.is_terminal() {
            self.vehicle.apply(self.command);
        }
        self.finish_report(report, before)
    }

    fn finish_report(&self, mut report: TickReport, before: f32) -> TickReport {
        report.state = self.state;
        report.reward_delta = self.cumulative_reward - before;
        report.cumulative_reward = self.cumulative_reward;
        report.ended = self.state.is_terminal();
        report
    }

    fn run_sequence(&mut self, dt: f32) {
        if !self.sequence.is_active() {
            return;
        }
        let pose = self.vehicle.pose();
        for action in self.sequence.advance(dt, pose) {
            match action {
                SequenceAction::Steer(direction) => {
                    self.vehicle
                        .apply(DriveCommand::new(direction, self.config.vehicle.max_speed));
                }
                SequenceAction::Halt => {
                    self.command = DriveCommand::idle(self.config.vehicle.max_speed);
                    self.vehicle.halt();
                }
                SequenceAction::ShowFeedback(feedback) => self.world.show_feedback(feedback),
                SequenceAction::FinalizePedestrians => {
                    if let Some(score) = self.pedestrians.finalize() {
                        self.add_reward(score);
                    }
                }
            }
        }
    }

    /// Process one policy decision.
    ///
    /// While searching the vehicle keeps driving forward whatever the
    /// action. While parking the action selects the movement, the shaping
    /// checks run and a small time cost is charged. No-op once the episode
    /// has ended.
    pub fn on_action(&mut self, action: i32, dt: f32) {
        if self.state.is_terminal() {
            trace!("[Park] Ignoring action {} after episode end", action);
            return;
        }
        self.steps += 1;

        match self.state {
            AgentState::SearchingForParking => {
                self.command = self.search_command();
            }
            AgentState::Parking => {
                let speed = self.vehicle.velocity().length();
                let position = self.vehicle.pose().position;
                let events = self
                    .shaper
                    .check(dt, speed, position, self.command.direction);
                self.apply_events(events);

                if self.state == AgentState::Parking {
                    match Direction::try_from(action) {
                        Ok(direction) => {
                            self.command =
                                DriveCommand::new(direction, self.config.vehicle.max_speed);
                        }
                        Err(e) => warn!("[Park] {}, keeping {:?}", e, self.command.direction),
                    }
                    let max_steps = self.config.reward.max_episode_steps;
                    if max_steps > 0 {
                        self.add_reward(-1.0 / max_steps as f32);
                    }
                }
            }
            AgentState::EpisodeEnded => {}
        }

        let max_steps = self.config.reward.max_episode_steps;
        if !self.state.is_terminal() && max_steps > 0 && self.steps >= max_steps {
            self.interrupt();
        }
    }

    fn interrupt(&mut self) {
        info!(
            "[Park] Episode {} interrupted after {} steps (reward {:.3})",
            self.generation, self.steps, self.cumulative_reward
        );
        self.set_state(AgentState::EpisodeEnded);
        self.outcome = EpisodeOutcome::Interrupted;
        self.command = DriveCommand::idle(self.config.vehicle.max_speed);
        self.vehicle.halt();
    }

    fn apply_events(&mut self, events: impl IntoIterator<Item = RewardEvent>) {
        for event in events {
            self.apply_event(event);
            if self.state.is_terminal() {
                break;
            }
        }
    }

    /// Route a component's reward event through the matching entry point.
    pub fn apply_event(&mut self, event: RewardEvent) {
        match event {
            RewardEvent::Add(amount) => self.add_reward(amount),
            RewardEvent::GivePoints {
                amount,
                is_final,
                is_aligned,
            } => self.give_points(amount, is_final, is_aligned),
            RewardEvent::TakeAwayPoints(amount) => self.take_away_points(amount),
        }
    }

    /// Add a shaping reward without any state change.
    pub fn add_reward(&mut self, amount: f32) {
        self.cumulative_reward += amount;
    }

    /// Reward for reaching a goal.
    ///
    /// Final points add the maneuver bonus, end the episode and schedule
    /// the end sequence with a drive toward the selected goal.
    pub fn give_points(&mut self, amount: f32, is_final: bool, is_aligned: bool) {
        if self.state.is_terminal() {
            debug!("[Park] Ignoring {:.3} points after episode end", amount);
            return;
        }
        self.add_reward(amount);

        match self.tracker.as_ref() {
            Some(tracker) => {
                let bonus = tracker.evaluate(is_final);
                if bonus != 0.0 {
                    debug!(
                        "[Park] Maneuver bonus {:.2} for {} maneuvers",
                        bonus,
                        tracker.count()
                    );
                }
                self.add_reward(bonus);
            }
            None if is_final => self.add_reward(self.config.reward.final_bonus_without_tracker),
            None => {}
        }

        if !is_final {
            return;
        }
        let (outcome, feedback) = if is_aligned {
            (EpisodeOutcome::Success, EpisodeFeedback::Success)
        } else {
            (EpisodeOutcome::PartialSuccess, EpisodeFeedback::PartialSuccess)
        };
        self.end_episode(outcome, feedback, self.nearest_goal);
    }

    /// Terminal penalty: adds `amount` and fails the episode.
    pub fn take_away_points(&mut self, amount: f32) {
        if self.state.is_terminal() {
            debug!("[Park] Ignoring {:.3} penalty after episode end", amount);
            return;
        }
        self.add_reward(amount);
        self.end_episode(EpisodeOutcome::Failure, EpisodeFeedback::Failure, None);
    }

    fn set_state(&mut self, next: AgentState) {
        if self.state != next {
            debug!("[Park] {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }

    fn end_episode(
        &mut self,
        outcome: EpisodeOutcome,
        feedback: EpisodeFeedback,
        drive: Option<Vec3>,
    ) {
        self.set_state(AgentState::EpisodeEnded);
        self.outcome = outcome;
        self.command = DriveCommand::idle(self.config.vehicle.max_speed);
        self.sequence.start(self.generation, feedback, drive);
        info!(
            "[Park] Episode {} ended: {:?}, reward {:.3}",
            self.generation, outcome, self.cumulative_reward
        );
    }

    /// The vehicle entered the goal marker `object`.
    ///
    /// Adds the proximity reward against the selected goal, then the goal
    /// reward for the configured goal kind. Each goal scores once.
    pub fn on_goal_entered(&mut self, object: ObjectId) {
        if self.state.is_terminal() {
            return;
        }
        let Some(goal) = self.allocator.arena().find_by_object(object) else {
            warn!("[Park] Entered unknown or removed goal {}", object);
            return;
        };
        if goal.used {
            trace!("[Park] Goal {} already scored", goal.id);
            return;
        }
        let (id, position) = (goal.id, goal.position);

        let score = self
            .scorer
            .score(position, self.nearest_goal, self.vehicle.pose());
        match score.proximity {
            Some(proximity) => self.add_reward(proximity),
            None => warn!("[Park] Goal {} entered before any goal was selected", id),
        }
        if let Some(alignment) = score.alignment {
            info!("[Park] Entered {} at {:.1} deg alignment", id, alignment);
        }

        self.allocator.arena_mut().mark_used(id);
        self.apply_event(score.event);
    }

    /// The vehicle hit an obstacle.
    pub fn on_obstacle_hit(&mut self, category: ObstacleCategory) {
        if self.state.is_terminal() {
            return;
        }
        match category.penalty(&self.config.obstacles) {
            Some(event) => {
                debug!("[Park] Hit {:?}: {:.2}", category, event.amount());
                self.apply_event(event);
            }
            None => debug!("[Park] Ignoring collision with {:?}", category),
        }
    }

    /// Flat observation vector for the policy: position (3), heading sin
    /// and cos (2), selected goal or zeros (3), velocity (3).
    pub fn collect_observations(&self) -> Vec<f32> {
        let pose = self.vehicle.pose();
        let yaw = pose.yaw.to_radians();
        let goal = self.nearest_goal.unwrap_or(Vec3::ZERO);
        let velocity = self.vehicle.velocity();

        let mut obs = Vec::with_capacity(OBSERVATION_SIZE);
        obs.extend([pose.position.x, pose.position.y, pose.position.z]);
        obs.extend([yaw.sin(), yaw.cos()]);
        obs.extend([goal.x, goal.y, goal.z]);
        obs.extend([velocity.x, velocity.y, velocity.z]);
        obs
    }

    // Accessors

    /// Current state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Outcome of the current episode.
    pub fn outcome(&self) -> EpisodeOutcome {
        self.outcome
    }

    /// Reward accumulated this episode.
    pub fn cumulative_reward(&self) -> f32 {
        self.cumulative_reward
    }

    /// Candidate center selected when parking started.
    pub fn nearest_goal(&self) -> Option<Vec3> {
        self.nearest_goal
    }

    /// Candidate spaces found this episode.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Markings detected this episode.
    pub fn markings(&self) -> &MarkingSet {
        &self.markings
    }

    /// Goals placed this episode.
    pub fn placed_goals(&self) -> &GoalArena {
        self.allocator.arena()
    }

    /// Command currently sent to the vehicle.
    pub fn command(&self) -> DriveCommand {
        self.command
    }

    /// Actions processed this episode.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Episode counter, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Is the end-of-episode sequence still running?
    pub fn is_sequence_active(&self) -> bool {
        self.sequence.is_active()
    }

    /// Maneuver statistics, if tracking is enabled.
    pub fn maneuvers(&self) -> Option<&ManeuverTracker> {
        self.tracker.as_ref()
    }

    /// Pedestrian monitor.
    pub fn pedestrians(&self) -> &PedestrianMonitor {
        &self.pedestrians
    }

    /// Active configuration.
    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    /// Host world.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Host world, mutable.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Controlled vehicle.
    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    /// Controlled vehicle, mutable.
    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }
}
