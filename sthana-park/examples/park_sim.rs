//! Parking episodes in the sandbox lot.
//!
//! Builds a random lot beside a straight road, lets the agent search for a
//! free space and then drives it with a simple policy until the episode ends.
//!
//! Usage:
//!   cargo run --example park_sim -- --episodes 5 --policy heuristic
//!   RUST_LOG=debug cargo run --example park_sim -- --seed 7

use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::path::Path;

use sthana_park::core::{Pose, Vec3};
use sthana_park::sandbox::{SandboxVehicle, SandboxWorld};
use sthana_park::{
    Direction, EpisodeOutcome, ObjectId, ObstacleCategory, ParkConfig, ParkingAgent, Tag,
    VehicleMotor,
};

/// Simulation timestep (seconds).
const DT: f32 = 0.1;

/// Half extents of the vehicle's trigger box.
const VEHICLE_HALF_EXTENTS: Vec3 = Vec3::new(0.9, 0.75, 2.2);

/// Parking episodes in a sandbox lot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/park.yaml")]
    config: String,

    /// Number of episodes to run
    #[arg(short, long, default_value_t = 3)]
    episodes: usize,

    /// Random seed for lot layouts and the random policy
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Policy used once a space has been found
    #[arg(short, long, value_enum, default_value_t = Policy::Heuristic)]
    policy: Policy,

    /// Simulation steps per episode
    #[arg(long, default_value_t = 1500)]
    max_ticks: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Uniformly random actions
    Random,
    /// Turn toward the selected goal, then drive forward
    Heuristic,
}

type SimAgent = ParkingAgent<SandboxWorld, SandboxVehicle>;

/// Episode summary.
struct EpisodeResult {
    outcome: EpisodeOutcome,
    reward: f32,
    ticks: usize,
    candidates: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config_path = Path::new(&args.config);
    let config = if config_path.exists() {
        ParkConfig::load(config_path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}, using defaults", e);
            ParkConfig::default()
        })
    } else {
        println!(
            "Config not found at {}, using defaults",
            config_path.display()
        );
        ParkConfig::default()
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut results = Vec::with_capacity(args.episodes);

    for episode in 1..=args.episodes {
        let world = random_lot(&mut rng);
        let vehicle = SandboxVehicle::new(Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0));
        let mut agent = match ParkingAgent::with_config_rig(config.clone(), world, vehicle) {
            Ok(agent) => agent,
            Err(e) => {
                eprintln!("Invalid configuration: {}", e);
                std::process::exit(1);
            }
        };

        let result = run_episode(&mut agent, args.policy, args.max_ticks, &mut rng);
        println!(
            "Episode {:>3}: {:<15} reward {:>7.3}  ticks {:>5}  spaces {}",
            episode,
            format!("{:?}", result.outcome),
            result.reward,
            result.ticks,
            result.candidates
        );
        results.push(result);
    }

    print_summary(&results);
}

/// Straight road along +Z with a rectangular row on the right and an angled
/// row on the left, some spaces taken.
fn random_lot(rng: &mut StdRng) -> SandboxWorld {
    let mut world = SandboxWorld::new();

    let spaces = 6;
    let occupied: Vec<usize> = (0..spaces).filter(|_| rng.random_bool(0.5)).collect();
    let row_start = rng.random_range(15.0..25.0);
    world.add_rectangular_row(
        Pose::new(Vec3::new(7.3, 0.0, row_start + spaces as f32 * 2.5), 90.0),
        spaces,
        2.5,
        5.0,
        &occupied,
    );

    let occupied: Vec<usize> = (0..4).filter(|_| rng.random_bool(0.5)).collect();
    world.add_angled_row(Vec3::new(-11.0, 0.0, row_start), 4, 4.0, &occupied);

    // Road edges
    world.add_obstacle(Tag::Grass, Vec3::new(-4.5, 0.0, 30.0), Vec3::new(0.5, 0.05, 30.0));
    world.add_obstacle(Tag::Barrier, Vec3::new(0.0, 0.5, 70.0), Vec3::new(4.0, 0.5, 0.2));
    world
}

fn run_episode(
    agent: &mut SimAgent,
    policy: Policy,
    max_ticks: usize,
    rng: &mut StdRng,
) -> EpisodeResult {
    let mut touching = HashSet::new();
    let mut ticks = 0;

    while ticks < max_ticks {
        if agent.outcome().is_finished() && !agent.is_sequence_active() {
            break;
        }

        let action = choose_action(agent, policy, rng);
        agent.on_action(action.index(), DT);
        agent.tick(DT);
        agent.vehicle_mut().step(DT);
        raise_contacts(agent, &mut touching);
        ticks += 1;
    }

    EpisodeResult {
        outcome: agent.outcome(),
        reward: agent.cumulative_reward(),
        ticks,
        candidates: agent.candidates().len(),
    }
}

fn choose_action(agent: &SimAgent, policy: Policy, rng: &mut StdRng) -> Direction {
    match policy {
        Policy::Random => Direction::ALL[rng.random_range(0..Direction::ALL.len())],
        Policy::Heuristic => {
            let Some(goal) = agent.nearest_goal() else {
                return Direction::MoveForward;
            };
            let pose = agent.vehicle().pose();
            let to_goal = (goal - pose.position).flattened();
            let bearing = pose.forward().signed_angle(to_goal, Vec3::UP);
            if bearing > 15.0 {
                Direction::TurnRight
            } else if bearing < -15.0 {
                Direction::TurnLeft
            } else {
                Direction::MoveForward
            }
        }
    }
}

/// Report objects the vehicle started touching this step.
fn raise_contacts(agent: &mut SimAgent, touching: &mut HashSet<ObjectId>) {
    let pose = agent.vehicle().pose();
    let contacts = agent.world().contacts(pose, VEHICLE_HALF_EXTENTS);

    let mut now = HashSet::new();
    for hit in contacts {
        now.insert(hit.object);
        if touching.contains(&hit.object) {
            continue;
        }
        match hit.tag {
            Tag::Goal => agent.on_goal_entered(hit.object),
            Tag::Car | Tag::Pedestrian | Tag::Barrier | Tag::Tree | Tag::Grass => {
                agent.on_obstacle_hit(ObstacleCategory::from_tag(hit.tag))
            }
            _ => {}
        }
    }
    *touching = now;
}

fn print_summary(results: &[EpisodeResult]) {
    if results.is_empty() {
        return;
    }
    let count = |outcome: EpisodeOutcome| results.iter().filter(|r| r.outcome == outcome).count();
    let mean = results.iter().map(|r| r.reward).sum::<f32>() / results.len() as f32;

    println!();
    println!("=== Summary ===");
    println!("Episodes:        {}", results.len());
    println!("Success:         {}", count(EpisodeOutcome::Success));
    println!("Partial success: {}", count(EpisodeOutcome::PartialSuccess));
    println!("Failure:         {}", count(EpisodeOutcome::Failure));
    println!("Interrupted:     {}", count(EpisodeOutcome::Interrupted));
    println!("Mean reward:     {:.3}", mean);
}
