//! # Sthana-Park: Parking-Space Perception and Reward Core
//!
//! Perception, goal placement and reward shaping for a simulated vehicle that
//! learns to find a free parking space and park in it.
//!
//! ## Features
//!
//! - **Floor-marking detection**: multi-pass sphere-cast fans from sensors mounted
//!   on the vehicle
//! - **Space clustering**: rectangular (90°) and angled (45°) spaces inferred from
//!   marking triples, rejected when a parked car occupies them
//! - **Goal placement**: one goal and ground highlight per free space, kept apart
//!   by a minimum separation
//! - **Episode state machine**: search, park, end, with reward events for
//!   detection, alignment, maneuvers, stalls, reversals and collisions
//! - **Deferred end sequence**: drive-to-goal, halt, feedback and pedestrian
//!   scoring as timers on the tick loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sthana_park::{ParkConfig, ParkingAgent};
//! use sthana_park::core::{Pose, Vec3};
//! use sthana_park::sandbox::{SandboxVehicle, SandboxWorld};
//!
//! let mut world = SandboxWorld::new();
//! world.add_rectangular_row(Pose::new(Vec3::new(7.3, 0.0, 20.0), 90.0), 4, 2.5, 5.0, &[0, 2]);
//! let vehicle = SandboxVehicle::new(Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0));
//!
//! let mut agent = ParkingAgent::with_config_rig(ParkConfig::default(), world, vehicle)?;
//! for _ in 0..200 {
//!     agent.on_action(1, 0.1);
//!     agent.vehicle_mut().step(0.1);
//!     let report = agent.tick(0.1);
//!     if report.ended {
//!         break;
//!     }
//! }
//! println!("{:?}: reward {:.3}", agent.outcome(), agent.cumulative_reward());
//! # Ok::<(), sthana_park::Error>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! - **Y-up**: the ground is the XZ plane
//! - **Z-forward**: zero yaw faces +Z
//! - **Yaw**: degrees, clockwise seen from above, so a right turn is positive
//!
//! ## Architecture
//!
//! - [`core`]: Vec3, Pose and scalar helpers
//! - [`config`]: YAML configuration sections
//! - [`world`]: traits the host simulation implements
//! - [`perception`]: marking detection, space clustering, pedestrian monitor
//! - [`goals`]: goal arena and placement
//! - [`agent`]: state machine, reward shaping, scoring, end sequence
//! - [`sandbox`]: in-memory world and vehicle for tests and demos
//!
//! ## Data Flow
//!
//! ```text
//!   Vehicle pose ──► SensorRig ──► LineDetector ──► MarkingSet (episode history)
//!                                                         │
//!                                                         ▼
//!                                  PhysicsQuery ◄── SpaceClusterer
//!                                  (occupancy)            │
//!                                                         ▼
//!                                                   CandidateSet ──► GoalAllocator ──► SceneObjects
//!                                                         │
//!                                                         ▼
//!   Policy action ─────────────────────────────────► ParkingAgent ──► DriveCommand ──► VehicleMotor
//!   Goal / obstacle triggers ──────────────────────►  (rewards)
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod error;
pub mod goals;
pub mod perception;
pub mod sandbox;
pub mod world;

// Re-export main types at crate root
pub use agent::{
    AgentState, AlignmentScorer, Direction, EndSequence, EpisodeOutcome, ManeuverTracker,
    ObstacleCategory, ParkingAgent, RewardEvent, RewardShaper, TickReport,
};
pub use config::ParkConfig;
pub use error::{ActionError, ConfigLoadError, Error, Result};

// Re-export perception and placement for standalone use
pub use goals::{GoalAllocator, GoalArena, GoalId};
pub use perception::{
    CandidateSet, CandidateSpace, LineDetector, LineMarker, OrientationClass, PedestrianMonitor,
    SensorRig, SpaceClusterer,
};

// Re-export host interfaces
pub use world::{
    CastHit, DriveCommand, EpisodeFeedback, LayerMask, MarkerKind, ObjectId, OverlapHit,
    PhysicsQuery, SceneObjects, Tag, VehicleMotor,
};
