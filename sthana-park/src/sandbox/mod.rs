//! In-memory simulation for tests and demos.
//!
//! Stands in for the host engine: [`SandboxWorld`] answers physics queries
//! and owns object lifecycle, [`SandboxVehicle`] integrates drive commands.
//! Geometry is deliberately coarse (axis-aligned bounds, kinematic motion);
//! production hosts bring their own engine.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut world = SandboxWorld::new();
//! world.add_rectangular_row(Pose::new(Vec3::new(7.3, 0.0, 20.0), 90.0), 4, 2.5, 5.0, &[0, 2]);
//! let vehicle = SandboxVehicle::new(Pose::new(Vec3::new(0.0, 0.5, 0.0), 0.0));
//! let mut agent = ParkingAgent::with_config_rig(ParkConfig::default(), world, vehicle)?;
//! loop {
//!     agent.on_action(policy(&agent.collect_observations()), 0.1);
//!     agent.vehicle_mut().step(0.1);
//!     if agent.tick(0.1).ended { break; }
//! }
//! ```

mod vehicle;
mod world;

pub use vehicle::{SandboxVehicle, VehicleDynamics};
pub use world::{SandboxObject, SandboxWorld};
