//! Integration tests for sthana-park using the sandbox world
//!
//! These tests drive a [`ParkingAgent`](sthana_park::ParkingAgent) through
//! whole episodes in the in-memory sandbox: a painted lot, parked cars and a
//! kinematic vehicle stepped at a fixed rate. Trigger contacts are raised by
//! the harness from box overlaps, the way a game engine would.
//!
//! # Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test --test integration -- --nocapture
//!
//! # Run a specific scenario
//! cargo test --test integration end_to_end
//! ```

mod harness;
mod scenarios;

// Re-export for test convenience
pub use harness::{HarnessConfig, ParkHarness, TestResult};
