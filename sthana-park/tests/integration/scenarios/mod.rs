//! Episode scenarios for integration tests
//!
//! Each scenario builds a sandbox lot, runs the agent through the harness
//! and checks rewards, state transitions and the end sequence.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration -- --nocapture
//! ```

mod config_test;
mod detection_test;
mod episode_test;
mod obstacle_test;
