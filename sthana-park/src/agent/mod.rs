//! Parking agent: state machine, reward shaping and the end-of-episode sequence.
//!
//! [`ParkingAgent`] owns every per-episode component and is the only place
//! rewards are applied. Components report [`RewardEvent`]s back instead of
//! calling into the agent.
//!
//! ```text
//! SearchingForParking --candidates found--> Parking --terminal reward--> EpisodeEnded
//!          ^                                                                  |
//!          +------------------------- begin_episode --------------------------+
//! ```

pub mod action;
pub mod machine;
pub mod maneuver;
pub mod obstacle;
pub mod scoring;
pub mod sequence;
pub mod shaper;
pub mod state;

pub use action::Direction;
pub use machine::{OBSERVATION_SIZE, ParkingAgent, TickReport};
pub use maneuver::ManeuverTracker;
pub use obstacle::ObstacleCategory;
pub use scoring::{AlignmentScorer, GoalScore};
pub use sequence::{EndSequence, SequenceAction};
pub use shaper::RewardShaper;
pub use state::{AgentState, EpisodeOutcome, RewardEvent};
