//! Agent phases, episode outcomes and reward events.

use serde::{Deserialize, Serialize};

/// Phase of the parking agent.
///
/// Transitions are monotonic within an episode:
/// `SearchingForParking -> Parking -> EpisodeEnded`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Driving forward until the first parking space is found.
    #[default]
    SearchingForParking,

    /// Policy actions drive the vehicle.
    Parking,

    /// Terminal; only a new episode leaves this state.
    EpisodeEnded,
}

impl AgentState {
    /// Is this the terminal state?
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::EpisodeEnded)
    }

    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::SearchingForParking => "SearchingForParking",
            AgentState::Parking => "Parking",
            AgentState::EpisodeEnded => "EpisodeEnded",
        }
    }
}

/// How an episode finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// Episode still in progress.
    #[default]
    Running,

    /// Parked in a goal and aligned.
    Success,

    /// Parked in a goal but not aligned.
    PartialSuccess,

    /// Failed through a terminal penalty.
    Failure,

    /// Cut off by the step limit.
    Interrupted,
}

impl EpisodeOutcome {
    /// Has the episode finished?
    pub fn is_finished(&self) -> bool {
        !matches!(self, EpisodeOutcome::Running)
    }
}

/// Reward emitted by a component for the agent to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RewardEvent {
    /// Plain shaping reward; no state change.
    Add(f32),

    /// Reward for reaching a goal; final points end the episode.
    GivePoints {
        /// Reward amount.
        amount: f32,
        /// Ends the episode.
        is_final: bool,
        /// Parked within the alignment tolerance.
        is_aligned: bool,
    },

    /// Terminal penalty; always ends the episode as a failure.
    TakeAwayPoints(f32),
}

impl RewardEvent {
    /// Reward carried by the event.
    pub fn amount(&self) -> f32 {
        match *self {
            RewardEvent::Add(amount) => amount,
            RewardEvent::GivePoints { amount, .. } => amount,
            RewardEvent::TakeAwayPoints(amount) => amount,
        }
    }

    /// Does applying the event end the episode?
    pub fn is_terminal(&self) -> bool {
        match *self {
            RewardEvent::Add(_) => false,
            RewardEvent::GivePoints { is_final, .. } => is_final,
            RewardEvent::TakeAwayPoints(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_terminal() {
        assert!(!AgentState::SearchingForParking.is_terminal());
        assert!(!AgentState::Parking.is_terminal());
        assert!(AgentState::EpisodeEnded.is_terminal());
        assert_eq!(AgentState::default(), AgentState::SearchingForParking);
        assert_eq!(AgentState::Parking.name(), "Parking");
    }

    #[test]
    fn test_outcome_finished() {
        assert!(!EpisodeOutcome::Running.is_finished());
        assert!(EpisodeOutcome::PartialSuccess.is_finished());
        assert!(EpisodeOutcome::Interrupted.is_finished());
    }

    #[test]
    fn test_event_terminality() {
        assert!(!RewardEvent::Add(-0.2).is_terminal());
        assert!(RewardEvent::TakeAwayPoints(-0.2).is_terminal());
        let milestone = RewardEvent::GivePoints {
            amount: 0.8,
            is_final: false,
            is_aligned: false,
        };
        assert!(!milestone.is_terminal());
        assert_eq!(milestone.amount(), 0.8);
    }
}
