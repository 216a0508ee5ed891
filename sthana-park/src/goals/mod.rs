//! Goal markers placed at candidate parking spaces.

pub mod allocator;
pub mod arena;

pub use allocator::GoalAllocator;
pub use arena::{GoalArena, GoalId, PlacedGoal};
