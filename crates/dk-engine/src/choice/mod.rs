//! Choice engine for branching narratives.
//!
//! This module provides conditions, effects, guarded choices, and the
//! generators that derive choices from the current state.

mod condition;
mod effect;
pub mod generic;
mod rule;

pub use condition::Condition;
pub use effect::Effect;
pub use rule::{Choice, Exit, ResultText, Target};
