//! Round state machine
//!
//! All gameplay logic lives here. No browser or rendering dependencies:
//! - Inputs arrive one at a time through `step`
//! - Randomness is injected by the caller
//! - The caller owns the one-second interval and calls `Tick`

pub mod state;
pub mod step;

pub use state::{Mark, MarkKind, MarkRules, Round, RoundEvent, RoundPhase, TimerMode};
pub use step::{RoundInput, step};
