//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time arrives as an argument, never from a global clock
//! - Randomness comes from an injected `RandomRange`
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod rect;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock, MonotonicTime, RandomRange, SequenceRandom};
pub use rect::Rect;
pub use state::{Bucket, GameEvent, GamePhase, GameState, Raindrop};
pub use tick::{TickInput, advance, apply_input, maybe_spawn, tick};
