//! Host-side bridge and course player for lectern
//!
//! This crate consumes what the content side emits:
//! - Completion policy (one pure classification shared by every consumer)
//! - Bridge: transport listener, message filtering, progress/complete callbacks
//! - Course player: active lesson, sequential gating, guarded auto-advance
//!
//! Time-dependent behavior takes a monotonic instant from the caller, so the
//! player itself never sleeps or spawns timers.

mod bridge;
mod events;
mod lesson;
mod player;
mod policy;

pub use bridge::*;
pub use events::*;
pub use lesson::*;
pub use player::*;
pub use policy::*;
