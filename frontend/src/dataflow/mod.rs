//! Actor+Relay primitives.
//!
//! - [`Relay`] carries events from the UI (or from other actors) to actors.
//! - [`Actor`] owns one piece of state and is the only writer of it.
//!
//! State is read through signals only; actors never expose a getter.

pub mod actor;
pub mod relay;

pub use actor::Actor;
pub use relay::{Relay, discard_queued, relay};
