//! Request state controller for the email writer.
//!
//! The controller accepts one submission at a time, moves through
//! `Idle -> InFlight -> Settled`, and publishes every transition to
//! subscribers so a UI can render the idle placeholder, a loading indicator,
//! or the settled result.

#![warn(missing_docs, clippy::pedantic)]

mod controller;
mod lifecycle;

pub use controller::{IgnoreReason, RequestController, RequestSnapshot, Submission};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleResult, RequestEvent, RequestState};
