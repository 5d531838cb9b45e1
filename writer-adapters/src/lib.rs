//! Generation client adapters.
//!
//! Each provider module implements [`TextGenerator`](traits::TextGenerator);
//! [`connect`] picks the adapter named by the configuration.

#![warn(missing_docs, clippy::pedantic)]

pub mod chat;
pub mod gemini;
pub mod traits;

mod classify;
mod http_client;
mod provider;

#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use provider::connect;
