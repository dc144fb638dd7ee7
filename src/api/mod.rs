//! HTTP API exposing the agents' forward and resume calls.

mod routes;
pub mod types;

pub use routes::{routes, serve, AppState};
