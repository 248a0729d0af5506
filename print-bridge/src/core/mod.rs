//! Core: configuration, shared state, listener and errors
//!
//! - [`Config`] - bridge configuration
//! - [`AppState`] - per-request shared state
//! - [`Server`] - HTTP listener
//! - [`ServerError`] - start-up errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::AppState;
