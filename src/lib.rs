//! podpulse: host metrics endpoint and sibling service discovery for pods.

pub mod collector;
pub mod config;
pub mod console;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod snapshot;
pub mod state;
