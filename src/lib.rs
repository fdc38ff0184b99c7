#![forbid(unsafe_code)]

//! `scrim-coordinator`: match session lifecycle orchestrator for
//! voice-chat gaming communities.

pub mod backend;
pub mod config;
pub mod effect;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod state;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
