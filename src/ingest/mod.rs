//! HTTP ingestion surface: finished-match results and relayed gateway
//! events.

pub mod server;
pub mod signature;
