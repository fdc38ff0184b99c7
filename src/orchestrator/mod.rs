//! Session orchestration modules.
//!
//! Covers the session registry, timed elections, the lifecycle state
//! machine, result correlation, ban escalation and the temporary channel
//! expiry sweep.

pub mod ban_tracker;
pub mod correlator;
pub mod election;
pub mod expiry;
pub mod lifecycle;
pub mod registry;
pub mod teams;
