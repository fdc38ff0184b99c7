//! Domain model module declarations.

pub mod action;
pub mod ban;
pub mod mode;
pub mod result;
pub mod session;
