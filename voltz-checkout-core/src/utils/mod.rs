//! Shared helpers

pub mod datetime;
pub mod hostname;
