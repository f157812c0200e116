//! Settings models.

pub mod config;
