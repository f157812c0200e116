//! Domain types shared by the repository, service and presentation layers.

pub mod client;
pub mod filters;
pub mod payment;
pub mod report;
pub mod types;
