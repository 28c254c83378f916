//! Request-scoped data types for the research pipeline.

pub mod competitor;
pub mod config;
pub mod keyword;
pub mod plan;
pub mod website;
