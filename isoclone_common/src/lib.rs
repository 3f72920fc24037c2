//! Common configuration shared across the isoclone workspace.
//!
//! This crate provides the run configuration consumed by the subgraph solvers
//! and by the benchmark scheduler.

mod config;

pub use crate::config::*;
