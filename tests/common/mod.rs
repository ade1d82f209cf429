//! Shared test utilities for mocktree
//!
//! This module provides common helpers for integration tests:
//! - Log capture through `tracing-subscriber`
//! - Fixture tree builders rooted in temporary directories
//! - Instrumented transports and stores

pub mod fixtures;
pub mod logging;
pub mod transports;
