//! Integration tests for mocktree
//!
//! These tests drive the dispatcher end to end: request encoding, fixture
//! lookup, capture against a local HTTP server, and scope handling.

#[path = "../common/mod.rs"]
pub mod common;

pub mod mock_lookup;
pub mod no_network;
