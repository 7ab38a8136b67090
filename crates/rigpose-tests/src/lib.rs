//! rigpose End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the engine and CLI:
//!
//! - **Scenarios**: action transitions, interruption and flag cutover
//! - **Frame invariants**: limits and finiteness under arbitrary input
//! - **Collision escape**: arms forced into the torso get pushed out
//! - **CLI simulate**: scripts on disk driven through the simulate command
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rigpose-tests
//! ```

pub mod fixtures;
