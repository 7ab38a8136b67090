//! rigpose CLI library.
//!
//! This crate provides the command implementations behind the `rigpose`
//! binary: listing actions, sampling poses, running scripted simulations and
//! checking engine configuration files.

pub mod commands;
pub mod script;
