//! Shared test utilities for the toolbelt workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`] - [`TestProject`] builder for config file layouts

pub mod project;

pub use project::TestProject;
