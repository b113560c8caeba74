//! # Questline Library
//!
//! This library exposes the Questline host modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod store;
pub mod witness;

// Re-export questline_core for convenience
pub use questline_core;
