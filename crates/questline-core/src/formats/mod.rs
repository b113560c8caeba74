//! # Formats Module
//!
//! On-disk snapshot format for file-backed stores.
//!
//! This module contains:
//! - Binary snapshot format (magic header + version + postcard body)
//!
//! Note: File I/O operations remain in the app layer (apps/questline).
//! This module only handles format conversion (pure transformations).

mod persistence;

pub use persistence::*;
