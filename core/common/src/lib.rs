//! Common types shared across Coffer crates.
//!
//! This module provides the error taxonomy that every other crate reports
//! failures through, ensuring consistency across the workspace.

pub mod error;

pub use error::{Error, Result};
