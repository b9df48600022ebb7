//! General-purpose helpers for Coffer tools.
//!
//! Stateless array, string, math, and functional utilities, plus directory
//! traversal and timing primitives. Nothing in here touches the crypto
//! crates.

pub mod arrays;
pub mod compose;
pub mod math;
pub mod strings;
pub mod timing;
pub mod validate;
pub mod walk;

pub use timing::{Debouncer, Stopwatch, Throttle};
pub use validate::{not, validate};
