//! I provide few default implementations of auxiliary
//! identifier strategies.
//!

pub mod suffix;
