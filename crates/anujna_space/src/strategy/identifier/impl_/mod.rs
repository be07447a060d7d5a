//! I provide few default implementations of
//! [`IdentifierStrategy`](super::IdentifierStrategy).
//!

pub mod single_root;
