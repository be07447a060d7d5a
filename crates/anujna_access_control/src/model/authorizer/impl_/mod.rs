//! I provide implementations of
//! [`Authorizer`](super::Authorizer).
//!

pub mod permission_based;
