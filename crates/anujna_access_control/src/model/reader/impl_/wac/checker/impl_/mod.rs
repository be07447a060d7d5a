//! I provide implementations of
//! [`AccessChecker`](super::AccessChecker).
//!

pub mod agent;
pub mod agent_class;
pub mod agent_group;
