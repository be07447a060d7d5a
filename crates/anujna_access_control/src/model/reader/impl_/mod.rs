//! I provide implementations of
//! [`PermissionReader`](super::PermissionReader).
//!

pub mod all_static;
pub mod auxiliary;
pub mod parent_container;
pub mod path_based;
pub mod union;
pub mod wac;
pub mod wac_auxiliary;
