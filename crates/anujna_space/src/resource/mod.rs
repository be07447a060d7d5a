//! I define models for resources in a solid storage space.
//!

pub mod uri;
