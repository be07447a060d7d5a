//! This crate provides a permission reader pipeline for
//! authorizing operations over resources in solid storage
//! spaces. It provides a default permission reader confirming
//! to the [`WAC`](https://solid.github.io/web-access-control-spec/)
//! authorization system, along with readers that adapt
//! permissions across auxiliary resources and container
//! hierarchies.
//!

#![warn(missing_docs)]
#![cfg_attr(doc_cfg, feature(doc_auto_cfg))]
#![deny(unused_qualifications)]

pub mod handler;
pub mod model;
pub mod repo;
