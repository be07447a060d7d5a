//! This crate provides abstractions over resource identifiers
//! in storage spaces confirming to generalized solid protocol.
//! It also provides few default strategy implementations.
//!

#![warn(missing_docs)]
#![cfg_attr(doc_cfg, feature(doc_auto_cfg))]
#![deny(unused_qualifications)]

pub mod resource;
pub mod strategy;
