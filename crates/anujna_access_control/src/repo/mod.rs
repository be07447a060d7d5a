//! I define interfaces for the resource backends from which
//! the authorization layer retrieves policy representations and
//! resource existence information.
//!

use std::fmt::Debug;

use anujna_space::resource::uri::SolidResourceUri;
use dyn_problem::{define_anon_problem_types, ProbFuture};
use rdf_utils::model::graph::InfallibleGraph;

define_anon_problem_types!(
    /// Resource not found.
    RESOURCE_NOT_FOUND: ("Resource not found.");
);

/// A trait for stores that serve resource representations as
/// quad graphs.
///
/// Stores are shared across requests, and must be safe and
/// idempotent for concurrent reads.
pub trait ResourceStore: Debug + Send + Sync + 'static {
    /// Type of quad graphs the store serves representations as.
    type Graph: InfallibleGraph + Send + Sync + 'static;

    /// Get the representation of the resource with given uri as
    /// a quad graph.
    ///
    /// Must reject with a [`RESOURCE_NOT_FOUND`] typed problem
    /// when the resource doesn't exist. Any other problem is
    /// propagated as is.
    fn get_representation(&self, uri: &SolidResourceUri) -> ProbFuture<'static, Self::Graph>;
}

/// A trait for resolvers of resource existence in a storage
/// space.
pub trait ResourceSet: Debug + Send + Sync + 'static {
    /// Check if a resource with given uri exists.
    ///
    /// Must not err for plain nonexistence.
    fn has_resource(&self, uri: &SolidResourceUri) -> ProbFuture<'static, bool>;
}
