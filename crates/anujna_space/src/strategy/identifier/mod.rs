//! I define interface for strategies that resolve the
//! containment hierarchy of resource identifiers.
//!

use std::fmt::Debug;

use crate::resource::uri::SolidResourceUri;

pub mod impl_;

/// A trait for strategies that interpret the containment
/// hierarchy encoded in resource uris of a storage space.
///
/// Implementations must be deterministic, and pure functions
/// over identifiers.
pub trait IdentifierStrategy: Debug + Send + Sync + 'static {
    /// Check if given uri is in the namespace of this strategy's
    /// storage space.
    fn is_in_scope(&self, uri: &SolidResourceUri) -> bool;

    /// Check if given uri is the root container uri of the
    /// storage space.
    fn is_root_container(&self, uri: &SolidResourceUri) -> bool;

    /// Get the uri of the parent container of the resource with
    /// given uri.
    fn get_parent_container(
        &self,
        uri: &SolidResourceUri,
    ) -> Result<SolidResourceUri, ParentResolutionError>;
}

/// An error type for errors in resolving the parent container
/// of a resource uri.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParentResolutionError {
    /// Uri is out of the namespace of the storage space.
    #[error("Uri is out of the namespace of the storage space.")]
    UriOutOfSpace,

    /// Uri is not hierarchical.
    #[error("Uri is not hierarchical.")]
    NonHierarchicalUri,

    /// Root container has no parent container.
    #[error("Root container has no parent container.")]
    RootHasNoParent,
}
