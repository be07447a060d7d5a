//! I define an implementation of [`IdentifierStrategy`] for
//! storage spaces with a single root container.
//!

use crate::{
    resource::uri::{is_container_uri, SolidResourceUri},
    strategy::identifier::{IdentifierStrategy, ParentResolutionError},
};

/// An implementation of [`IdentifierStrategy`] for storage
/// spaces in which every resource traces to a single root
/// container through hierarchical uri paths.
///
/// The parent of `http://ex.org/a/b` is `http://ex.org/a/`,
/// and that of `http://ex.org/a/` is `http://ex.org/`.
#[derive(Debug, Clone)]
pub struct SingleRootIdentifierStrategy {
    /// Root container uri of the storage space.
    root: SolidResourceUri,
}

impl SingleRootIdentifierStrategy {
    /// Create a new [`SingleRootIdentifierStrategy`] with given
    /// root container uri.
    pub fn try_new(root: SolidResourceUri) -> Result<Self, InvalidRootContainerUri> {
        if !is_container_uri(&root) {
            return Err(InvalidRootContainerUri);
        }
        Ok(Self { root })
    }

    /// Get the root container uri of the storage space.
    #[inline]
    pub fn root(&self) -> &SolidResourceUri {
        &self.root
    }
}

impl IdentifierStrategy for SingleRootIdentifierStrategy {
    #[inline]
    fn is_in_scope(&self, uri: &SolidResourceUri) -> bool {
        uri.as_str().starts_with(self.root.as_str())
    }

    #[inline]
    fn is_root_container(&self, uri: &SolidResourceUri) -> bool {
        uri == &self.root
    }

    fn get_parent_container(
        &self,
        uri: &SolidResourceUri,
    ) -> Result<SolidResourceUri, ParentResolutionError> {
        if !self.is_in_scope(uri) {
            return Err(ParentResolutionError::UriOutOfSpace);
        }
        if self.is_root_container(uri) {
            return Err(ParentResolutionError::RootHasNoParent);
        }
        if uri.query_str().is_some() {
            return Err(ParentResolutionError::NonHierarchicalUri);
        }

        let uri_str = uri.as_str();
        let trimmed = uri_str.strip_suffix('/').unwrap_or(uri_str);

        // Slash preceding the last path segment. Guaranteed, as
        // uri is a strict hierarchical extension of the root
        // container uri.
        let seg_start = trimmed
            .rfind('/')
            .ok_or(ParentResolutionError::NonHierarchicalUri)?;

        Ok(
            SolidResourceUri::try_new_from(&uri_str[..=seg_start])
                .expect("Must be valid, as parent path of a normal absolute uri is normal."),
        )
    }
}

/// Error of a root container uri being invalid for the
/// strategy.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Given uri is not a valid root container uri.")]
pub struct InvalidRootContainerUri;
