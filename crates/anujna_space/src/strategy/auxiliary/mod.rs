//! I define interfaces for strategies that link auxiliary
//! resource identifiers to their subject resource identifiers.
//!

use std::fmt::Debug;

use crate::resource::uri::SolidResourceUri;

pub mod impl_;

/// A trait for strategies that derive auxiliary resource
/// identifiers from their subject resource identifiers, and
/// back.
///
/// Implementations must be deterministic, and pure functions
/// over identifiers.
pub trait AuxiliaryIdentifierStrategy: Debug + Send + Sync + 'static {
    /// Get the auxiliary resource uri for the subject resource
    /// with given uri.
    fn get_auxiliary_identifier(&self, subject: &SolidResourceUri) -> SolidResourceUri;

    /// Check if given uri is an auxiliary resource uri.
    fn is_auxiliary_identifier(&self, uri: &SolidResourceUri) -> bool;

    /// Get the uri of the subject resource of the auxiliary
    /// resource with given uri.
    fn get_subject_identifier(
        &self,
        uri: &SolidResourceUri,
    ) -> Result<SolidResourceUri, NotAnAuxiliaryIdentifier>;
}

/// A trait for auxiliary identifier strategies that also
/// resolve how access to the auxiliary resources is authorized.
pub trait AuxiliaryStrategy: AuxiliaryIdentifierStrategy {
    /// Check if the auxiliary resource with given uri is
    /// authorized on its own, instead of deriving authorization
    /// from its subject resource.
    fn uses_own_authorization(&self, uri: &SolidResourceUri) -> bool;
}

/// Error of a uri not being an auxiliary resource uri.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Given uri is not an auxiliary resource uri.")]
pub struct NotAnAuxiliaryIdentifier;
