//! I define a suffix based implementation of auxiliary
//! identifier strategies.
//!

use crate::{
    resource::uri::SolidResourceUri,
    strategy::auxiliary::{
        AuxiliaryIdentifierStrategy, AuxiliaryStrategy, NotAnAuxiliaryIdentifier,
    },
};

/// An implementation of [`AuxiliaryStrategy`] that derives
/// auxiliary resource uris by appending a fixed suffix to their
/// subject resource uris. e.g. `.acl`.
#[derive(Debug, Clone)]
pub struct SuffixAuxiliaryStrategy {
    /// Suffix of auxiliary resource uris.
    suffix: String,

    /// Whether the linked auxiliary resources are authorized on
    /// their own.
    own_authorization: bool,
}

impl SuffixAuxiliaryStrategy {
    /// Create a new [`SuffixAuxiliaryStrategy`] with given
    /// suffix.
    pub fn try_new(
        suffix: impl Into<String>,
        own_authorization: bool,
    ) -> Result<Self, InvalidAuxiliarySuffix> {
        let suffix = suffix.into();
        if suffix.is_empty() || suffix.contains('/') || suffix.contains('?') {
            return Err(InvalidAuxiliarySuffix);
        }
        Ok(Self {
            suffix,
            own_authorization,
        })
    }

    /// Get the suffix of auxiliary resource uris.
    #[inline]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl AuxiliaryIdentifierStrategy for SuffixAuxiliaryStrategy {
    fn get_auxiliary_identifier(&self, subject: &SolidResourceUri) -> SolidResourceUri {
        SolidResourceUri::try_new_from(format!("{}{}", subject.as_str(), self.suffix).as_str())
            .expect("Must be valid, as suffix extension of a normal absolute uri is normal.")
    }

    #[inline]
    fn is_auxiliary_identifier(&self, uri: &SolidResourceUri) -> bool {
        uri.as_str().ends_with(&self.suffix)
    }

    fn get_subject_identifier(
        &self,
        uri: &SolidResourceUri,
    ) -> Result<SolidResourceUri, NotAnAuxiliaryIdentifier> {
        let subject_str = uri
            .as_str()
            .strip_suffix(&self.suffix)
            .ok_or(NotAnAuxiliaryIdentifier)?;

        SolidResourceUri::try_new_from(subject_str).map_err(|_| NotAnAuxiliaryIdentifier)
    }
}

impl AuxiliaryStrategy for SuffixAuxiliaryStrategy {
    #[inline]
    fn uses_own_authorization(&self, _uri: &SolidResourceUri) -> bool {
        self.own_authorization
    }
}

/// Error of an auxiliary uri suffix being invalid.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Given suffix is not a valid auxiliary uri suffix.")]
pub struct InvalidAuxiliarySuffix;
