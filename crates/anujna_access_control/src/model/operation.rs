//! I define types to represent resource operations resolved
//! from http requests.
//!

use anujna_space::resource::uri::SolidResourceUri;
use http::Method;
use http02::Extensions;

/// A struct to represent a resource operation resolved from an
/// http request.
#[derive(Debug)]
pub struct Operation {
    /// Http method of the operation.
    pub method: Method,

    /// Target resource uri.
    pub target: SolidResourceUri,

    /// Typed extensions attached to the operation.
    ///
    /// The authorizing handler records the resolved permission
    /// map here under
    /// [`KResolvedPermissionMap`](super::KResolvedPermissionMap).
    pub extensions: Extensions,
}

impl Operation {
    /// Create a new [`Operation`] with given method and target.
    #[inline]
    pub fn new(method: Method, target: SolidResourceUri) -> Self {
        Self {
            method,
            target,
            extensions: Extensions::new(),
        }
    }
}
