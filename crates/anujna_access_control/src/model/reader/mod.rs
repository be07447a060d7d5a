//! I define interface for permission readers, that resolve
//! permissions granted to credentials over target resources.
//!

use std::{fmt::Debug, sync::Arc};

use dyn_problem::{define_anon_problem_types, ProbFuture, ProbResult};
use futures::future;

use super::{credentials::CredentialSet, AccessMap, PermissionMap};

pub mod impl_;

define_anon_problem_types!(
    /// Unsupported permission reader input.
    UNSUPPORTED_READER_INPUT: ("Unsupported permission reader input.");
);

/// A struct to represent input for permission readers.
#[derive(Debug, Clone)]
pub struct PermissionReaderInput {
    /// Credentials of the request agent.
    pub credentials: CredentialSet,

    /// Required access modes per target resource.
    pub access_map: AccessMap,
}

/// A trait for permission readers.
///
/// A permission reader resolves, for each target resource in
/// the input access map, the permissions granted to each
/// credential group.
///
/// A reader may return an incomplete map. Callers must treat
/// missing targets as having an empty permission set. Readers
/// must not mutate the input access map, and must hold no
/// mutable state, so that they are safe to invoke concurrently
/// across requests.
pub trait PermissionReader: Debug + Send + Sync + 'static {
    /// Check if this reader can handle given input.
    ///
    /// Declining readers must reject with an
    /// [`UNSUPPORTED_READER_INPUT`] typed problem.
    #[inline]
    fn can_handle(&self, _input: &PermissionReaderInput) -> ProbResult<()> {
        Ok(())
    }

    /// Resolve permissions over input targets.
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap>;

    /// Check if this reader can handle given input, and then
    /// handle it.
    fn handle_safe(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        match self.can_handle(&input) {
            Ok(()) => self.handle(input),
            Err(e) => Box::pin(future::ready(Err(e))),
        }
    }
}

impl<R: PermissionReader + ?Sized> PermissionReader for Arc<R> {
    #[inline]
    fn can_handle(&self, input: &PermissionReaderInput) -> ProbResult<()> {
        (**self).can_handle(input)
    }

    #[inline]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        (**self).handle(input)
    }
}

/// Type alias for arced dynamic permission readers.
pub type ArcPermissionReader = Arc<dyn PermissionReader>;
