//! I define interface for modes extractors, that resolve the
//! access modes an operation requires.
//!

use std::fmt::Debug;

use dyn_problem::{define_anon_problem_types, ProbFuture, ProbResult};
use futures::future;

use super::{operation::Operation, AccessMap};

pub mod impl_;

define_anon_problem_types!(
    /// Unsupported operation method.
    UNSUPPORTED_OPERATION_METHOD: ("Unsupported operation method.");
);

/// A trait for modes extractors.
///
/// A modes extractor resolves, for an operation, the access
/// modes it requires per target resource.
pub trait ModesExtractor: Debug + Send + Sync + 'static {
    /// Check if this extractor can handle given operation.
    ///
    /// Declining extractors must reject with an
    /// [`UNSUPPORTED_OPERATION_METHOD`] typed problem.
    #[inline]
    fn can_handle(&self, _operation: &Operation) -> ProbResult<()> {
        Ok(())
    }

    /// Resolve the access modes given operation requires.
    fn extract(&self, operation: &Operation) -> ProbFuture<'static, AccessMap>;

    /// Check if this extractor can handle given operation, and
    /// then extract from it.
    fn extract_safe(&self, operation: &Operation) -> ProbFuture<'static, AccessMap> {
        match self.can_handle(operation) {
            Ok(()) => self.extract(operation),
            Err(e) => Box::pin(future::ready(Err(e))),
        }
    }
}
