//! I define interface for authorizers, that resolve whether
//! required access is granted by resolved permissions.
//!

use std::fmt::Debug;

use dyn_problem::{define_anon_problem_types, ProbFuture};

use super::{credentials::CredentialSet, AccessMap, PermissionMap};

pub mod impl_;

define_anon_problem_types!(
    /// Access denied.
    ACCESS_DENIED: ("Access denied.");
);

/// A struct to represent input for authorizers.
#[derive(Debug, Clone)]
pub struct AuthorizerInput {
    /// Credentials of the request agent.
    pub credentials: CredentialSet,

    /// Required access modes per target resource.
    pub access_map: AccessMap,

    /// Resolved permissions per target resource.
    pub permission_map: PermissionMap,
}

/// A trait for authorizers.
///
/// An authorizer verifies that the resolved permissions satisfy
/// every required access mode, and rejects with an
/// [`ACCESS_DENIED`] typed problem otherwise. It produces no
/// value beyond success.
pub trait Authorizer: Debug + Send + Sync + 'static {
    /// Authorize the required access against resolved
    /// permissions.
    fn authorize(&self, input: AuthorizerInput) -> ProbFuture<'static, ()>;
}
