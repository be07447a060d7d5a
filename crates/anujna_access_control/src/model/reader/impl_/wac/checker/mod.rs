//! I define interface for access checkers, that resolve
//! whether a wac authorization rule applies to a credential.
//!

use std::{fmt::Debug, sync::Arc};

use dyn_problem::ProbFuture;
use rdf_utils::model::{graph::InfallibleGraph, term::ArcTerm};

use crate::model::credentials::Credential;

pub mod impl_;

/// A struct to represent an access check request.
#[derive(Debug)]
pub struct AccessCheckRequest<G> {
    /// Graph of the acl document the rule belongs to.
    pub acl: Arc<G>,

    /// Subject term of the authorization rule under evaluation.
    pub rule: ArcTerm,

    /// Credential under evaluation.
    pub credential: Credential,
}

impl<G> Clone for AccessCheckRequest<G> {
    fn clone(&self) -> Self {
        Self {
            acl: self.acl.clone(),
            rule: self.rule.clone(),
            credential: self.credential.clone(),
        }
    }
}

/// A trait for access checkers.
///
/// An access checker resolves whether an authorization rule
/// applies to a credential. Checkers must be pure over their
/// request inputs.
pub trait AccessChecker<G: InfallibleGraph>: Debug + Send + Sync + 'static {
    /// Resolve if the rule in given request applies to the
    /// request credential.
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool>;
}

impl<G: InfallibleGraph, C: AccessChecker<G> + ?Sized> AccessChecker<G> for Arc<C> {
    #[inline]
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool> {
        (**self).resolve_match(request)
    }
}

/// Type alias for arced dynamic access checkers.
pub type ArcAccessChecker<G> = Arc<dyn AccessChecker<G>>;

/// An access checker that resolves a match when any of its
/// child checkers resolves one.
pub struct UnionAccessChecker<G> {
    /// Child checkers.
    checkers: Vec<ArcAccessChecker<G>>,
}

impl<G> Debug for UnionAccessChecker<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionAccessChecker").finish()
    }
}

impl<G> Clone for UnionAccessChecker<G> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            checkers: self.checkers.clone(),
        }
    }
}

impl<G> UnionAccessChecker<G> {
    /// Create a new [`UnionAccessChecker`] with given child
    /// checkers.
    #[inline]
    pub fn new(checkers: Vec<ArcAccessChecker<G>>) -> Self {
        Self { checkers }
    }
}

impl<G: InfallibleGraph + Send + Sync + 'static> AccessChecker<G> for UnionAccessChecker<G> {
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool> {
        let checkers = self.checkers.clone();

        Box::pin(async move {
            for checker in checkers {
                if checker.resolve_match(request.clone()).await? {
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }
}
