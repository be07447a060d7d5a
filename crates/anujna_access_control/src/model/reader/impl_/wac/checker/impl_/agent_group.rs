//! I define the `acl:agentGroup` access checker, as defined by
//! wac specification.
//!

use dyn_problem::ProbFuture;
use futures::future;
use rdf_utils::model::{
    graph::InfallibleGraph,
    handle::{HAny, Handle, HandleExt},
};
use rdf_vocabularies::ns;
use sophia_api::{graph::Graph, term::Term};

use super::super::{AccessCheckRequest, AccessChecker};
use crate::model::reader::impl_::wac::uri_term;

/// An [`AccessChecker`] that resolves a match when the
/// credential's webid is a member of a group named by the
/// rule's `acl:agentGroup` attribute.
///
/// Group membership is resolved from `vcard:hasMember`
/// statements in the acl document itself.
#[derive(Debug, Clone, Default)]
pub struct AgentGroupAccessChecker;

impl AgentGroupAccessChecker {
    fn is_match<G: InfallibleGraph>(request: &AccessCheckRequest<G>) -> bool {
        let Some(web_id) = &request.credential.web_id else {
            return false;
        };

        let Ok(h_rule) = HAny::try_new(request.rule.clone()) else {
            return false;
        };

        let web_id_term = uri_term(web_id.as_str());

        let is_match = h_rule
            .get_all(request.acl.as_ref(), &ns::acl::agentGroup)
            .any(|group| {
                request
                    .acl
                    .triples_matching([group.borrow_term()], [ns::vcard::hasMember], [&web_id_term])
                    .next()
                    .is_some()
            });
        is_match
    }
}

impl<G: InfallibleGraph + Send + Sync + 'static> AccessChecker<G> for AgentGroupAccessChecker {
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool> {
        Box::pin(future::ready(Ok(Self::is_match(&request))))
    }
}
