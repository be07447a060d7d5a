//! I define the `acl:agent` access checker, as defined by wac
//! specification.
//!

use dyn_problem::ProbFuture;
use futures::future;
use rdf_utils::model::{
    graph::InfallibleGraph,
    handle::{HAny, Handle, HandleExt},
};
use rdf_vocabularies::ns;

use super::super::{AccessCheckRequest, AccessChecker};
use crate::model::reader::impl_::wac::uri_term;

/// An [`AccessChecker`] that resolves a match when the rule's
/// `acl:agent` attribute names the credential's webid.
#[derive(Debug, Clone, Default)]
pub struct AgentAccessChecker;

impl AgentAccessChecker {
    fn is_match<G: InfallibleGraph>(request: &AccessCheckRequest<G>) -> bool {
        let Some(web_id) = &request.credential.web_id else {
            return false;
        };

        let Ok(h_rule) = HAny::try_new(request.rule.clone()) else {
            return false;
        };

        h_rule.has_any_with(
            request.acl.as_ref(),
            &ns::acl::agent,
            &uri_term(web_id.as_str()),
        )
    }
}

impl<G: InfallibleGraph + Send + Sync + 'static> AccessChecker<G> for AgentAccessChecker {
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool> {
        Box::pin(future::ready(Ok(Self::is_match(&request))))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use claims::assert_ok;
    use rdf_utils::model::{term::ArcTerm, triple::ArcTriple};
    use sophia_api::term::FromTerm;

    use super::*;
    use crate::model::credentials::Credential;

    fn request(
        rule_webid_str: Option<&str>,
        credential_webid_str: Option<&str>,
    ) -> AccessCheckRequest<HashSet<ArcTriple>> {
        let rule = uri_term("http://ex.org/.acl#rule");

        let mut acl = HashSet::new();
        if let Some(webid_str) = rule_webid_str {
            acl.insert([
                rule.clone(),
                ArcTerm::from_term(ns::acl::agent),
                uri_term(webid_str),
            ]);
        }

        AccessCheckRequest {
            acl: Arc::new(acl),
            rule,
            credential: Credential {
                web_id: credential_webid_str.map(|webid_str| assert_ok!(webid_str.parse())),
                client_id: None,
            },
        }
    }

    #[tokio::test]
    async fn matching_webid_resolves_match() {
        let checker = AgentAccessChecker;
        assert!(assert_ok!(
            checker
                .resolve_match(request(
                    Some("http://ex.org/alice#me"),
                    Some("http://ex.org/alice#me"),
                ))
                .await
        ));
    }

    #[tokio::test]
    async fn mismatching_or_absent_webid_resolves_no_match() {
        let checker = AgentAccessChecker;

        assert!(!assert_ok!(
            checker
                .resolve_match(request(
                    Some("http://ex.org/alice#me"),
                    Some("http://ex.org/bob#me"),
                ))
                .await
        ));

        assert!(!assert_ok!(
            checker
                .resolve_match(request(Some("http://ex.org/alice#me"), None))
                .await
        ));
    }
}
