//! I define the `acl:agentClass` access checker, as defined by
//! wac specification.
//!

use dyn_problem::ProbFuture;
use futures::future;
use rdf_utils::model::{
    graph::InfallibleGraph,
    handle::{HAny, Handle, HandleExt},
};
use rdf_vocabularies::ns;

use super::super::{AccessCheckRequest, AccessChecker};

/// An [`AccessChecker`] that resolves a match over the rule's
/// `acl:agentClass` attribute.
///
/// The class `foaf:Agent` matches any credential, while
/// `acl:AuthenticatedAgent` matches credentials bearing a
/// webid.
#[derive(Debug, Clone, Default)]
pub struct AgentClassAccessChecker;

impl AgentClassAccessChecker {
    fn is_match<G: InfallibleGraph>(request: &AccessCheckRequest<G>) -> bool {
        let Ok(h_rule) = HAny::try_new(request.rule.clone()) else {
            return false;
        };

        if h_rule.has_any_with(request.acl.as_ref(), &ns::acl::agentClass, &ns::foaf::Agent) {
            return true;
        }

        request.credential.web_id.is_some()
            && h_rule.has_any_with(
                request.acl.as_ref(),
                &ns::acl::agentClass,
                &ns::acl::AuthenticatedAgent,
            )
    }
}

impl<G: InfallibleGraph + Send + Sync + 'static> AccessChecker<G> for AgentClassAccessChecker {
    fn resolve_match(&self, request: AccessCheckRequest<G>) -> ProbFuture<'static, bool> {
        Box::pin(future::ready(Ok(Self::is_match(&request))))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use claims::assert_ok;
    use rdf_utils::model::{term::ArcTerm, triple::ArcTriple};
    use rstest::rstest;
    use sophia_api::term::{FromTerm, Term};

    use super::*;
    use crate::model::{credentials::Credential, reader::impl_::wac::uri_term};

    fn request(
        agent_class: Option<ArcTerm>,
        credential_webid_str: Option<&str>,
    ) -> AccessCheckRequest<HashSet<ArcTriple>> {
        let rule = uri_term("http://ex.org/.acl#rule");

        let mut acl = HashSet::new();
        if let Some(class) = agent_class {
            acl.insert([rule.clone(), ArcTerm::from_term(ns::acl::agentClass), class]);
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

    #[rstest]
    // Everyone matches `foaf:Agent`.
    #[case(Some(ns::foaf::Agent.into_term()), None, true)]
    #[case(Some(ns::foaf::Agent.into_term()), Some("http://ex.org/alice#me"), true)]
    // Only webid bearers match `acl:AuthenticatedAgent`.
    #[case(Some(ns::acl::AuthenticatedAgent.into_term()), None, false)]
    #[case(
        Some(ns::acl::AuthenticatedAgent.into_term()),
        Some("http://ex.org/alice#me"),
        true
    )]
    // Rules without the attribute match nobody.
    #[case(None, Some("http://ex.org/alice#me"), false)]
    #[tokio::test]
    async fn agent_class_matching_works_correctly(
        #[case] agent_class: Option<ArcTerm>,
        #[case] credential_webid_str: Option<&str>,
        #[case] expected: bool,
    ) {
        let checker = AgentClassAccessChecker;
        assert_eq!(
            assert_ok!(
                checker
                    .resolve_match(request(agent_class, credential_webid_str))
                    .await
            ),
            expected
        );
    }
}
