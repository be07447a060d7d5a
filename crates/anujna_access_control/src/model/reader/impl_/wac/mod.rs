//! I define a permission reader that resolves permissions from
//! web access control lists, in conformance with the
//! [`WAC`](https://solid.github.io/web-access-control-spec/)
//! specification.
//!

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use anujna_space::{
    resource::uri::SolidResourceUri,
    strategy::{auxiliary::AuxiliaryIdentifierStrategy, identifier::IdentifierStrategy},
};
use dyn_problem::{
    define_anon_problem_types, type_::INTERNAL_ERROR, ProbFuture, ProbResult, Problem,
};
use rdf_utils::{
    define_handle_and_description_types,
    model::{
        description::{Description, DescriptionExt, SimpleDescription},
        handle::{HAny, Handle},
        term::ArcTerm,
    },
};
use once_cell::sync::Lazy;
use rdf_vocabularies::ns;
use sophia_api::{
    graph::Graph,
    prelude::IriRef,
    term::{matcher::Any, FromTerm, Term},
    triple::Triple,
};
use tracing::{error, info};
use unwrap_infallible::UnwrapInfallible;

use self::checker::{AccessCheckRequest, AccessChecker};
use crate::{
    model::{
        credentials::{CredentialGroup, CredentialSet},
        reader::{PermissionReader, PermissionReaderInput},
        AccessMode, Permission, PermissionMap, PermissionSet, Verdict,
    },
    repo::{ResourceStore, RESOURCE_NOT_FOUND},
};

pub mod checker;

define_anon_problem_types!(
    /// No acl resource found for the root container.
    NO_ROOT_ACL_RESOURCE: ("No acl resource found for the root container.");

    /// Error in retrieving an acl representation.
    ACL_RETRIEVAL_ERROR: ("Error in retrieving an acl representation.");
);

define_handle_and_description_types!(
    /// Handle for `acl:Authorization` rule subjects.
    HAuthorization;
    /// Description of `acl:Authorization` rule subjects.
    DAuthorization;
    [
        /// Resources the rule grants access to directly.
        (access_to, &ns::acl::accessTo, HAny);

        /// Containers whose contained resources inherit the
        /// rule.
        (default, &ns::acl::default, HAny);

        /// Granted access mode classes.
        (mode, &ns::acl::mode, HAny);
    ]
);

/// Get an rdf iri term for given uri str.
pub(crate) fn uri_term(uri_str: &str) -> ArcTerm {
    ArcTerm::Iri(IriRef::new_unchecked(uri_str.into()))
}

/// An effective acl resolved for a group of targets.
#[derive(Debug)]
struct EffectiveAcl<G> {
    /// Uri of the resource whose own acl resolved effective.
    subject_uri: SolidResourceUri,

    /// Graph of the effective acl representation.
    graph: Arc<G>,

    /// Targets the acl governs.
    targets: Vec<SolidResourceUri>,
}

/// A permission reader that resolves permissions from wac acl
/// documents stored as auxiliary resources.
///
/// For each target, the effective acl is the acl of the nearest
/// resource on the target's ancestor chain that has one.
/// Targets governed by a common effective acl are resolved
/// together: targets that are the acl's own subject match rules
/// through `acl:accessTo`, while contained targets match rules
/// through `acl:default`. Rules apply to a credential when the
/// configured [`AccessChecker`] resolves a match, and matched
/// rules contribute their `acl:mode` grants monotonically. This
/// reader never resolves an explicit `Deny`.
pub struct WacPermissionReader<ST, AC>
where
    ST: ResourceStore,
{
    /// Store serving acl representations.
    store: Arc<ST>,

    /// Checker for rule applicability.
    access_checker: Arc<AC>,

    /// Strategy linking acl resources to their subjects.
    acl_strategy: Arc<dyn AuxiliaryIdentifierStrategy>,

    /// Strategy resolving the containment hierarchy.
    identifier_strategy: Arc<dyn IdentifierStrategy>,
}

impl<ST: ResourceStore, AC> Debug for WacPermissionReader<ST, AC> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WacPermissionReader").finish()
    }
}

impl<ST: ResourceStore, AC> Clone for WacPermissionReader<ST, AC> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            access_checker: self.access_checker.clone(),
            acl_strategy: self.acl_strategy.clone(),
            identifier_strategy: self.identifier_strategy.clone(),
        }
    }
}

impl<ST: ResourceStore, AC> WacPermissionReader<ST, AC> {
    /// Create a new [`WacPermissionReader`] with given store,
    /// access checker, and strategies.
    #[inline]
    pub fn new(
        store: Arc<ST>,
        access_checker: Arc<AC>,
        acl_strategy: Arc<dyn AuxiliaryIdentifierStrategy>,
        identifier_strategy: Arc<dyn IdentifierStrategy>,
    ) -> Self {
        Self {
            store,
            access_checker,
            acl_strategy,
            identifier_strategy,
        }
    }
}

impl<ST, AC> WacPermissionReader<ST, AC>
where
    ST: ResourceStore,
    AC: AccessChecker<ST::Graph>,
{
    /// Resolve the nearest effective acl for given target, by
    /// walking up its ancestor chain.
    ///
    /// Fetch results are memoized in `fetched` for the duration
    /// of one reader call, so that no acl resource is fetched
    /// twice.
    async fn resolve_nearest_acl(
        &self,
        target: &SolidResourceUri,
        fetched: &mut HashMap<SolidResourceUri, Option<Arc<ST::Graph>>>,
    ) -> ProbResult<(SolidResourceUri, Arc<ST::Graph>)> {
        let mut current = target.clone();

        loop {
            let acl_uri = self.acl_strategy.get_auxiliary_identifier(&current);

            let fetch_result = match fetched.get(&acl_uri) {
                Some(memo) => memo.clone(),
                None => {
                    let result = match self.store.get_representation(&acl_uri).await {
                        Ok(graph) => Some(Arc::new(graph)),
                        Err(e) if RESOURCE_NOT_FOUND.is_type_of(&e) => None,
                        Err(e) => {
                            error!(
                                "Error in retrieving acl representation. Uri: {}",
                                acl_uri.as_str()
                            );
                            return Err(acl_retrieval_problem(&current, e));
                        }
                    };
                    fetched.insert(acl_uri, result.clone());
                    result
                }
            };

            if let Some(graph) = fetch_result {
                return Ok((current, graph));
            }

            if self.identifier_strategy.is_root_container(&current) {
                info!("No acl resource found up to the root container.");
                return Err(NO_ROOT_ACL_RESOURCE
                    .new_problem_builder()
                    .message(format!(
                        "No ACL document found for root container {}.",
                        current.as_str()
                    ))
                    .finish());
            }

            current = self
                .identifier_strategy
                .get_parent_container(&current)
                .map_err(|e| {
                    error!(
                        "Can not resolve parent container of {}.",
                        current.as_str()
                    );
                    INTERNAL_ERROR.new_problem_builder().source(e).finish()
                })?;
        }
    }

    /// Resolve effective acls for given targets, grouping
    /// targets that share one.
    ///
    /// Iterations pick the unclaimed target with the longest
    /// uri, resolve its effective acl, and claim every
    /// unclaimed target on its ancestor chain that the same acl
    /// governs. Targets whose own effective acl sits above the
    /// resolved one stay unclaimed for later iterations.
    async fn resolve_effective_acls(
        &self,
        targets: Vec<SolidResourceUri>,
    ) -> ProbResult<Vec<EffectiveAcl<ST::Graph>>> {
        let mut unclaimed = targets;
        let mut fetched = HashMap::new();
        let mut effective_acls = Vec::new();

        while !unclaimed.is_empty() {
            let longest = unclaimed
                .iter()
                .max_by_key(|target| target.as_str().len())
                .expect("Set is non empty.")
                .clone();

            let (subject_uri, graph) = self.resolve_nearest_acl(&longest, &mut fetched).await?;

            let (claimed, rest) = unclaimed.into_iter().partition(|target| {
                longest.as_str().starts_with(target.as_str())
                    && target.as_str().len() >= subject_uri.as_str().len()
            });
            unclaimed = rest;

            effective_acls.push(EffectiveAcl {
                subject_uri,
                graph,
                targets: claimed,
            });
        }

        Ok(effective_acls)
    }

    /// Resolve the permission set granted by rules of given acl
    /// with given access object predicate.
    async fn resolve_rule_permissions(
        &self,
        acl_graph: &Arc<ST::Graph>,
        acl_subject_uri: &SolidResourceUri,
        direct: bool,
        credentials: &CredentialSet,
    ) -> ProbResult<PermissionSet> {
        // Own acl matches rules through `accessTo`, inherited
        // acl through `default`.
        let access_object_predicate = if direct {
            &ns::acl::accessTo
        } else {
            &ns::acl::default
        };
        let subject_term = uri_term(acl_subject_uri.as_str());

        // Gather applicable authorization rules.
        let rules = acl_graph
            .triples_matching(Any, [ns::rdf::type_], [ns::acl::Authorization])
            .filter_map(|t| {
                HAuthorization::try_new(t.unwrap_infallible().s().into_term::<ArcTerm>()).ok()
            })
            .map(|h_rule| DAuthorization::new(h_rule, acl_graph.clone()))
            .filter(|rule: &DAuthorization<ST::Graph, _>| {
                rule.has_any_with(access_object_predicate, &subject_term)
            })
            .collect::<Vec<_>>();

        let mut permission_set = PermissionSet::default();

        for group in CredentialGroup::ALL {
            // An absent credential gets no statement.
            let Some(credential) = credentials.get(group) else {
                continue;
            };

            let mut permission = Permission::default();
            for rule in &rules {
                let matched = self
                    .access_checker
                    .resolve_match(AccessCheckRequest {
                        acl: acl_graph.clone(),
                        rule: rule.handle().as_term().clone(),
                        credential: credential.clone(),
                    })
                    .await?;

                if matched {
                    for h_mode in rule.h_mode::<ArcTerm>() {
                        apply_mode_grant(&mut permission, h_mode.as_term());
                    }
                }
            }

            permission_set.set(group, permission);
        }

        Ok(permission_set)
    }

    /// Resolve permissions over all input targets.
    async fn resolve_permissions(&self, input: PermissionReaderInput) -> ProbResult<PermissionMap> {
        let targets = input.access_map.keys().cloned().collect::<Vec<_>>();
        let effective_acls = self.resolve_effective_acls(targets).await?;

        let mut permission_map = PermissionMap::with_capacity(input.access_map.len());

        for acl in effective_acls {
            let (direct, indirect): (Vec<_>, Vec<_>) = acl
                .targets
                .into_iter()
                .partition(|target| target == &acl.subject_uri);

            for (targets, is_direct) in [(direct, true), (indirect, false)] {
                if targets.is_empty() {
                    continue;
                }

                let permission_set = self
                    .resolve_rule_permissions(
                        &acl.graph,
                        &acl.subject_uri,
                        is_direct,
                        &input.credentials,
                    )
                    .await?;

                // Targets sharing the filtered rule set share
                // the resolved permissions.
                for target in targets {
                    permission_map.insert(target, permission_set);
                }
            }
        }

        Ok(permission_map)
    }
}

impl<ST, AC> PermissionReader for WacPermissionReader<ST, AC>
where
    ST: ResourceStore,
    AC: AccessChecker<ST::Graph>,
{
    #[tracing::instrument(skip_all, name = "WacPermissionReader::handle")]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        let this = self.clone();
        Box::pin(async move { this.resolve_permissions(input).await })
    }
}

/// Map from wac mode terms to the operational grants they
/// confer. `acl:Write` implies `append` too.
static WAC_MODE_GRANTS: Lazy<HashMap<ArcTerm, Vec<AccessMode>>> = Lazy::new(|| {
    [
        (ns::acl::Read.into_term(), vec![AccessMode::Read]),
        (
            ns::acl::Write.into_term(),
            vec![AccessMode::Append, AccessMode::Write],
        ),
        (ns::acl::Append.into_term(), vec![AccessMode::Append]),
        (ns::acl::Control.into_term(), vec![AccessMode::Control]),
    ]
    .into_iter()
    .collect()
});

/// Apply the operational grants of given `acl:mode` object term
/// to given permission. Modes unknown to wac contribute
/// nothing.
fn apply_mode_grant(permission: &mut Permission, mode_term: &ArcTerm) {
    if let Some(modes) = WAC_MODE_GRANTS.get(mode_term) {
        for mode in modes {
            permission.set(*mode, Verdict::Allow);
        }
    }
}

/// Get a problem for an unexpected acl retrieval failure.
fn acl_retrieval_problem(target: &SolidResourceUri, cause: Problem) -> Problem {
    ACL_RETRIEVAL_ERROR
        .new_problem_builder()
        .message(format!(
            "Error reading ACL for {}: {}",
            target.as_str(),
            cause
        ))
        .source(cause)
        .finish()
}
