//! I define a permission reader that derives `create` and
//! `delete` permissions from parent container permissions.
//!

use std::sync::Arc;

use anujna_space::{resource::uri::SolidResourceUri, strategy::identifier::IdentifierStrategy};
use dyn_problem::{type_::INTERNAL_ERROR, ProbFuture, ProbResult};

use crate::model::{
    credentials::CredentialGroup,
    reader::{PermissionReader, PermissionReaderInput},
    AccessMap, AccessMode, PermissionMap, Verdict,
};

/// A link from a target requiring `create`/`delete` to its
/// parent container.
#[derive(Debug, Clone)]
struct ParentLink {
    target: SolidResourceUri,
    parent: SolidResourceUri,
    requires_create: bool,
    requires_delete: bool,
}

/// A permission reader that resolves `create` and `delete`
/// permissions over a resource from permissions over its parent
/// container, as required by the wac specification.
///
/// For every input target requiring `create`, an `append`
/// requirement is merged onto its parent container; for every
/// target requiring `delete`, a `write` requirement. Target
/// entries always remain in the forwarded map. After the inner
/// resolution, per credential group present in the parent's
/// result:
///
/// - `create` resolves to the parent's `append` verdict, unless
///   the target's own `create` is an explicit `Deny`.
/// - `delete` resolves to the conjunction of the target's
///   `write` and the parent's `write` verdicts, unless the
///   target's own `delete` is an explicit `Deny`.
///
/// Parent entries introduced only for derivation are stripped
/// from the output. Targets requiring neither mode pass through
/// unchanged.
#[derive(Debug, Clone)]
pub struct ParentContainerReader<R> {
    /// Inner reader.
    reader: Arc<R>,

    /// Strategy that resolves the containment hierarchy.
    identifier_strategy: Arc<dyn IdentifierStrategy>,
}

impl<R> ParentContainerReader<R> {
    /// Create a new [`ParentContainerReader`] with given inner
    /// reader and identifier strategy.
    #[inline]
    pub fn new(reader: Arc<R>, identifier_strategy: Arc<dyn IdentifierStrategy>) -> Self {
        Self {
            reader,
            identifier_strategy,
        }
    }
}

impl<R: PermissionReader> ParentContainerReader<R> {
    /// Resolve parent links for given access map.
    fn resolve_parent_links(&self, access_map: &AccessMap) -> ProbResult<Vec<ParentLink>> {
        access_map
            .iter()
            .filter_map(|(target, modes)| {
                let requires_create = modes.contains(&AccessMode::Create);
                let requires_delete = modes.contains(&AccessMode::Delete);
                (requires_create || requires_delete).then(|| {
                    let parent = self
                        .identifier_strategy
                        .get_parent_container(target)
                        .map_err(|e| {
                            tracing::error!(
                                "Can not resolve parent container of target {}.",
                                target.as_str()
                            );
                            INTERNAL_ERROR.new_problem_builder().source(e).finish()
                        })?;
                    Ok(ParentLink {
                        target: target.clone(),
                        parent,
                        requires_create,
                        requires_delete,
                    })
                })
            })
            .collect()
    }
}

impl<R: PermissionReader> PermissionReader for ParentContainerReader<R> {
    #[inline]
    fn can_handle(&self, input: &PermissionReaderInput) -> ProbResult<()> {
        self.reader.can_handle(input)
    }

    #[tracing::instrument(skip_all, name = "ParentContainerReader::handle")]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        let parent_links = match self.resolve_parent_links(&input.access_map) {
            Ok(links) => links,
            Err(e) => return Box::pin(futures::future::ready(Err(e))),
        };

        if parent_links.is_empty() {
            return self.reader.handle(input);
        }

        let mut forwarded_map = input.access_map.clone();
        for link in &parent_links {
            let parent_modes = forwarded_map.entry(link.parent.clone()).or_default();
            if link.requires_create {
                parent_modes.insert(AccessMode::Append);
            }
            if link.requires_delete {
                parent_modes.insert(AccessMode::Write);
            }
        }

        let input_targets = input.access_map.keys().cloned().collect::<Vec<_>>();
        let result_fut = self.reader.handle(PermissionReaderInput {
            credentials: input.credentials,
            access_map: forwarded_map,
        });

        Box::pin(async move {
            let mut permission_map = result_fut.await?;

            for link in &parent_links {
                let parent_set = permission_map.get(&link.parent).copied().unwrap_or_default();
                let target_entry = permission_map.entry(link.target.clone()).or_default();

                for (group, parent_permission) in parent_set.iter() {
                    let mut target_permission = target_entry.get_or_unstated(group);

                    if link.requires_create && !target_permission.create.is_deny() {
                        target_permission.create = parent_permission.append;
                    }
                    if link.requires_delete && !target_permission.delete.is_deny() {
                        target_permission.delete =
                            target_permission.write.and(parent_permission.write);
                    }

                    target_entry.set(group, target_permission);
                }
            }

            // Parent entries introduced only for derivation get
            // no verdict.
            permission_map.retain(|target, _| input_targets.contains(target));

            Ok(permission_map)
        })
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_ok, assert_some};
    use futures::future;
    use rstest::rstest;

    use super::*;
    use crate::model::{
        credentials::{CredentialGroup, CredentialSet},
        AccessModeSet, Permission, PermissionSet,
    };
    use anujna_space::strategy::identifier::impl_::single_root::SingleRootIdentifierStrategy;

    fn uri(uri_str: &str) -> SolidResourceUri {
        assert_ok!(
            SolidResourceUri::try_new_from(uri_str),
            "Claimed valid uri str"
        )
    }

    /// A reader that resolves fixed permissions per target for
    /// the public group.
    #[derive(Debug)]
    struct FixedReader(PermissionMap);

    impl PermissionReader for FixedReader {
        fn handle(&self, _input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
            Box::pin(future::ready(Ok(self.0.clone())))
        }
    }

    fn identifier_strategy() -> Arc<dyn IdentifierStrategy> {
        Arc::new(assert_ok!(SingleRootIdentifierStrategy::try_new(uri(
            "http://ex.org/"
        ))))
    }

    fn public_set(permission: Permission) -> PermissionSet {
        let mut permission_set = PermissionSet::default();
        permission_set.set(CredentialGroup::Public, permission);
        permission_set
    }

    #[tokio::test]
    async fn create_and_delete_are_derived_from_parent() {
        // Parent grants write and append; target grants write.
        let inner = Arc::new(FixedReader(
            [
                (
                    uri("http://ex.org/"),
                    public_set(Permission::with_all(
                        [AccessMode::Write, AccessMode::Append],
                        Verdict::Allow,
                    )),
                ),
                (
                    uri("http://ex.org/foo"),
                    public_set(Permission::with_all([AccessMode::Write], Verdict::Allow)),
                ),
            ]
            .into_iter()
            .collect(),
        ));
        let reader = ParentContainerReader::new(inner, identifier_strategy());

        let permission_map = assert_ok!(
            reader
                .handle_safe(PermissionReaderInput {
                    credentials: CredentialSet::public_only(),
                    access_map: [(
                        uri("http://ex.org/foo"),
                        AccessModeSet::from([AccessMode::Create, AccessMode::Delete]),
                    )]
                    .into_iter()
                    .collect(),
                })
                .await
        );

        let permission = assert_some!(
            assert_some!(permission_map.get(&uri("http://ex.org/foo")))
                .get(CredentialGroup::Public)
        );
        assert_eq!(permission.write, Verdict::Allow);
        assert_eq!(permission.create, Verdict::Allow);
        assert_eq!(permission.delete, Verdict::Allow);

        // The derivation only parent entry is stripped.
        assert!(!permission_map.contains_key(&uri("http://ex.org/")));
    }

    #[rstest]
    // create requires parent append.
    #[case(
        AccessMode::Create,
        Permission::default(),
        Permission::with_all([AccessMode::Write], Verdict::Allow),
        Verdict::Unstated
    )]
    // Parent append grants create.
    #[case(
        AccessMode::Create,
        Permission::default(),
        Permission::with_all([AccessMode::Append], Verdict::Allow),
        Verdict::Allow
    )]
    // Explicit deny on target create absorbs.
    #[case(
        AccessMode::Create,
        Permission::with_all([AccessMode::Create], Verdict::Deny),
        Permission::with_all([AccessMode::Append], Verdict::Allow),
        Verdict::Deny
    )]
    // delete requires target write too.
    #[case(
        AccessMode::Delete,
        Permission::default(),
        Permission::with_all([AccessMode::Write], Verdict::Allow),
        Verdict::Unstated
    )]
    // Explicit deny on target delete absorbs.
    #[case(
        AccessMode::Delete,
        Permission {
            write: Verdict::Allow,
            delete: Verdict::Deny,
            ..Permission::default()
        },
        Permission::with_all([AccessMode::Write], Verdict::Allow),
        Verdict::Deny
    )]
    #[tokio::test]
    async fn derivation_honors_the_truth_table(
        #[case] required_mode: AccessMode,
        #[case] target_permission: Permission,
        #[case] parent_permission: Permission,
        #[case] expected_verdict: Verdict,
    ) {
        let inner = Arc::new(FixedReader(
            [
                (uri("http://ex.org/"), public_set(parent_permission)),
                (uri("http://ex.org/foo"), public_set(target_permission)),
            ]
            .into_iter()
            .collect(),
        ));
        let reader = ParentContainerReader::new(inner, identifier_strategy());

        let permission_map = assert_ok!(
            reader
                .handle_safe(PermissionReaderInput {
                    credentials: CredentialSet::public_only(),
                    access_map: [(
                        uri("http://ex.org/foo"),
                        AccessModeSet::from([required_mode]),
                    )]
                    .into_iter()
                    .collect(),
                })
                .await
        );

        let permission = assert_some!(
            assert_some!(permission_map.get(&uri("http://ex.org/foo")))
                .get(CredentialGroup::Public)
        );
        assert_eq!(permission.get(required_mode), expected_verdict);
    }

    #[tokio::test]
    async fn targets_without_create_or_delete_pass_through() {
        let source_map: PermissionMap = [(
            uri("http://ex.org/foo"),
            public_set(Permission::with_all([AccessMode::Read], Verdict::Allow)),
        )]
        .into_iter()
        .collect();

        let reader = ParentContainerReader::new(
            Arc::new(FixedReader(source_map.clone())),
            identifier_strategy(),
        );

        let permission_map = assert_ok!(
            reader
                .handle_safe(PermissionReaderInput {
                    credentials: CredentialSet::public_only(),
                    access_map: [(
                        uri("http://ex.org/foo"),
                        AccessModeSet::from([AccessMode::Read]),
                    )]
                    .into_iter()
                    .collect(),
                })
                .await
        );

        assert_eq!(permission_map, source_map);
    }
}
