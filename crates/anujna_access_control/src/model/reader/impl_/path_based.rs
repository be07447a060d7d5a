//! I define a permission reader that dispatches targets to
//! readers by their uri paths.
//!

use anujna_space::resource::uri::SolidResourceUri;
use dyn_problem::ProbFuture;
use futures::future;
use regex::Regex;

use crate::model::{
    reader::{ArcPermissionReader, PermissionReader, PermissionReaderInput},
    AccessMap, PermissionMap,
};

/// A permission reader that partitions input targets over child
/// readers by matching their base relative paths against
/// regular expressions, in insertion order.
///
/// The first matching expression claims a target. Targets
/// matching no expression, or outside the base uri namespace,
/// get no verdict.
#[derive(Debug, Clone)]
pub struct PathBasedReader {
    /// Base uri of the dispatched namespace.
    base_uri: SolidResourceUri,

    /// Path expressions, with their assigned readers.
    paths: Vec<(Regex, ArcPermissionReader)>,
}

impl PathBasedReader {
    /// Create a new [`PathBasedReader`] with given base uri,
    /// and path expression assignments.
    ///
    /// Expressions are matched against the base relative path
    /// of targets, with the leading slash preserved.
    #[inline]
    pub fn new(base_uri: SolidResourceUri, paths: Vec<(Regex, ArcPermissionReader)>) -> Self {
        Self { base_uri, paths }
    }

    /// Get the base relative path of given target uri, with
    /// leading slash preserved.
    fn relative_path<'t>(&self, target: &'t SolidResourceUri) -> Option<&'t str> {
        let base_str = self.base_uri.as_str();
        let trimmed_base = base_str.strip_suffix('/').unwrap_or(base_str);

        target
            .as_str()
            .strip_prefix(trimmed_base)
            .filter(|path| path.starts_with('/'))
    }
}

impl PermissionReader for PathBasedReader {
    #[tracing::instrument(skip_all, name = "PathBasedReader::handle")]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        let mut partitions: Vec<AccessMap> = vec![AccessMap::new(); self.paths.len()];

        for (target, modes) in &input.access_map {
            let Some(path) = self.relative_path(target) else {
                tracing::debug!("Target out of dispatch namespace. Uri: {}", target.as_str());
                continue;
            };

            if let Some(slot) = self
                .paths
                .iter()
                .position(|(path_expr, _)| path_expr.is_match(path))
            {
                partitions[slot].insert(target.clone(), modes.clone());
            }
        }

        let result_futs = self
            .paths
            .iter()
            .zip(partitions)
            .filter(|(_, partition)| !partition.is_empty())
            .map(|((_, reader), partition)| {
                reader.handle_safe(PermissionReaderInput {
                    credentials: input.credentials.clone(),
                    access_map: partition,
                })
            })
            .collect::<Vec<_>>();

        Box::pin(async move {
            let results = future::try_join_all(result_futs).await?;

            // Partitions are disjoint by construction.
            let mut permission_map = PermissionMap::new();
            for result in results {
                permission_map.extend(result);
            }
            Ok(permission_map)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use claims::{assert_ok, assert_some};

    use super::*;
    use crate::model::{
        credentials::{CredentialGroup, CredentialSet},
        AccessMode, AccessModeSet, Permission, PermissionSet, Verdict,
    };

    fn uri(uri_str: &str) -> SolidResourceUri {
        assert_ok!(
            SolidResourceUri::try_new_from(uri_str),
            "Claimed valid uri str"
        )
    }

    /// A reader that grants given mode on every input target for
    /// the public group.
    #[derive(Debug)]
    struct GrantingReader(AccessMode);

    impl PermissionReader for GrantingReader {
        fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
            let mut permission_set = PermissionSet::default();
            permission_set.set(
                CredentialGroup::Public,
                Permission::with_all([self.0], Verdict::Allow),
            );

            let permission_map = input
                .access_map
                .keys()
                .map(|target| (target.clone(), permission_set))
                .collect();
            Box::pin(future::ready(Ok(permission_map)))
        }
    }

    fn path_expr(pattern: &str) -> Regex {
        assert_ok!(Regex::new(pattern), "Claimed valid path expression")
    }

    #[tokio::test]
    async fn partitions_targets_by_first_matching_expression() {
        let reader = PathBasedReader::new(
            uri("http://ex.org/"),
            vec![
                (
                    path_expr("^/docs/"),
                    Arc::new(GrantingReader(AccessMode::Read)) as ArcPermissionReader,
                ),
                (
                    path_expr("^/inbox/"),
                    Arc::new(GrantingReader(AccessMode::Append)),
                ),
            ],
        );

        let access_map: AccessMap = [
            (
                uri("http://ex.org/docs/readme"),
                AccessModeSet::from([AccessMode::Read]),
            ),
            (
                uri("http://ex.org/inbox/item"),
                AccessModeSet::from([AccessMode::Append]),
            ),
            (
                uri("http://ex.org/other"),
                AccessModeSet::from([AccessMode::Read]),
            ),
            (
                uri("http://other.org/docs/readme"),
                AccessModeSet::from([AccessMode::Read]),
            ),
        ]
        .into_iter()
        .collect();

        let permission_map = assert_ok!(
            reader
                .handle_safe(PermissionReaderInput {
                    credentials: CredentialSet::public_only(),
                    access_map,
                })
                .await
        );

        // Unmatched and out of namespace targets get no verdict.
        assert_eq!(permission_map.len(), 2);

        let docs_set = assert_some!(permission_map.get(&uri("http://ex.org/docs/readme")));
        assert_eq!(
            assert_some!(docs_set.get(CredentialGroup::Public)).read,
            Verdict::Allow
        );

        let inbox_set = assert_some!(permission_map.get(&uri("http://ex.org/inbox/item")));
        assert_eq!(
            assert_some!(inbox_set.get(CredentialGroup::Public)).append,
            Verdict::Allow
        );
    }

    #[tokio::test]
    async fn earlier_expressions_win() {
        let reader = PathBasedReader::new(
            uri("http://ex.org/"),
            vec![
                (
                    path_expr("^/docs/"),
                    Arc::new(GrantingReader(AccessMode::Read)) as ArcPermissionReader,
                ),
                (
                    path_expr("^/docs/inner/"),
                    Arc::new(GrantingReader(AccessMode::Write)),
                ),
            ],
        );

        let permission_map = assert_ok!(
            reader
                .handle_safe(PermissionReaderInput {
                    credentials: CredentialSet::public_only(),
                    access_map: [(
                        uri("http://ex.org/docs/inner/a"),
                        AccessModeSet::from([AccessMode::Read]),
                    )]
                    .into_iter()
                    .collect(),
                })
                .await
        );

        let permission = assert_some!(
            assert_some!(permission_map.get(&uri("http://ex.org/docs/inner/a")))
                .get(CredentialGroup::Public)
        );
        assert_eq!(permission.read, Verdict::Allow);
        assert_eq!(permission.write, Verdict::Unstated);
    }
}
