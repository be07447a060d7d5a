//! I define a permission reader that resolves constant
//! verdicts.
//!

use dyn_problem::ProbFuture;
use futures::future;

use crate::model::{
    reader::{PermissionReader, PermissionReaderInput},
    AccessMode, Permission, PermissionMap, PermissionSet, Verdict,
};

/// A permission reader that resolves a constant verdict over
/// all operational access modes, for every credential group
/// present in request credentials.
///
/// Intended for fixed paths whose policies never change, e.g.
/// public api documents.
#[derive(Debug, Clone)]
pub struct AllStaticReader {
    /// Verdict this reader resolves for every mode.
    verdict: Verdict,
}

impl AllStaticReader {
    /// Create a new [`AllStaticReader`] resolving given allow
    /// flag.
    #[inline]
    pub fn new(allow: bool) -> Self {
        Self {
            verdict: allow.into(),
        }
    }
}

impl PermissionReader for AllStaticReader {
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        // Permission value is shared across all entries, while
        // each target gets its own permission set.
        let permission = Permission::with_all(AccessMode::OPERATIONAL, self.verdict);

        let mut permission_map = PermissionMap::with_capacity(input.access_map.len());
        for target in input.access_map.keys() {
            let mut permission_set = PermissionSet::default();
            for group in input.credentials.groups() {
                permission_set.set(group, permission);
            }
            permission_map.insert(target.clone(), permission_set);
        }

        Box::pin(future::ready(Ok(permission_map)))
    }
}
