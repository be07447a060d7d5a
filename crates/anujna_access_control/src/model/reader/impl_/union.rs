//! I define a permission reader that merges verdicts resolved
//! by multiple readers.
//!

use dyn_problem::ProbFuture;
use futures::future;

use crate::model::{
    reader::{ArcPermissionReader, PermissionReader, PermissionReaderInput},
    PermissionMap,
};

/// A permission reader that invokes all its child readers with
/// the same input, and merges the resulting maps with the
/// verdict lattice, per (target, credential group, mode).
///
/// A single `Deny` among sources denies the mode. Otherwise any
/// `Allow` grants it. A failure of any child reader is
/// propagated as is.
#[derive(Debug, Clone)]
pub struct UnionPermissionReader {
    /// Child readers.
    readers: Vec<ArcPermissionReader>,
}

impl UnionPermissionReader {
    /// Create a new [`UnionPermissionReader`] with given child
    /// readers.
    #[inline]
    pub fn new(readers: Vec<ArcPermissionReader>) -> Self {
        Self { readers }
    }

    /// Merge given permission maps with the verdict lattice.
    fn merge(maps: impl IntoIterator<Item = PermissionMap>) -> PermissionMap {
        let mut merged = PermissionMap::new();
        for map in maps {
            for (target, permission_set) in map {
                let slot = merged.entry(target).or_default();
                *slot = slot.union(permission_set);
            }
        }
        merged
    }
}

impl PermissionReader for UnionPermissionReader {
    #[tracing::instrument(skip_all, name = "UnionPermissionReader::handle")]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        let result_futs = self
            .readers
            .iter()
            .map(|reader| reader.handle_safe(input.clone()))
            .collect::<Vec<_>>();

        Box::pin(async move {
            let results = future::try_join_all(result_futs).await?;
            Ok(Self::merge(results))
        })
    }
}
