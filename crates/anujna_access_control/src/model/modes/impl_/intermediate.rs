//! I define a modes extractor that adds `create` requirements
//! for nonexistent ancestor containers.
//!

use std::sync::Arc;

use anujna_space::strategy::identifier::IdentifierStrategy;
use dyn_problem::{type_::INTERNAL_ERROR, ProbFuture, ProbResult};

use crate::{
    model::{modes::ModesExtractor, operation::Operation, AccessMap, AccessMode},
    repo::ResourceSet,
};

/// A modes extractor that wraps a source extractor, and adds
/// `create` requirements for nonexistent ancestor containers of
/// `create` requiring targets.
///
/// For every target the source requires `create` on, ancestors
/// are walked up until an existing container is found. Every
/// nonexistent ancestor gets `create` merged into its required
/// modes. The target's other requirements are not copied onto
/// ancestors.
#[derive(Debug, Clone)]
pub struct IntermediateModesExtractor<M, RS> {
    /// Source extractor.
    source: Arc<M>,

    /// Resolver of resource existence.
    resource_set: Arc<RS>,

    /// Strategy resolving the containment hierarchy.
    identifier_strategy: Arc<dyn IdentifierStrategy>,
}

impl<M, RS> IntermediateModesExtractor<M, RS> {
    /// Create a new [`IntermediateModesExtractor`] with given
    /// source extractor, resource set, and identifier strategy.
    #[inline]
    pub fn new(
        source: Arc<M>,
        resource_set: Arc<RS>,
        identifier_strategy: Arc<dyn IdentifierStrategy>,
    ) -> Self {
        Self {
            source,
            resource_set,
            identifier_strategy,
        }
    }
}

impl<M, RS> ModesExtractor for IntermediateModesExtractor<M, RS>
where
    M: ModesExtractor,
    RS: ResourceSet,
{
    #[inline]
    fn can_handle(&self, operation: &Operation) -> ProbResult<()> {
        self.source.can_handle(operation)
    }

    #[tracing::instrument(skip_all, name = "IntermediateModesExtractor::extract")]
    fn extract(&self, operation: &Operation) -> ProbFuture<'static, AccessMap> {
        let source_fut = self.source.extract(operation);
        let resource_set = self.resource_set.clone();
        let identifier_strategy = self.identifier_strategy.clone();

        Box::pin(async move {
            let source_map = source_fut.await?;
            let mut access_map = source_map.clone();

            for (target, modes) in &source_map {
                if !modes.contains(&AccessMode::Create) {
                    continue;
                }

                let mut current = target.clone();
                loop {
                    if identifier_strategy.is_root_container(&current) {
                        break;
                    }

                    let parent = identifier_strategy
                        .get_parent_container(&current)
                        .map_err(|e| {
                            tracing::error!(
                                "Can not resolve parent container of {}.",
                                current.as_str()
                            );
                            INTERNAL_ERROR.new_problem_builder().source(e).finish()
                        })?;

                    if resource_set.has_resource(&parent).await? {
                        break;
                    }

                    access_map
                        .entry(parent.clone())
                        .or_default()
                        .insert(AccessMode::Create);
                    current = parent;
                }
            }

            Ok(access_map)
        })
    }
}
