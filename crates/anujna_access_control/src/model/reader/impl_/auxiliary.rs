//! I define a permission reader that forwards auxiliary
//! resource targets to their subject resources.
//!

use std::sync::Arc;

use anujna_space::{resource::uri::SolidResourceUri, strategy::auxiliary::AuxiliaryStrategy};
use dyn_problem::{type_::INTERNAL_ERROR, ProbFuture, ProbResult};

use crate::model::{
    reader::{PermissionReader, PermissionReaderInput},
    AccessMap, PermissionMap,
};

/// A permission reader that resolves permissions over auxiliary
/// resources from those over their subject resources.
///
/// Every input target that is an auxiliary resource not using
/// its own authorization is replaced by its subject resource in
/// the forwarded access map, with mode sets merged. After the
/// inner resolution, the auxiliary target receives the
/// permission set resolved for its subject, or the empty set if
/// the subject is absent from the inner result. The forwarded
/// subject entries remain in the output.
///
/// Inputs with no such auxiliary targets pass through to the
/// inner reader untouched.
#[derive(Debug, Clone)]
pub struct AuxiliaryReader<R> {
    /// Inner reader.
    reader: Arc<R>,

    /// Strategy that links auxiliary resources to their
    /// subjects.
    aux_strategy: Arc<dyn AuxiliaryStrategy>,
}

impl<R> AuxiliaryReader<R> {
    /// Create a new [`AuxiliaryReader`] with given inner reader
    /// and auxiliary strategy.
    #[inline]
    pub fn new(reader: Arc<R>, aux_strategy: Arc<dyn AuxiliaryStrategy>) -> Self {
        Self {
            reader,
            aux_strategy,
        }
    }
}

impl<R: PermissionReader> AuxiliaryReader<R> {
    /// Resolve forwarded (auxiliary, subject) uri pairs for
    /// given access map.
    fn resolve_forwardings(
        &self,
        access_map: &AccessMap,
    ) -> ProbResult<Vec<(SolidResourceUri, SolidResourceUri)>> {
        access_map
            .keys()
            .filter(|target| {
                self.aux_strategy.is_auxiliary_identifier(target)
                    && !self.aux_strategy.uses_own_authorization(target)
            })
            .map(|target| {
                let subject = self.aux_strategy.get_subject_identifier(target).map_err(
                    |e| {
                        tracing::error!(
                            "Auxiliary strategy can not resolve subject of claimed auxiliary uri {}.",
                            target.as_str()
                        );
                        INTERNAL_ERROR.new_problem_builder().source(e).finish()
                    },
                )?;
                Ok((target.clone(), subject))
            })
            .collect()
    }
}

impl<R: PermissionReader> PermissionReader for AuxiliaryReader<R> {
    #[inline]
    fn can_handle(&self, input: &PermissionReaderInput) -> ProbResult<()> {
        self.reader.can_handle(input)
    }

    #[tracing::instrument(skip_all, name = "AuxiliaryReader::handle")]
    fn handle(&self, input: PermissionReaderInput) -> ProbFuture<'static, PermissionMap> {
        let forwardings = match self.resolve_forwardings(&input.access_map) {
            Ok(forwardings) => forwardings,
            Err(e) => return Box::pin(futures::future::ready(Err(e))),
        };

        if forwardings.is_empty() {
            return self.reader.handle(input);
        }

        let mut forwarded_map = AccessMap::with_capacity(input.access_map.len());
        for (target, modes) in &input.access_map {
            let slot = forwardings
                .iter()
                .find(|(aux, _)| aux == target)
                .map(|(_, subject)| subject)
                .unwrap_or(target);
            forwarded_map
                .entry(slot.clone())
                .or_default()
                .extend(modes.iter().copied());
        }

        let result_fut = self.reader.handle(PermissionReaderInput {
            credentials: input.credentials,
            access_map: forwarded_map,
        });

        Box::pin(async move {
            let mut permission_map = result_fut.await?;

            for (aux, subject) in forwardings {
                let permission_set = permission_map.get(&subject).copied().unwrap_or_default();
                permission_map.insert(aux, permission_set);
            }

            Ok(permission_map)
        })
    }
}
