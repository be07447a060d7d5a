//! I define a permission reader that derives permissions over
//! acl resources from `control` permission over their subject
//! resources.
//!

use std::sync::Arc;

use anujna_space::{
    resource::uri::SolidResourceUri, strategy::auxiliary::AuxiliaryIdentifierStrategy,
};
use dyn_problem::{type_::INTERNAL_ERROR, ProbFuture, ProbResult};

use crate::model::{
    reader::{PermissionReader, PermissionReaderInput},
    AccessMap, AccessMode, Permission, PermissionMap, PermissionSet,
};

/// A permission reader that resolves permissions over acl
/// resources from the `control` permission over their subject
/// resources, as required by the wac specification.
///
/// Every input target that is an acl resource is replaced by
/// its subject resource carrying the single required mode
/// `control`, merged with any modes already required on the
/// subject. After the inner resolution, the acl target
/// receives, per credential group present in the subject's
/// result, `read`/`append`/`write`/`control` all equal to the
/// subject's `control` verdict. An absent subject resolves the
/// acl target to the empty set.
///
/// Inputs with no acl targets pass through to the inner reader
/// untouched.
#[derive(Debug, Clone)]
pub struct WacAuxiliaryReader<R> {
    /// Inner reader.
    reader: Arc<R>,

    /// Strategy that links acl resources to their subjects.
    acl_strategy: Arc<dyn AuxiliaryIdentifierStrategy>,
}

impl<R> WacAuxiliaryReader<R> {
    /// Create a new [`WacAuxiliaryReader`] with given inner
    /// reader and acl identifier strategy.
    #[inline]
    pub fn new(reader: Arc<R>, acl_strategy: Arc<dyn AuxiliaryIdentifierStrategy>) -> Self {
        Self {
            reader,
            acl_strategy,
        }
    }

    /// Derive the acl resource permission set from its
    /// subject's resolved set.
    fn derive_acl_permission_set(subject_set: &PermissionSet) -> PermissionSet {
        let mut acl_set = PermissionSet::default();
        for (group, subject_permission) in subject_set.iter() {
            let control = subject_permission.control;
            acl_set.set(
                group,
                Permission::with_all(
                    [
                        AccessMode::Read,
                        AccessMode::Append,
                        AccessMode::Write,
                        AccessMode::Control,
                    ],
                    control,
                ),
            );
        }
        acl_set
    }
}

impl<R: PermissionReader> WacAuxiliaryReader<R> {
    /// Resolve forwarded (acl, subject) uri pairs for given
    /// access map.
    fn resolve_forwardings(
        &self,
        access_map: &AccessMap,
    ) -> ProbResult<Vec<(SolidResourceUri, SolidResourceUri)>> {
        access_map
            .keys()
            .filter(|target| self.acl_strategy.is_auxiliary_identifier(target))
            .map(|target| {
                let subject = self.acl_strategy.get_subject_identifier(target).map_err(|e| {
                    tracing::error!(
                        "Acl strategy can not resolve subject of claimed acl uri {}.",
                        target.as_str()
                    );
                    INTERNAL_ERROR.new_problem_builder().source(e).finish()
                })?;
                Ok((target.clone(), subject))
            })
            .collect()
    }
}

impl<R: PermissionReader> PermissionReader for WacAuxiliaryReader<R> {
    #[inline]
    fn can_handle(&self, input: &PermissionReaderInput) -> ProbResult<()> {
        self.reader.can_handle(input)
    }

    #[tracing::instrument(skip_all, name = "WacAuxiliaryReader::handle")]
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
            match forwardings.iter().find(|(acl, _)| acl == target) {
                // Acl target forwards as `control` requirement
                // on its subject. Its own modes are dropped.
                Some((_, subject)) => {
                    forwarded_map
                        .entry(subject.clone())
                        .or_default()
                        .insert(AccessMode::Control);
                }
                None => {
                    forwarded_map
                        .entry(target.clone())
                        .or_default()
                        .extend(modes.iter().copied());
                }
            }
        }

        let result_fut = self.reader.handle(PermissionReaderInput {
            credentials: input.credentials,
            access_map: forwarded_map,
        });

        Box::pin(async move {
            let mut permission_map = result_fut.await?;

            for (acl, subject) in forwardings {
                let acl_set = permission_map
                    .get(&subject)
                    .map(Self::derive_acl_permission_set)
                    .unwrap_or_default();
                permission_map.insert(acl, acl_set);
            }

            Ok(permission_map)
        })
    }
}
