//! I define an authorizer that verifies required modes against
//! resolved permissions.
//!

use anujna_space::resource::uri::SolidResourceUri;
use dyn_problem::ProbFuture;
use futures::future;
use itertools::Itertools;
use tracing::{debug, info};
use vec1::Vec1;

use crate::model::{
    authorizer::{Authorizer, AuthorizerInput, ACCESS_DENIED},
    credentials::CredentialGroup,
    AccessMode, PermissionSet,
};

/// An authorizer that grants a required mode when at least one
/// credential group holds an `Allow` verdict over it, and no
/// group holds an explicit `Deny`.
#[derive(Debug, Clone, Default)]
pub struct PermissionBasedAuthorizer;

impl PermissionBasedAuthorizer {
    /// Check if given mode is granted by given permission set.
    fn is_granted(permission_set: &PermissionSet, mode: AccessMode) -> bool {
        let verdicts = CredentialGroup::ALL
            .map(|group| permission_set.get_or_unstated(group).get(mode));

        verdicts.iter().any(|verdict| verdict.is_allow())
            && !verdicts.iter().any(|verdict| verdict.is_deny())
    }

    /// Resolve the denied (target, mode) requirements of given
    /// input.
    fn resolve_denials(input: &AuthorizerInput) -> Vec<(SolidResourceUri, AccessMode)> {
        let mut denials = Vec::new();

        for (target, modes) in &input.access_map {
            let permission_set = input
                .permission_map
                .get(target)
                .copied()
                .unwrap_or_default();

            // Modes are sorted for deterministic reporting.
            for mode in modes
                .iter()
                .sorted_by_key(|mode| mode.label())
            {
                if !Self::is_granted(&permission_set, *mode) {
                    denials.push((target.clone(), *mode));
                }
            }
        }

        denials
    }
}

impl Authorizer for PermissionBasedAuthorizer {
    #[tracing::instrument(skip_all, name = "PermissionBasedAuthorizer::authorize")]
    fn authorize(&self, input: AuthorizerInput) -> ProbFuture<'static, ()> {
        let result = match Vec1::try_from_vec(Self::resolve_denials(&input)) {
            Err(_) => {
                debug!("All required modes are granted.");
                Ok(())
            }
            Ok(denials) => {
                info!("Required modes are denied. Denial count: {}", denials.len());
                Err(ACCESS_DENIED
                    .new_problem_builder()
                    .message(format!(
                        "Access denied for: {}.",
                        denials
                            .iter()
                            .map(|(target, mode)| format!("{} on {}", mode, target.as_str()))
                            .join(", ")
                    ))
                    .finish())
            }
        };

        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_err, assert_ok};

    use super::*;
    use crate::model::{
        credentials::CredentialSet, AccessMap, AccessModeSet, Permission, PermissionMap, Verdict,
    };

    fn uri(uri_str: &str) -> SolidResourceUri {
        assert_ok!(
            SolidResourceUri::try_new_from(uri_str),
            "Claimed valid uri str"
        )
    }

    fn input(
        required_modes: &[AccessMode],
        public_permission: Option<Permission>,
        agent_permission: Option<Permission>,
    ) -> AuthorizerInput {
        let access_map: AccessMap = [(
            uri("http://ex.org/foo"),
            required_modes.iter().copied().collect::<AccessModeSet>(),
        )]
        .into_iter()
        .collect();

        let permission_map: PermissionMap = [(
            uri("http://ex.org/foo"),
            PermissionSet {
                public: public_permission,
                agent: agent_permission,
            },
        )]
        .into_iter()
        .collect();

        AuthorizerInput {
            credentials: CredentialSet::public_only(),
            access_map,
            permission_map,
        }
    }

    #[tokio::test]
    async fn granted_requirements_authorize() {
        assert_ok!(
            PermissionBasedAuthorizer
                .authorize(input(
                    &[AccessMode::Read],
                    Some(Permission::with_all([AccessMode::Read], Verdict::Allow)),
                    None,
                ))
                .await
        );
    }

    #[tokio::test]
    async fn any_group_grant_suffices() {
        assert_ok!(
            PermissionBasedAuthorizer
                .authorize(input(
                    &[AccessMode::Write],
                    Some(Permission::default()),
                    Some(Permission::with_all([AccessMode::Write], Verdict::Allow)),
                ))
                .await
        );
    }

    #[tokio::test]
    async fn unstated_requirements_are_denied() {
        let error = assert_err!(
            PermissionBasedAuthorizer
                .authorize(input(&[AccessMode::Read], Some(Permission::default()), None))
                .await
        );
        assert!(ACCESS_DENIED.is_type_of(&error));
    }

    #[tokio::test]
    async fn explicit_deny_absorbs_grants() {
        let error = assert_err!(
            PermissionBasedAuthorizer
                .authorize(input(
                    &[AccessMode::Read],
                    Some(Permission::with_all([AccessMode::Read], Verdict::Allow)),
                    Some(Permission::with_all([AccessMode::Read], Verdict::Deny)),
                ))
                .await
        );
        assert!(ACCESS_DENIED.is_type_of(&error));
    }

    #[tokio::test]
    async fn missing_targets_read_as_no_permission() {
        let mut no_verdict_input = input(&[AccessMode::Read], None, None);
        no_verdict_input.permission_map = PermissionMap::new();

        let error = assert_err!(
            PermissionBasedAuthorizer.authorize(no_verdict_input).await
        );
        assert!(ACCESS_DENIED.is_type_of(&error));
    }

    #[tokio::test]
    async fn empty_requirements_authorize() {
        assert_ok!(
            PermissionBasedAuthorizer
                .authorize(input(&[], None, None))
                .await
        );
    }
}
