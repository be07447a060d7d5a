//! I define an http handler that authorizes operations before
//! delegating them to a downstream operation handler.
//!

use std::{fmt::Debug, marker::PhantomData, sync::Arc};

use dyn_problem::ProbFuture;
use futures::TryFutureExt;
use tracing::{debug, error};
use typed_record::TypedRecord;

use crate::model::{
    authorizer::{Authorizer, AuthorizerInput},
    credentials::CredentialSet,
    modes::ModesExtractor,
    operation::Operation,
    reader::{PermissionReader, PermissionReaderInput},
    KResolvedPermissionMap,
};

/// A trait for extractors that resolve credentials from a
/// request.
///
/// Credential resolution from tokens and headers is a concern
/// of the authentication layer. This interface only carries its
/// outcome into the authorization pipeline.
pub trait CredentialsExtractor<R>: Debug + Send + Sync + 'static {
    /// Resolve credentials of given request.
    fn extract(&self, request: &R) -> ProbFuture<'static, CredentialSet>;
}

/// A trait for handlers of authorized operations.
pub trait OperationHandler<R>: Debug + Send + Sync + 'static {
    /// Type of handler responses.
    type Response: Send + 'static;

    /// Handle given authorized operation.
    fn handle(&self, request: R, operation: Operation) -> ProbFuture<'static, Self::Response>;
}

/// An http handler that authorizes operations before delegating
/// them to a downstream operation handler.
///
/// Per operation, it extracts credentials and required access
/// modes, resolves permissions through the configured
/// permission reader, and verifies them with the configured
/// authorizer. On success the resolved permission map is
/// recorded on the operation's extensions under
/// [`KResolvedPermissionMap`], and the operation is delegated.
/// Any failure short-circuits, and the downstream handler is
/// not invoked.
pub struct AuthorizingHttpHandler<R, CE, ME, PR, AZ, OH> {
    /// Credentials extractor.
    credentials_extractor: Arc<CE>,

    /// Modes extractor.
    modes_extractor: Arc<ME>,

    /// Permission reader.
    permission_reader: Arc<PR>,

    /// Authorizer.
    authorizer: Arc<AZ>,

    /// Downstream operation handler.
    operation_handler: Arc<OH>,

    _phantom: PhantomData<fn(R)>,
}

impl<R, CE, ME, PR, AZ, OH> Debug for AuthorizingHttpHandler<R, CE, ME, PR, AZ, OH> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizingHttpHandler").finish()
    }
}

impl<R, CE, ME, PR, AZ, OH> Clone for AuthorizingHttpHandler<R, CE, ME, PR, AZ, OH> {
    fn clone(&self) -> Self {
        Self {
            credentials_extractor: self.credentials_extractor.clone(),
            modes_extractor: self.modes_extractor.clone(),
            permission_reader: self.permission_reader.clone(),
            authorizer: self.authorizer.clone(),
            operation_handler: self.operation_handler.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<R, CE, ME, PR, AZ, OH> AuthorizingHttpHandler<R, CE, ME, PR, AZ, OH> {
    /// Create a new [`AuthorizingHttpHandler`] with given
    /// components.
    #[inline]
    pub fn new(
        credentials_extractor: Arc<CE>,
        modes_extractor: Arc<ME>,
        permission_reader: Arc<PR>,
        authorizer: Arc<AZ>,
        operation_handler: Arc<OH>,
    ) -> Self {
        Self {
            credentials_extractor,
            modes_extractor,
            permission_reader,
            authorizer,
            operation_handler,
            _phantom: PhantomData,
        }
    }
}

impl<R, CE, ME, PR, AZ, OH> AuthorizingHttpHandler<R, CE, ME, PR, AZ, OH>
where
    R: Send + Sync + 'static,
    CE: CredentialsExtractor<R>,
    ME: ModesExtractor,
    PR: PermissionReader,
    AZ: Authorizer,
    OH: OperationHandler<R>,
{
    /// Authorize given operation, and delegate it downstream on
    /// success.
    #[tracing::instrument(skip_all, name = "AuthorizingHttpHandler::handle", fields(target = operation.target.as_str()))]
    pub fn handle(
        &self,
        request: R,
        mut operation: Operation,
    ) -> ProbFuture<'static, OH::Response> {
        let credentials_fut = self.credentials_extractor.extract(&request);
        let modes_fut = self.modes_extractor.extract_safe(&operation);

        let permission_reader = self.permission_reader.clone();
        let authorizer = self.authorizer.clone();
        let operation_handler = self.operation_handler.clone();

        Box::pin(async move {
            let credentials = credentials_fut
                .inspect_err(|_| error!("Error in extracting request credentials."))
                .await?;
            debug!("Resolved request credentials.");

            let access_map = modes_fut
                .inspect_err(|_| error!("Error in extracting required access modes."))
                .await?;

            let permission_map = permission_reader
                .handle_safe(PermissionReaderInput {
                    credentials: credentials.clone(),
                    access_map: access_map.clone(),
                })
                .inspect_err(|_| error!("Error in reading permissions."))
                .await?;

            authorizer
                .authorize(AuthorizerInput {
                    credentials,
                    access_map,
                    permission_map: permission_map.clone(),
                })
                .await?;

            // Record resolved permissions for downstream
            // consumers, e.g. wac-allow metadata.
            operation
                .extensions
                .insert_rec_item::<KResolvedPermissionMap>(permission_map);

            operation_handler.handle(request, operation).await
        })
    }
}
