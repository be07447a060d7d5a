//! I define a modes extractor that resolves required modes
//! from the operation's http method.
//!

use std::sync::Arc;

use dyn_problem::{ProbFuture, ProbResult};

use crate::{
    model::{
        modes::{ModesExtractor, UNSUPPORTED_OPERATION_METHOD},
        operation::Operation,
        AccessMap, AccessMode, AccessModeSet,
    },
    repo::ResourceSet,
};

/// A modes extractor that resolves required modes from the
/// operation's http method.
///
/// `GET`/`HEAD` require `read`; `POST` requires `append`;
/// `PUT` requires `write`, plus `create` when the target does
/// not exist; `DELETE` requires `delete`; `PATCH` requires
/// `read` and `write`. Other methods are declined.
#[derive(Debug, Clone)]
pub struct MethodModesExtractor<RS> {
    /// Resolver of resource existence.
    resource_set: Arc<RS>,
}

impl<RS> MethodModesExtractor<RS> {
    /// Create a new [`MethodModesExtractor`] with given
    /// resource set.
    #[inline]
    pub fn new(resource_set: Arc<RS>) -> Self {
        Self { resource_set }
    }
}

impl<RS: ResourceSet> ModesExtractor for MethodModesExtractor<RS> {
    fn can_handle(&self, operation: &Operation) -> ProbResult<()> {
        match operation.method.as_str() {
            "GET" | "HEAD" | "POST" | "PUT" | "DELETE" | "PATCH" => Ok(()),
            _ => Err(UNSUPPORTED_OPERATION_METHOD
                .new_problem_builder()
                .message(format!("Unsupported method: {}", operation.method))
                .finish()),
        }
    }

    fn extract(&self, operation: &Operation) -> ProbFuture<'static, AccessMap> {
        let method = operation.method.clone();
        let target = operation.target.clone();
        let resource_set = self.resource_set.clone();

        Box::pin(async move {
            let mut modes = AccessModeSet::new();

            match method.as_str() {
                "GET" | "HEAD" => {
                    modes.insert(AccessMode::Read);
                }
                "POST" => {
                    modes.insert(AccessMode::Append);
                }
                "PUT" => {
                    modes.insert(AccessMode::Write);
                    if !resource_set.has_resource(&target).await? {
                        modes.insert(AccessMode::Create);
                    }
                }
                "DELETE" => {
                    modes.insert(AccessMode::Delete);
                }
                "PATCH" => {
                    modes.insert(AccessMode::Read);
                    modes.insert(AccessMode::Write);
                }
                _ => {
                    return Err(UNSUPPORTED_OPERATION_METHOD
                        .new_problem_builder()
                        .message(format!("Unsupported method: {}", method))
                        .finish());
                }
            }

            Ok([(target, modes)].into_iter().collect::<AccessMap>())
        })
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_err, assert_ok, assert_some};
    use futures::future;
    use http::Method;
    use rstest::rstest;

    use super::*;
    use anujna_space::resource::uri::SolidResourceUri;

    fn uri(uri_str: &str) -> SolidResourceUri {
        assert_ok!(
            SolidResourceUri::try_new_from(uri_str),
            "Claimed valid uri str"
        )
    }

    /// A resource set resolving fixed existence.
    #[derive(Debug)]
    struct FixedResourceSet(bool);

    impl ResourceSet for FixedResourceSet {
        fn has_resource(&self, _uri: &SolidResourceUri) -> ProbFuture<'static, bool> {
            Box::pin(future::ready(Ok(self.0)))
        }
    }

    fn extractor(target_exists: bool) -> MethodModesExtractor<FixedResourceSet> {
        MethodModesExtractor::new(Arc::new(FixedResourceSet(target_exists)))
    }

    #[rstest]
    #[case(Method::GET, true, &[AccessMode::Read])]
    #[case(Method::HEAD, true, &[AccessMode::Read])]
    #[case(Method::POST, true, &[AccessMode::Append])]
    #[case(Method::PUT, true, &[AccessMode::Write])]
    #[case(Method::PUT, false, &[AccessMode::Write, AccessMode::Create])]
    #[case(Method::DELETE, true, &[AccessMode::Delete])]
    #[case(Method::PATCH, true, &[AccessMode::Read, AccessMode::Write])]
    #[tokio::test]
    async fn method_table_resolves_required_modes(
        #[case] method: Method,
        #[case] target_exists: bool,
        #[case] expected_modes: &[AccessMode],
    ) {
        let operation = Operation::new(method, uri("http://ex.org/foo"));

        let access_map = assert_ok!(extractor(target_exists).extract(&operation).await);

        let modes = assert_some!(access_map.get(&uri("http://ex.org/foo")));
        assert_eq!(
            modes,
            &expected_modes.iter().copied().collect::<AccessModeSet>()
        );
    }

    #[tokio::test]
    async fn unsupported_methods_are_declined() {
        let operation = Operation::new(Method::OPTIONS, uri("http://ex.org/foo"));

        let error = assert_err!(extractor(true).can_handle(&operation));
        assert!(UNSUPPORTED_OPERATION_METHOD.is_type_of(&error));
    }
}
