//! I define types to represent resource uris in solid storage
//! space.
//!

use http_uri::invariant::NormalAbsoluteHttpUri;

/// A resource uri is an http absolute uri in normal form.
pub type SolidResourceUri = NormalAbsoluteHttpUri;

/// Check if given uri is a container uri.
///
/// Container uris have a trailing slash in their path, as per
/// hierarchical slot conventions.
#[inline]
pub fn is_container_uri(uri: &SolidResourceUri) -> bool {
    uri.as_str().ends_with('/') && uri.query_str().is_none()
}

#[cfg(test)]
mod tests {
    use claims::assert_ok;
    use rstest::rstest;

    use super::*;

    fn uri(uri_str: &str) -> SolidResourceUri {
        assert_ok!(
            SolidResourceUri::try_new_from(uri_str),
            "Claimed valid uri str"
        )
    }

    #[rstest]
    #[case("http://ex.org/", true)]
    #[case("http://ex.org/a/", true)]
    #[case("http://ex.org/a", false)]
    #[case("http://ex.org/a/b.acl", false)]
    fn is_container_uri_works_correctly(#[case] uri_str: &str, #[case] expected: bool) {
        assert_eq!(is_container_uri(&uri(uri_str)), expected);
    }
}
