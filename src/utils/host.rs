//! Scheme and host extraction from absolute URLs.

use regex::Regex;
use std::sync::LazyLock;

/// `scheme://host[:port]` prefix of an absolute http(s) URL.
static HOST_WITH_SCHEMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+").expect("valid host regex"));

/// Extracts `scheme://host[:port]` from an absolute URL.
///
/// Everything from the first `/` after the authority is dropped, including
/// path, query and fragment. Returns `None` for anything that is not an
/// absolute `http` or `https` URL.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     extract_host_with_schema("https://example.com/a/b?q=1"),
///     Some("https://example.com")
/// );
/// ```
pub fn extract_host_with_schema(url: &str) -> Option<&str> {
    HOST_WITH_SCHEMA_REGEX.find(url).map(|m| m.as_str())
}
