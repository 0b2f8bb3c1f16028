//! Request URL parsing.
//!
//! Callbacks arrive as absolute URLs (`https://host/auth?...`), as a path with
//! a query (`/auth?...`), or as a bare query (`?...`). All three are resolved
//! against a placeholder base so the query string can be read uniformly.

use url::Url;

const PLACEHOLDER_BASE: &str = "http://localhost/";

/// Parse an absolute or relative request URL.
pub fn parse_request_url(input: &str) -> Result<Url, url::ParseError> {
    match Url::parse(input) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(input))
        }
        other => other,
    }
}

/// Value of the first `name` query parameter, unless it is empty.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
