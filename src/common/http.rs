//! Module providing utilities for working with HTTP library components.

use hyper::{http::uri::InvalidUri, StatusCode, Uri};

/// Resolves `path` (and an optional, already encoded `query`) against a broker base [`Uri`].
///
/// Any path prefix on `base` is preserved, so `http://host/mq` and `/fetch` resolve to
/// `http://host/mq/fetch`.
pub fn endpoint_uri(base: &Uri, path: &str, query: Option<&str>) -> Result<Uri, InvalidUri> {
    let base = base.to_string();
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let uri = match query {
        Some(query) if !query.is_empty() => format!("{base}/{path}?{query}"),
        _ => format!("{base}/{path}"),
    };

    uri.parse()
}

/// Renders a diagnostic message for an unsuccessful response.
///
/// Falls back to the canonical reason of `status` when the body carries no text.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    let message = String::from_utf8_lossy(body);
    let message = message.trim();

    if message.is_empty() {
        status.canonical_reason().unwrap_or_default().into()
    } else {
        message.into()
    }
}
