//! Transport-ready request descriptor.
//!
//! # Design
//! `HttpRequest::new` is a pure function from a URL plus an `HttpMethod` to
//! the fully-resolved request a session executes: headers merged, bearer
//! token injected, body encoded, timeout set. The session never needs to
//! look at `HttpMethod` itself.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::method::HttpMethod;

/// Per-request time budget stamped onto every descriptor. Enforcement is
/// the session's responsibility.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully-resolved request, ready to hand to a [`NetworkSession`].
///
/// [`NetworkSession`]: crate::session::NetworkSession
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: &'static str,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Build a descriptor from a URL and method. Deterministic, no I/O.
    ///
    /// The method's header map is taken verbatim; a bearer token, when
    /// present, is written as `Authorization: Bearer <token>` and wins over
    /// any `Authorization` entry in the map. A POST body map encodes as
    /// `&`-joined `key=value` pairs in key order; an empty map produces no
    /// body at all.
    pub fn new(url: &str, method: &HttpMethod) -> Self {
        let mut headers = method.headers().clone();
        if let Some(token) = method.token() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let body = method
            .body()
            .filter(|body| !body.is_empty())
            .map(|body| params_string(body).into_bytes());

        Self {
            url: url.to_string(),
            method: method.name(),
            headers,
            body,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Encode a parameter map as `&`-joined `key=value` segments.
///
/// Keys come out in lexicographic order. Values are written raw: no
/// percent-escaping of `=`, `&`, or anything else, so the encoded length of
/// each pair equals `key.len() + 1 + value.len()`.
pub fn params_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
