//! HTTP method model carrying per-request metadata.
//!
//! # Design
//! Each variant bundles the extra headers and optional bearer token for the
//! request it describes; only `Post` carries a body map. Maps are `BTreeMap`
//! so iteration order (and therefore body encoding order) is lexicographic
//! by key and stable across runs.

use std::collections::BTreeMap;
use std::fmt;

/// HTTP method plus the headers, token, and (for POST) body it carries.
///
/// Only `Post` carries a body; `body()` yields `None` for every other
/// variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get {
        headers: BTreeMap<String, String>,
        token: Option<String>,
    },
    Post {
        headers: BTreeMap<String, String>,
        token: Option<String>,
        body: BTreeMap<String, String>,
    },
    Put {
        headers: BTreeMap<String, String>,
        token: Option<String>,
    },
    Delete {
        headers: BTreeMap<String, String>,
        token: Option<String>,
    },
    Patch {
        headers: BTreeMap<String, String>,
        token: Option<String>,
    },
}

impl HttpMethod {
    pub fn get() -> Self {
        HttpMethod::Get {
            headers: BTreeMap::new(),
            token: None,
        }
    }

    pub fn post(body: BTreeMap<String, String>) -> Self {
        HttpMethod::Post {
            headers: BTreeMap::new(),
            token: None,
            body,
        }
    }

    pub fn put() -> Self {
        HttpMethod::Put {
            headers: BTreeMap::new(),
            token: None,
        }
    }

    pub fn delete() -> Self {
        HttpMethod::Delete {
            headers: BTreeMap::new(),
            token: None,
        }
    }

    pub fn patch() -> Self {
        HttpMethod::Patch {
            headers: BTreeMap::new(),
            token: None,
        }
    }

    /// Replace the header map of this method.
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        match &mut self {
            HttpMethod::Get { headers: h, .. }
            | HttpMethod::Post { headers: h, .. }
            | HttpMethod::Put { headers: h, .. }
            | HttpMethod::Delete { headers: h, .. }
            | HttpMethod::Patch { headers: h, .. } => *h = headers,
        }
        self
    }

    /// Attach a bearer token to this method.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        match &mut self {
            HttpMethod::Get { token: t, .. }
            | HttpMethod::Post { token: t, .. }
            | HttpMethod::Put { token: t, .. }
            | HttpMethod::Delete { token: t, .. }
            | HttpMethod::Patch { token: t, .. } => *t = Some(token.into()),
        }
        self
    }

    /// The wire name of the method: `"GET"`, `"POST"`, and so on.
    pub fn name(&self) -> &'static str {
        match self {
            HttpMethod::Get { .. } => "GET",
            HttpMethod::Post { .. } => "POST",
            HttpMethod::Put { .. } => "PUT",
            HttpMethod::Delete { .. } => "DELETE",
            HttpMethod::Patch { .. } => "PATCH",
        }
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        match self {
            HttpMethod::Get { headers, .. }
            | HttpMethod::Post { headers, .. }
            | HttpMethod::Put { headers, .. }
            | HttpMethod::Delete { headers, .. }
            | HttpMethod::Patch { headers, .. } => headers,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            HttpMethod::Get { token, .. }
            | HttpMethod::Post { token, .. }
            | HttpMethod::Put { token, .. }
            | HttpMethod::Delete { token, .. }
            | HttpMethod::Patch { token, .. } => token.as_deref(),
        }
    }

    /// The body map, `Some` only for `Post`.
    pub fn body(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            HttpMethod::Post { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
