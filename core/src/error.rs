//! Error taxonomy and status-code classification.
//!
//! # Design
//! The taxonomy is a closed set: engine-level failures pass through inside
//! `NetworkError::Transport` with their identity intact, and the manager
//! only synthesizes the remaining variants (`DataNotReceived`,
//! `InvalidResponse`, `Http`, `SessionTypeMismatch`). Nothing here is
//! retried or logged-and-swallowed; every failure surfaces to the caller
//! exactly once.

use std::fmt;

use crate::session::HttpResponse;

/// Named kinds for classified HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    ServerError,
    /// Every other non-2xx code.
    Unknown,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HttpError::BadRequest => "Bad Request",
            HttpError::Unauthorized => "Unauthorized",
            HttpError::Forbidden => "Forbidden",
            HttpError::NotFound => "Not Found",
            HttpError::ServerError => "Internal Server Error",
            HttpError::Unknown => "Unknown HTTP Error",
        };
        f.write_str(text)
    }
}

impl std::error::Error for HttpError {}

/// Classify a numeric status code: 2xx is success, five codes map to named
/// kinds, everything else is `Unknown`.
///
/// The error side is a flat exact-match table, not a range test: 502 is
/// `Unknown`, not `ServerError`, and 402 is `Unknown`, not a neighbor of
/// 401/403.
pub fn classify(status: u16) -> Result<(), HttpError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(match status {
        400 => HttpError::BadRequest,
        401 => HttpError::Unauthorized,
        403 => HttpError::Forbidden,
        404 => HttpError::NotFound,
        500 => HttpError::ServerError,
        _ => HttpError::Unknown,
    })
}

/// An error reported by the underlying session engine.
///
/// The manager never rewrites these: the code and message a session reports
/// are the code and message the caller sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub code: i32,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The error a cancelled awaited operation surfaces as.
    pub fn cancelled() -> Self {
        Self::new(-1, "request cancelled")
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for TransportError {}

/// Errors surfaced by [`NetworkManager`] and [`AnyNetworkManager`].
///
/// [`NetworkManager`]: crate::manager::NetworkManager
/// [`AnyNetworkManager`]: crate::any_manager::AnyNetworkManager
#[derive(Debug)]
pub enum NetworkError {
    /// An erasure was constructed over a manager whose session is not the
    /// expected concrete type.
    SessionTypeMismatch,

    /// The session reported success but delivered no payload bytes.
    DataNotReceived,

    /// The session completed without interpretable response metadata. The
    /// raw payload and metadata, where available, are carried for debugging.
    InvalidResponse(Option<Vec<u8>>, Option<HttpResponse>),

    /// The status code classified as a failure.
    Http(HttpError),

    /// The session engine failed; the original error passes through
    /// unchanged.
    Transport(TransportError),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::SessionTypeMismatch => {
                write!(f, "session type does not match the expected type")
            }
            NetworkError::DataNotReceived => write!(f, "no data received"),
            NetworkError::InvalidResponse(_, response) => match response {
                Some(response) => write!(f, "invalid response (status {})", response.status),
                None => write!(f, "invalid response (no metadata)"),
            },
            NetworkError::Http(kind) => write!(f, "HTTP error: {kind}"),
            NetworkError::Transport(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Http(kind) => Some(kind),
            NetworkError::Transport(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_band_is_two_hundreds() {
        for status in 200..300 {
            assert!(classify(status).is_ok(), "status {status}");
        }
    }

    #[test]
    fn exact_table_maps_named_kinds() {
        assert_eq!(classify(400), Err(HttpError::BadRequest));
        assert_eq!(classify(401), Err(HttpError::Unauthorized));
        assert_eq!(classify(403), Err(HttpError::Forbidden));
        assert_eq!(classify(404), Err(HttpError::NotFound));
        assert_eq!(classify(500), Err(HttpError::ServerError));
    }

    #[test]
    fn everything_else_is_unknown() {
        for status in [0, 100, 199, 301, 302, 399, 402, 405, 499, 501, 502, 503, 999] {
            assert_eq!(classify(status), Err(HttpError::Unknown), "status {status}");
        }
    }

    #[test]
    fn http_error_descriptions() {
        assert_eq!(HttpError::BadRequest.to_string(), "Bad Request");
        assert_eq!(HttpError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(HttpError::Forbidden.to_string(), "Forbidden");
        assert_eq!(HttpError::NotFound.to_string(), "Not Found");
        assert_eq!(HttpError::ServerError.to_string(), "Internal Server Error");
        assert_eq!(HttpError::Unknown.to_string(), "Unknown HTTP Error");
    }

    #[test]
    fn transport_error_keeps_code_and_message() {
        let error = TransportError::new(101, "connection reset");
        assert_eq!(error.code, 101);
        assert_eq!(error.to_string(), "transport error 101: connection reset");
    }

    #[test]
    fn network_error_display() {
        assert_eq!(
            NetworkError::DataNotReceived.to_string(),
            "no data received"
        );
        assert_eq!(
            NetworkError::Http(HttpError::NotFound).to_string(),
            "HTTP error: Not Found"
        );
        assert_eq!(
            NetworkError::InvalidResponse(None, None).to_string(),
            "invalid response (no metadata)"
        );
    }
}
