//! Transport capability: the minimal surface a networking engine must
//! provide.
//!
//! # Design
//! The manager never talks to a concrete engine. It dispatches through
//! [`NetworkSession`], which any real stack or in-process test double can
//! implement. Completions carry the raw `(bytes, metadata, error)` triple
//! exactly as the engine saw it; interpretation belongs to the manager.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::HttpRequest;

/// Response metadata as plain data: the numeric status plus whatever headers
/// the engine surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Metadata with the given status and no headers.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }
}

/// Raw completion surface of a session operation: payload bytes, response
/// metadata, and engine error, each independently optional.
pub type SessionCallback =
    Box<dyn FnOnce(Option<Vec<u8>>, Option<HttpResponse>, Option<TransportError>) + Send>;

/// A cancellable reference to one dispatched, still-pending operation.
///
/// `cancel` is idempotent and harmless after the operation has already
/// delivered its completion.
pub trait TaskHandle: Send {
    fn cancel(&self);
}

/// The operation set a networking engine must provide.
///
/// Implementations must deliver each completion exactly once, and only
/// after the issuing call has returned — never synchronously inside it.
/// The execution context the completion fires on is the engine's choice.
/// The 30-second budget on each [`HttpRequest`] is enforced here, not by
/// the manager.
#[async_trait]
pub trait NetworkSession: Send + Sync + 'static {
    /// Issue a request described only by a URL.
    fn data_task_with_url(&self, url: &str, on_complete: SessionCallback) -> Box<dyn TaskHandle>;

    /// Issue a fully-resolved request descriptor.
    fn data_task(&self, request: &HttpRequest, on_complete: SessionCallback)
        -> Box<dyn TaskHandle>;

    /// Await-style single shot: resolve a descriptor to payload bytes and
    /// response metadata, or fail with the engine's error.
    async fn data(&self, request: &HttpRequest) -> Result<(Vec<u8>, HttpResponse), TransportError>;
}
