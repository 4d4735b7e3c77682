//! Network manager: builds descriptors, dispatches through a session, and
//! classifies what comes back.
//!
//! # Design
//! `NetworkManager<T>` owns its session for its whole lifetime and exposes
//! two calling conventions: a callback `fetch` and an awaited `fetch_data`.
//! Each convention tracks its own in-flight handle in its own slot; a new
//! call silently supersedes the old handle and only an explicit `cancel`
//! cancels. The awaited path deliberately skips status classification and
//! treats any non-failing session response as success, mirroring the
//! callback/await split of the engines this models; see `fetch_data`.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::error::{classify, NetworkError, TransportError};
use crate::method::HttpMethod;
use crate::request::HttpRequest;
use crate::session::{HttpResponse, NetworkSession, SessionCallback, TaskHandle};

/// Completion surface of the callback convention.
pub type FetchCallback = Box<dyn FnOnce(Result<Vec<u8>, NetworkError>) + Send>;

/// Contract shared by [`NetworkManager`] and its type-erasing wrapper.
#[async_trait]
pub trait NetworkManagerProtocol: Send + Sync {
    type Session: NetworkSession;

    /// The session this manager dispatches through.
    fn session(&self) -> &Arc<Self::Session>;

    /// Cancel whatever is in flight on either calling convention. A no-op
    /// when nothing is.
    fn cancel(&self);

    /// Callback convention: dispatch and deliver exactly one result.
    fn fetch(&self, url: &str, method: HttpMethod, on_complete: FetchCallback);

    /// Await convention: dispatch and resolve to the payload bytes.
    async fn fetch_data(&self, url: &str, method: HttpMethod) -> Result<Vec<u8>, NetworkError>;
}

/// Concrete manager over one exclusively-owned session.
pub struct NetworkManager<T: NetworkSession> {
    session: Arc<T>,
    task: Mutex<Option<Box<dyn TaskHandle>>>,
    data_task: Mutex<Option<AbortHandle>>,
}

impl<T: NetworkSession> NetworkManager<T> {
    /// Build a manager around the given session. There is no default
    /// session; callers always supply one.
    pub fn new(session: T) -> Self {
        Self {
            session: Arc::new(session),
            task: Mutex::new(None),
            data_task: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Arc<T> {
        &self.session
    }

    /// Dispatch `method` against `url`, delivering exactly one result to
    /// `on_complete` once the session completes.
    ///
    /// The handle of a previous call is replaced, not cancelled; the older
    /// operation keeps running untracked.
    pub fn fetch(&self, url: &str, method: HttpMethod, on_complete: FetchCallback) {
        let request = HttpRequest::new(url, &method);
        debug!(url, method = request.method, "dispatching request");

        let callback: SessionCallback = Box::new(move |data, response, error| {
            on_complete(evaluate(data, response, error));
        });
        let handle = self.session.data_task(&request, callback);
        *self.lock_task() = Some(handle);
    }

    /// Awaited form of [`fetch`](Self::fetch).
    ///
    /// The session call runs as its own task so it stays cancellable from
    /// [`cancel`](Self::cancel) independently of the callback path. Unlike
    /// the callback path, the status code is not classified here: any
    /// response the session resolves counts as success, and only an empty
    /// payload downgrades to `DataNotReceived`.
    pub async fn fetch_data(&self, url: &str, method: HttpMethod) -> Result<Vec<u8>, NetworkError> {
        let request = HttpRequest::new(url, &method);
        debug!(url, method = request.method, "dispatching awaited request");

        let session = Arc::clone(&self.session);
        let join = tokio::spawn(async move { session.data(&request).await });
        *self.lock_data_task() = Some(join.abort_handle());

        match join.await {
            Ok(Ok((data, _response))) if !data.is_empty() => Ok(data),
            Ok(Ok(_)) => Err(NetworkError::DataNotReceived),
            Ok(Err(error)) => Err(NetworkError::Transport(error)),
            Err(join_error) if join_error.is_cancelled() => {
                Err(NetworkError::Transport(TransportError::cancelled()))
            }
            Err(join_error) => std::panic::resume_unwind(join_error.into_panic()),
        }
    }

    /// Cancel the in-flight operation of each convention, if any.
    ///
    /// Best-effort: a completion that already fired stands, and cancelling
    /// with nothing in flight does nothing.
    pub fn cancel(&self) {
        if let Some(task) = self.lock_task().take() {
            debug!("cancelling in-flight request");
            task.cancel();
        }
        if let Some(handle) = self.lock_data_task().take() {
            debug!("aborting in-flight awaited request");
            handle.abort();
        }
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn TaskHandle>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_data_task(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.data_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<T: NetworkSession> NetworkManagerProtocol for NetworkManager<T> {
    type Session = T;

    fn session(&self) -> &Arc<T> {
        NetworkManager::session(self)
    }

    fn cancel(&self) {
        NetworkManager::cancel(self);
    }

    fn fetch(&self, url: &str, method: HttpMethod, on_complete: FetchCallback) {
        NetworkManager::fetch(self, url, method, on_complete);
    }

    async fn fetch_data(&self, url: &str, method: HttpMethod) -> Result<Vec<u8>, NetworkError> {
        NetworkManager::fetch_data(self, url, method).await
    }
}

/// Turn a raw session completion into the caller's result.
///
/// Precedence: an engine error passes through first; missing metadata is an
/// invalid response carrying the raw pieces; otherwise the status decides —
/// success band yields the bytes (or `DataNotReceived` without any), a
/// classified kind fails regardless of body.
fn evaluate(
    data: Option<Vec<u8>>,
    response: Option<HttpResponse>,
    error: Option<TransportError>,
) -> Result<Vec<u8>, NetworkError> {
    if let Some(error) = error {
        return Err(NetworkError::Transport(error));
    }
    let Some(response) = response else {
        return Err(NetworkError::InvalidResponse(data, None));
    };
    match classify(response.status) {
        Ok(()) => data.ok_or(NetworkError::DataNotReceived),
        Err(kind) => Err(NetworkError::Http(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    #[test]
    fn engine_error_takes_precedence() {
        let result = evaluate(
            Some(b"ignored".to_vec()),
            Some(HttpResponse::with_status(200)),
            Some(TransportError::new(101, "reset")),
        );
        match result {
            Err(NetworkError::Transport(error)) => {
                assert_eq!(error.code, 101);
                assert_eq!(error.message, "reset");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn missing_metadata_is_invalid_response() {
        let result = evaluate(Some(b"raw".to_vec()), None, None);
        match result {
            Err(NetworkError::InvalidResponse(data, response)) => {
                assert_eq!(data.as_deref(), Some(b"raw".as_slice()));
                assert!(response.is_none());
            }
            other => panic!("expected invalid response, got {other:?}"),
        }
    }

    #[test]
    fn success_status_with_bytes_succeeds() {
        let result = evaluate(
            Some(b"payload".to_vec()),
            Some(HttpResponse::with_status(204)),
            None,
        );
        assert_eq!(result.unwrap(), b"payload");
    }

    #[test]
    fn success_status_without_bytes_is_data_not_received() {
        let result = evaluate(None, Some(HttpResponse::with_status(200)), None);
        assert!(matches!(result, Err(NetworkError::DataNotReceived)));
    }

    #[test]
    fn error_status_fails_even_with_bytes() {
        let result = evaluate(
            Some(b"body".to_vec()),
            Some(HttpResponse::with_status(404)),
            None,
        );
        assert!(matches!(result, Err(NetworkError::Http(HttpError::NotFound))));
    }

    #[test]
    fn off_table_status_is_unknown() {
        let result = evaluate(
            Some(b"body".to_vec()),
            Some(HttpResponse::with_status(502)),
            None,
        );
        assert!(matches!(result, Err(NetworkError::Http(HttpError::Unknown))));
    }
}
