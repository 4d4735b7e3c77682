//! In-process test doubles for the `network-core` transport contract.
//!
//! # Design
//! `MockSession` is a scriptable engine: tests script the payload, the
//! status, an engine error, or a missing-metadata response up front, then
//! drive a real manager through it. Completions are always delivered from a
//! spawned task so the "never synchronously inside the issuing call" part
//! of the session contract holds in tests too. Handles count their `cancel`
//! calls and abort the pending delivery when cancellation wins the race.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use network_core::{
    FetchCallback, HttpMethod, HttpRequest, HttpResponse, NetworkError, NetworkManagerProtocol,
    NetworkSession, SessionCallback, TaskHandle, TransportError,
};
use tokio::task::AbortHandle;

/// A scriptable [`NetworkSession`].
///
/// Defaults: no payload, no error, status 200, metadata present, immediate
/// delivery.
#[derive(Debug, Default)]
pub struct MockSession {
    data: Option<Vec<u8>>,
    error: Option<TransportError>,
    status: Option<u16>,
    omit_response: bool,
    delay: Option<Duration>,
    cancelled: Arc<AtomicUsize>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the payload bytes every completion delivers.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Script an engine error; it takes the place of payload and metadata
    /// interpretation in the manager.
    pub fn with_error(mut self, error: TransportError) -> Self {
        self.error = Some(error);
        self
    }

    /// Script the response status (200 when unset).
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Deliver completions without any response metadata.
    pub fn without_response(mut self) -> Self {
        self.omit_response = true;
        self
    }

    /// Hold every completion back for `delay`, leaving a window for
    /// cancellation tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `cancel` was called across all handles this session
    /// handed out.
    pub fn cancel_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Every descriptor dispatched through [`NetworkSession::data_task`],
    /// oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock_requests().clone()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<HttpRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, on_complete: SessionCallback) -> Box<dyn TaskHandle> {
        let data = self.data.clone();
        let error = self.error.clone();
        let response =
            (!self.omit_response).then(|| HttpResponse::with_status(self.status.unwrap_or(200)));
        let delay = self.delay;

        let join = tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            on_complete(data, response, error);
        });

        Box::new(MockTaskHandle {
            abort: join.abort_handle(),
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

#[async_trait]
impl NetworkSession for MockSession {
    fn data_task_with_url(&self, _url: &str, on_complete: SessionCallback) -> Box<dyn TaskHandle> {
        self.deliver(on_complete)
    }

    fn data_task(
        &self,
        request: &HttpRequest,
        on_complete: SessionCallback,
    ) -> Box<dyn TaskHandle> {
        self.lock_requests().push(request.clone());
        self.deliver(on_complete)
    }

    async fn data(&self, request: &HttpRequest) -> Result<(Vec<u8>, HttpResponse), TransportError> {
        self.lock_requests().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.error.clone() {
            return Err(error);
        }
        Ok((
            self.data.clone().unwrap_or_default(),
            HttpResponse::with_status(self.status.unwrap_or(200)),
        ))
    }
}

/// Handle to one scripted delivery: counts cancels and aborts the pending
/// completion.
struct MockTaskHandle {
    abort: AbortHandle,
    cancelled: Arc<AtomicUsize>,
}

impl TaskHandle for MockTaskHandle {
    fn cancel(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
        self.abort.abort();
    }
}

/// A session whose every operation fails. Exists as a second concrete
/// session type for erasure type-mismatch scenarios.
#[derive(Debug, Default)]
pub struct NullSession;

impl NullSession {
    fn error() -> TransportError {
        TransportError::new(-2, "null session")
    }
}

struct NoopHandle;

impl TaskHandle for NoopHandle {
    fn cancel(&self) {}
}

#[async_trait]
impl NetworkSession for NullSession {
    fn data_task_with_url(&self, _url: &str, on_complete: SessionCallback) -> Box<dyn TaskHandle> {
        tokio::spawn(async move { on_complete(None, None, Some(NullSession::error())) });
        Box::new(NoopHandle)
    }

    fn data_task(
        &self,
        _request: &HttpRequest,
        on_complete: SessionCallback,
    ) -> Box<dyn TaskHandle> {
        tokio::spawn(async move { on_complete(None, None, Some(NullSession::error())) });
        Box::new(NoopHandle)
    }

    async fn data(
        &self,
        _request: &HttpRequest,
    ) -> Result<(Vec<u8>, HttpResponse), TransportError> {
        Err(NullSession::error())
    }
}

/// A scriptable concrete manager, for verifying that the type-erasing
/// wrapper forwards verbatim. It never touches its session.
pub struct MockNetworkManager<T: NetworkSession> {
    session: Arc<T>,
    output_data: Option<Vec<u8>>,
    will_succeed: bool,
    did_fetch: Arc<AtomicBool>,
    cancels: Arc<AtomicUsize>,
}

impl<T: NetworkSession> MockNetworkManager<T> {
    pub fn new(session: T) -> Self {
        Self {
            session: Arc::new(session),
            output_data: Some(Vec::new()),
            will_succeed: true,
            did_fetch: Arc::new(AtomicBool::new(false)),
            cancels: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script the bytes every successful fetch resolves to.
    pub fn with_output(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.output_data = Some(data.into());
        self
    }

    /// Script every fetch to fail.
    pub fn failing(mut self) -> Self {
        self.will_succeed = false;
        self
    }

    /// Flag flipped on the first fetch; clone it before moving the manager
    /// into an erasure.
    pub fn fetch_probe(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.did_fetch)
    }

    /// Counter of `cancel` calls; clone it before moving the manager into
    /// an erasure.
    pub fn cancel_probe(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.cancels)
    }

    fn mock_error() -> NetworkError {
        NetworkError::Transport(TransportError::new(-3, "error from mock network manager"))
    }
}

#[async_trait]
impl<T: NetworkSession> NetworkManagerProtocol for MockNetworkManager<T> {
    type Session = T;

    fn session(&self) -> &Arc<T> {
        &self.session
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn fetch(&self, _url: &str, _method: HttpMethod, on_complete: FetchCallback) {
        self.did_fetch.store(true, Ordering::SeqCst);
        let output = self.output_data.clone();
        let will_succeed = self.will_succeed;
        tokio::spawn(async move {
            if will_succeed {
                on_complete(Ok(output.unwrap_or_default()));
            } else {
                on_complete(Err(Self::mock_error()));
            }
        });
    }

    async fn fetch_data(&self, _url: &str, _method: HttpMethod) -> Result<Vec<u8>, NetworkError> {
        self.did_fetch.store(true, Ordering::SeqCst);
        if self.will_succeed {
            Ok(self.output_data.clone().unwrap_or_default())
        } else {
            Err(Self::mock_error())
        }
    }
}
