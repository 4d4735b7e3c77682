//! Type-erasing wrapper over any concrete network manager.
//!
//! # Design
//! `AnyNetworkManager<U>` hides which concrete manager sits behind it while
//! keeping the full [`NetworkManagerProtocol`] surface, so heterogeneous
//! managers can be stored behind one fixed shape. Construction captures the
//! wrapped manager's operations as boxed closures (a value capture — the
//! erasure's lifetime is independent of the original binding) and downcasts
//! its session to the declared parameter `U`, failing with a typed error
//! instead of crashing on a mismatch. After construction every operation is
//! a pure forward.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::manager::{FetchCallback, NetworkManagerProtocol};
use crate::method::HttpMethod;
use crate::session::NetworkSession;

type FetchFn = Box<dyn Fn(&str, HttpMethod, FetchCallback) + Send + Sync>;
type FetchDataFn = Box<
    dyn Fn(&str, HttpMethod) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, NetworkError>> + Send>>
        + Send
        + Sync,
>;
type CancelFn = Box<dyn Fn() + Send + Sync>;

/// A concrete manager erased down to its session type parameter.
pub struct AnyNetworkManager<U: NetworkSession> {
    session: Arc<U>,
    fetch_fn: FetchFn,
    fetch_data_fn: FetchDataFn,
    cancel_fn: CancelFn,
}

impl<U: NetworkSession> AnyNetworkManager<U> {
    /// Wrap `manager`, taking ownership of it.
    ///
    /// Fails with [`NetworkError::SessionTypeMismatch`] when the wrapped
    /// manager's session is not a `U`; nothing is constructed in that case.
    pub fn new<M>(manager: M) -> Result<Self, NetworkError>
    where
        M: NetworkManagerProtocol + 'static,
    {
        let cloned = Arc::clone(manager.session());
        let shared: Arc<dyn Any + Send + Sync> = cloned;
        let session = shared
            .downcast::<U>()
            .map_err(|_| NetworkError::SessionTypeMismatch)?;

        let manager = Arc::new(manager);

        let fetch_manager = Arc::clone(&manager);
        let fetch_fn: FetchFn = Box::new(move |url: &str, method, on_complete| {
            fetch_manager.fetch(url, method, on_complete);
        });

        let data_manager = Arc::clone(&manager);
        let fetch_data_fn: FetchDataFn = Box::new(move |url: &str, method| {
            let manager = Arc::clone(&data_manager);
            let url = url.to_string();
            Box::pin(async move { manager.fetch_data(&url, method).await })
        });

        let cancel_fn: CancelFn = Box::new(move || manager.cancel());

        Ok(Self {
            session,
            fetch_fn,
            fetch_data_fn,
            cancel_fn,
        })
    }

    pub fn session(&self) -> &Arc<U> {
        &self.session
    }

    /// Forward to the wrapped manager's `cancel`.
    pub fn cancel(&self) {
        (self.cancel_fn)();
    }

    /// Forward to the wrapped manager's callback `fetch`.
    pub fn fetch(&self, url: &str, method: HttpMethod, on_complete: FetchCallback) {
        (self.fetch_fn)(url, method, on_complete);
    }

    /// Forward to the wrapped manager's awaited `fetch_data`.
    pub async fn fetch_data(&self, url: &str, method: HttpMethod) -> Result<Vec<u8>, NetworkError> {
        (self.fetch_data_fn)(url, method).await
    }
}

#[async_trait]
impl<U: NetworkSession> NetworkManagerProtocol for AnyNetworkManager<U> {
    type Session = U;

    fn session(&self) -> &Arc<U> {
        AnyNetworkManager::session(self)
    }

    fn cancel(&self) {
        AnyNetworkManager::cancel(self);
    }

    fn fetch(&self, url: &str, method: HttpMethod, on_complete: FetchCallback) {
        AnyNetworkManager::fetch(self, url, method, on_complete);
    }

    async fn fetch_data(&self, url: &str, method: HttpMethod) -> Result<Vec<u8>, NetworkError> {
        AnyNetworkManager::fetch_data(self, url, method).await
    }
}
