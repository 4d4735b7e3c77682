//! Transport-agnostic HTTP client core.
//!
//! # Overview
//! Callers describe a request as a URL plus an [`HttpMethod`] (headers,
//! bearer token, optional POST body) and hand it to a [`NetworkManager`],
//! which builds a transport-ready [`HttpRequest`], dispatches it through
//! whatever [`NetworkSession`] it owns, and classifies the raw status/bytes
//! that come back into a closed [`NetworkError`] taxonomy. No concrete
//! networking engine lives in this crate; any real stack or test double
//! that implements `NetworkSession` slots in.
//!
//! # Design
//! - `NetworkManager<T>` is generic over its session and owns it for its
//!   whole lifetime; sessions are always passed in explicitly.
//! - Two calling conventions share one dispatch: callback `fetch` and
//!   awaited `fetch_data`, each with its own independently-cancellable
//!   in-flight handle.
//! - [`AnyNetworkManager`] erases the concrete manager type behind captured
//!   forwarding closures, checking the session type at construction and
//!   failing with a typed error on mismatch.
//! - Status classification ([`classify`]) is a flat exact-match table over
//!   five codes plus the 2xx success band.

pub mod any_manager;
pub mod error;
pub mod manager;
pub mod method;
pub mod request;
pub mod session;

pub use any_manager::AnyNetworkManager;
pub use error::{classify, HttpError, NetworkError, TransportError};
pub use manager::{FetchCallback, NetworkManager, NetworkManagerProtocol};
pub use method::HttpMethod;
pub use request::{params_string, HttpRequest, DEFAULT_TIMEOUT};
pub use session::{HttpResponse, NetworkSession, SessionCallback, TaskHandle};
