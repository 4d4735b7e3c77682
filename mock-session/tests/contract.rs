//! Verify the doubles honor the session contract a real engine must honor.

use std::time::Duration;

use mock_session::{MockSession, NullSession};
use network_core::{HttpMethod, HttpRequest, NetworkSession, TransportError};
use tokio::sync::oneshot;

const URL: &str = "http://www.example.com";

fn request() -> HttpRequest {
    HttpRequest::new(URL, &HttpMethod::get())
}

#[tokio::test]
async fn completion_is_never_synchronous() {
    let session = MockSession::new().with_data("payload");
    let (tx, rx) = oneshot::channel();

    let _handle = session.data_task(
        &request(),
        Box::new(move |data, response, error| {
            let _ = tx.send((data, response, error));
        }),
    );

    // Nothing may have been delivered while data_task was running.
    let mut rx = rx;
    assert!(rx.try_recv().is_err());

    let (data, response, error) = rx.await.expect("completion dropped");
    assert_eq!(data.as_deref(), Some(b"payload".as_slice()));
    assert_eq!(response.map(|r| r.status), Some(200));
    assert!(error.is_none());
}

#[tokio::test]
async fn scripted_error_is_delivered_as_is() {
    let session = MockSession::new().with_error(TransportError::new(101, "reset"));
    let (tx, rx) = oneshot::channel();

    let _handle = session.data_task(
        &request(),
        Box::new(move |_, _, error| {
            let _ = tx.send(error);
        }),
    );

    let error = rx.await.expect("completion dropped").expect("no error");
    assert_eq!(error, TransportError::new(101, "reset"));
}

#[tokio::test]
async fn omitted_response_delivers_no_metadata() {
    let session = MockSession::new().with_data("payload").without_response();
    let (tx, rx) = oneshot::channel();

    let _handle = session.data_task(
        &request(),
        Box::new(move |data, response, _| {
            let _ = tx.send((data, response));
        }),
    );

    let (data, response) = rx.await.expect("completion dropped");
    assert!(data.is_some());
    assert!(response.is_none());
}

#[tokio::test]
async fn cancelled_handle_suppresses_delivery_and_counts() {
    let session = MockSession::new()
        .with_data("late")
        .with_delay(Duration::from_millis(200));
    let (tx, rx) = oneshot::channel::<()>();

    let handle = session.data_task(
        &request(),
        Box::new(move |_, _, _| {
            let _ = tx.send(());
        }),
    );

    handle.cancel();
    handle.cancel();
    assert_eq!(session.cancel_count(), 2);

    // The aborted delivery drops the sender without sending.
    assert!(rx.await.is_err());
}

#[tokio::test]
async fn url_only_dispatch_delivers_the_same_script() {
    let session = MockSession::new().with_data("payload").with_status(201);
    let (tx, rx) = oneshot::channel();

    let _handle = session.data_task_with_url(
        URL,
        Box::new(move |data, response, _| {
            let _ = tx.send((data, response));
        }),
    );

    let (data, response) = rx.await.expect("completion dropped");
    assert_eq!(data.as_deref(), Some(b"payload".as_slice()));
    assert_eq!(response.map(|r| r.status), Some(201));
}

#[tokio::test]
async fn data_resolves_scripted_payload_and_status() {
    let session = MockSession::new().with_data("payload").with_status(201);
    let (data, response) = session.data(&request()).await.expect("data failed");
    assert_eq!(data, b"payload");
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn dispatched_descriptors_are_recorded() {
    let session = MockSession::new().with_data("payload");
    let _ = session.data(&request()).await;
    let seen = session.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, URL);
}

#[tokio::test]
async fn null_session_always_fails() {
    let session = NullSession;
    let error = session.data(&request()).await.unwrap_err();
    assert_eq!(error.code, -2);

    let (tx, rx) = oneshot::channel();
    let _handle = session.data_task_with_url(
        URL,
        Box::new(move |_, _, error| {
            let _ = tx.send(error);
        }),
    );
    assert!(rx.await.expect("completion dropped").is_some());
}
