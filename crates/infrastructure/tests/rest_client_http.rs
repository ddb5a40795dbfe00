//! End-to-end tests for the reqwest adapter against a loopback server
//! serving canned HTTP/1.1 responses.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use verity_application::ports::ApiClient;
use verity_application::{ApplicationError, ApplicationResult};
use verity_domain::{ExtractError, RequestBody, TransportError};
use verity_infrastructure::{RestClient, scenario_runner, scenario_session};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Serves exactly one connection with a canned response, handing back the
/// bound address and the raw request that arrived.
async fn serve_once(response: String) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        let _ = tx.send(request);
    });

    (addr, rx)
}

/// Reads one HTTP/1.1 request: headers, then a `Content-Length` body when
/// one is declared.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() - (header_end + 4) >= content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn get_request_resolves_verifies_and_extracts() {
    init_tracing();

    let (addr, request) = serve_once(http_response("200 OK", r#"[{"id":1,"name":"Ada"}]"#)).await;

    let mut session = scenario_session("reads the user list");
    session.set_base_url(&format!("http://{addr}/")).unwrap();
    session.get("/users").await.unwrap();

    assert!(session.verify_status_code(200).unwrap().passed);
    assert!(session.verify_successful().unwrap().passed);

    let name: String = session.extract("[0].name").unwrap();
    assert_eq!(name, "Ada");

    let missing: ApplicationResult<String> = session.extract("[0].missing");
    assert!(matches!(
        missing,
        Err(ApplicationError::Extraction(
            ExtractError::PathNotFound { .. }
        ))
    ));

    let report = session.finish();
    assert!(report.passed);

    // The duplicated slash collapsed: the request line has a single `/users`.
    let request = request.await.unwrap();
    assert!(request.starts_with("GET /users HTTP/1.1\r\n"), "{request}");
}

#[tokio::test]
async fn post_request_sends_body_headers_and_bearer_token() {
    init_tracing();

    let (addr, request) =
        serve_once(http_response("201 Created", r#"{"id":7,"name":"Bob"}"#)).await;

    let mut session = scenario_session("creates a user");
    session.set_base_url(&format!("http://{addr}")).unwrap();
    session.add_header("X-Request-Id", "req-42").unwrap();
    session.add_authentication("t0k3n").unwrap();

    let body = RequestBody::json(&serde_json::json!({"name": "Bob"})).unwrap();
    session.post("/users", body).await.unwrap();

    assert!(session.verify_status_code(201).unwrap().passed);
    let user: User = session.deserialize().unwrap();
    assert_eq!(
        user,
        User {
            id: 7,
            name: "Bob".to_string()
        }
    );
    assert!(session.verify_contains("Bob").unwrap().passed);

    // The mismatching substring fails the assertion and thereby the report.
    let outcome = session.verify_contains("Carol").unwrap();
    assert!(!outcome.passed);

    let report = session.finish();
    assert!(!report.passed);
    assert_eq!(
        report.failure.as_deref(),
        Some("body does not contain 'Carol'")
    );

    let request = request.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /users HTTP/1.1\r\n"), "{request}");
    assert!(lowered.contains("x-request-id: req-42"));
    assert!(lowered.contains("authorization: bearer t0k3n"));
    assert!(lowered.contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"name":"Bob"}"#), "{request}");
}

#[tokio::test]
async fn connection_failure_is_captured_in_the_response() {
    init_tracing();

    // Bind and immediately release a port so nothing is listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = scenario_session("talks to a dead endpoint");
    session.set_base_url(&format!("http://{addr}")).unwrap();

    let response = session.get("/ping").await.unwrap().clone();
    assert_eq!(response.status, 0);
    assert!(!response.is_success());
    assert!(response.is_transport_failure());
    assert!(response.error_message().is_some());

    let outcome = session.verify_successful().unwrap();
    assert!(!outcome.passed);
    assert!(outcome.message.unwrap().contains("status 0"));

    let report = session.finish();
    assert!(!report.passed);
}

#[tokio::test]
async fn timeout_is_captured_rather_than_hanging() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept, then sit on the connection well past the client timeout.
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(stream);
    });

    // Drive the client through the port directly.
    let mut client = RestClient::new();
    client.set_base_url(&format!("http://{addr}")).unwrap();
    client.set_timeout(200).unwrap();

    let response = client.get("/slow").await.unwrap();
    assert!(matches!(
        response.transport_error,
        Some(TransportError::Timeout { timeout_ms: 200 })
    ));

    client.dispose();
}

#[tokio::test]
async fn runner_backs_each_scenario_with_its_own_client() {
    init_tracing();

    let (first_addr, _) = serve_once(http_response("200 OK", r#"{"status":"up"}"#)).await;
    let (second_addr, _) = serve_once(http_response("500 Internal Server Error", "down")).await;

    let mut runner = scenario_runner();

    let report = runner
        .run("checks a healthy service", async |session| {
            session.set_base_url(&format!("http://{first_addr}"))?;
            session.get("/health").await?;
            session.verify_status_code(200)?;
            let status: String = session.extract("status")?;
            assert_eq!(status, "up");
            Ok(())
        })
        .await;
    assert!(report.passed);

    let report = runner
        .run("checks a broken service", async |session| {
            session.set_base_url(&format!("http://{second_addr}"))?;
            session.get("/health").await?;
            session.verify_successful()?;
            Ok(())
        })
        .await;
    assert!(!report.passed);

    let summary = runner.into_summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
}
