//! Minimal HTTP server answering behaviour-test requests with canned bodies.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;

/// How the server answers each connection.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and a JSON body.
    Json(u16, String),
    /// Respond with a status and a plain text body.
    Text(u16, String),
    /// Accept the connection and never answer.
    Silent,
}

/// A running canned-response server.
#[derive(Debug)]
pub struct CannedServer {
    /// Base URL of the server, without a trailing slash.
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Start a server on `runtime` that answers every request with `reply`.
    pub fn start(runtime: &Runtime, reply: Reply) -> Self {
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .unwrap_or_else(|err| panic!("failed to bind test server: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("failed to read test server address: {err}"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        runtime.spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let log = Arc::clone(&log);
                tokio::spawn(async move { serve(stream, reply, log).await });
            }
        });
        Self {
            base_url: format!("http://{address}"),
            requests,
        }
    }

    /// Request heads received so far, lower-cased.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Base URL of a port that refuses connections.
pub fn refused_base_url(runtime: &Runtime) -> String {
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .unwrap_or_else(|err| panic!("failed to bind probe socket: {err}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("failed to read probe address: {err}"));
    drop(listener);
    format!("http://{address}")
}

/// Fresh single-threaded runtime for a scenario.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| panic!("failed to build test runtime: {err}"))
}

async fn serve(mut stream: TcpStream, reply: Reply, log: Arc<Mutex<Vec<String>>>) {
    let mut head = Vec::new();
    let mut buffer = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(read) => head.extend_from_slice(&buffer[..read]),
        }
    }
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(String::from_utf8_lossy(&head).to_lowercase());

    let (status, content_type, body) = match reply {
        Reply::Json(status, body) => (status, "application/json", body),
        Reply::Text(status, body) => (status, "text/plain", body),
        Reply::Silent => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }
    };
    let response = format!(
        "HTTP/1.1 {status} Canned\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
