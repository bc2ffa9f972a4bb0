//! Shared helpers for protocol contract tests

use std::sync::Mutex;

use dynup_core::Notifier;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Notifier that records every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all `(event, message)` pairs delivered so far
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), message.to_string()));
    }
}

/// Serve canned plaintext responses to sequential connections on a fresh
/// local port
///
/// Returns the update URL and a handle resolving to the raw request
/// heads, one per served connection. Keeps the tests off the network
/// entirely.
pub async fn spawn_update_server(
    responses: Vec<(u16, &'static str)>,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");

            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if raw.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            heads.push(String::from_utf8_lossy(&raw).to_string());

            let reason = match status {
                200 => "OK",
                503 => "Service Unavailable",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            let _ = stream.shutdown().await;
        }
        heads
    });

    (format!("http://{}/nic/update", addr), handle)
}
