//! One-shot HTTP server for exercising the real client.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with `status_line` and `body`.
///
/// Returns the base URL and a handle resolving to the request head.
pub(crate) async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let response = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    serve_raw(response.into_bytes()).await
}

/// Serve one request with raw response bytes, then close the socket.
pub(crate) async fn serve_raw(response: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket.write_all(&response).await.ok();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&head).into_owned()
    });

    (format!("http://{addr}"), handle)
}

/// An address with nothing listening on it.
pub(crate) async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
