//! Discord IPC socket discovery.
//!
//! Discord listens on `discord-ipc-0` through `discord-ipc-9`: unix
//! sockets in the runtime/temp directory, or named pipes on Windows.
//! The first one that accepts a connection wins.

use std::path::PathBuf;

use beacon_common::RpcError;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Number of `discord-ipc-N` slots Discord may listen on.
pub const IPC_SLOTS: u8 = 10;

/// A connected IPC stream.
pub trait IpcStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IpcStream for T {}

/// Directory holding the unix sockets: the first of `XDG_RUNTIME_DIR`,
/// `TMPDIR`, `TMP`, `TEMP` that is set, else `/tmp`.
#[cfg(unix)]
fn socket_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// Every socket path Discord might be listening on, in probe order.
#[cfg(unix)]
pub fn candidate_paths() -> Vec<PathBuf> {
    let dir = socket_dir(|key| std::env::var(key).ok());
    (0..IPC_SLOTS)
        .map(|n| dir.join(format!("discord-ipc-{n}")))
        .collect()
}

#[cfg(windows)]
pub fn candidate_paths() -> Vec<PathBuf> {
    (0..IPC_SLOTS)
        .map(|n| PathBuf::from(format!(r"\\?\pipe\discord-ipc-{n}")))
        .collect()
}

#[cfg(unix)]
async fn open(path: &std::path::Path) -> std::io::Result<Box<dyn IpcStream>> {
    let stream = tokio::net::UnixStream::connect(path).await?;
    Ok(Box::new(stream))
}

#[cfg(windows)]
async fn open(path: &std::path::Path) -> std::io::Result<Box<dyn IpcStream>> {
    let pipe = tokio::net::windows::named_pipe::ClientOptions::new().open(path)?;
    Ok(Box::new(pipe))
}

/// Connect to the first Discord IPC endpoint that accepts.
pub async fn connect() -> Result<Box<dyn IpcStream>, RpcError> {
    let mut last_error = None;
    for path in candidate_paths() {
        match open(&path).await {
            Ok(stream) => {
                debug!(path = %path.display(), "Connected to Discord IPC");
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(RpcError::Connect(match last_error {
        Some(e) => format!("no discord-ipc socket accepted a connection (last error: {e})"),
        None => "no discord-ipc socket candidates".to_string(),
    }))
}
