//! Discord IPC client: handshake, `SET_ACTIVITY`, and close.

use std::time::Duration;

use async_trait::async_trait;
use beacon_common::{new_nonce, RpcError};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::activity::Activity;
use crate::codec::{read_frame, write_frame, Frame, Opcode};
use crate::payload::ActivityPayload;
use crate::transport::{self, IpcStream};
use crate::RichPresence;

/// Version of the IPC handshake payload.
const RPC_VERSION: u32 = 1;

/// How long to wait for Discord to answer a handshake or command.
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the local Discord IPC endpoint.
///
/// Holds at most one open stream. `login` opens it, `logout` closes it.
/// `set_activity` drops it after any failure other than a rejection, so
/// later calls report `NotConnected`.
pub struct RpcClient {
    stream: Option<Box<dyn IpcStream>>,
    pid: u32,
}

impl Default for RpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcClient {
    pub fn new() -> Self {
        Self {
            stream: None,
            pid: std::process::id(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Perform the handshake over an already-open stream and keep it.
    pub async fn login_over<S>(&mut self, stream: S, app_id: &str) -> Result<(), RpcError>
    where
        S: IpcStream + 'static,
    {
        let mut stream: Box<dyn IpcStream> = Box::new(stream);
        with_timeout("handshake", handshake(&mut stream, app_id)).await?;
        self.stream = Some(stream);
        Ok(())
    }
}

async fn with_timeout<T, F>(what: &str, fut: F) -> Result<T, RpcError>
where
    F: std::future::Future<Output = Result<T, RpcError>>,
{
    tokio::time::timeout(REPLY_TIMEOUT, fut)
        .await
        .map_err(|_| RpcError::Timeout(what.to_string()))?
}

/// Message from a close frame or an `ERROR` event's `data`.
fn error_message(body: &serde_json::Value) -> String {
    let code = body.get("code").and_then(|c| c.as_i64());
    let message = body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("no message");
    match code {
        Some(code) => format!("{message} (code {code})"),
        None => message.to_string(),
    }
}

/// Answer a ping; returns true if the frame was one.
async fn answer_ping(stream: &mut Box<dyn IpcStream>, frame: &Frame) -> Result<bool, RpcError> {
    if frame.opcode != Opcode::Ping {
        return Ok(false);
    }
    write_frame(stream, &Frame::new(Opcode::Pong, frame.body.clone())).await?;
    Ok(true)
}

async fn handshake(stream: &mut Box<dyn IpcStream>, app_id: &str) -> Result<(), RpcError> {
    let hello = Frame::new(
        Opcode::Handshake,
        json!({ "v": RPC_VERSION, "client_id": app_id }),
    );
    write_frame(stream, &hello).await?;

    loop {
        let frame = read_frame(stream).await?;
        if answer_ping(stream, &frame).await? {
            continue;
        }
        match frame.opcode {
            Opcode::Close => return Err(RpcError::Closed(error_message(&frame.body))),
            Opcode::Frame => match frame.str_field("evt") {
                Some("READY") => {
                    let user = frame.body["data"]["user"]["username"]
                        .as_str()
                        .unwrap_or("unknown");
                    info!(user = %user, "Discord IPC ready");
                    return Ok(());
                }
                Some("ERROR") => {
                    return Err(RpcError::Rejected {
                        command: "handshake".into(),
                        message: error_message(&frame.body["data"]),
                    })
                }
                other => debug!(evt = ?other, "Ignoring frame before READY"),
            },
            _ => {}
        }
    }
}

/// Send a command and wait for the reply carrying the same nonce.
async fn command(
    stream: &mut Box<dyn IpcStream>,
    cmd: &str,
    args: serde_json::Value,
) -> Result<Frame, RpcError> {
    let nonce = new_nonce();
    let request = Frame::new(
        Opcode::Frame,
        json!({ "cmd": cmd, "args": args, "nonce": nonce }),
    );
    write_frame(stream, &request).await?;

    loop {
        let frame = read_frame(stream).await?;
        if answer_ping(stream, &frame).await? {
            continue;
        }
        match frame.opcode {
            Opcode::Close => return Err(RpcError::Closed(error_message(&frame.body))),
            Opcode::Frame if frame.str_field("nonce") == Some(nonce.as_str()) => {
                if frame.str_field("evt") == Some("ERROR") {
                    return Err(RpcError::Rejected {
                        command: cmd.to_string(),
                        message: error_message(&frame.body["data"]),
                    });
                }
                return Ok(frame);
            }
            _ => debug!(opcode = ?frame.opcode, "Ignoring unrelated frame"),
        }
    }
}

#[async_trait]
impl RichPresence for RpcClient {
    async fn login(&mut self, app_id: &str) -> Result<(), RpcError> {
        let stream = transport::connect().await?;
        self.login_over(stream, app_id).await
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<(), RpcError> {
        let pid = self.pid;
        let stream = self.stream.as_mut().ok_or(RpcError::NotConnected)?;
        let args = json!({
            "pid": pid,
            "activity": ActivityPayload::from(activity),
        });
        match with_timeout("SET_ACTIVITY", command(stream, "SET_ACTIVITY", args)).await {
            Ok(_) => {
                debug!("Activity updated");
                Ok(())
            }
            // A rejection leaves the stream aligned; anything else may have
            // cut a frame in half.
            Err(e @ RpcError::Rejected { .. }) => Err(e),
            Err(e) => {
                warn!(error = %e, "Dropping Discord IPC stream");
                self.stream = None;
                Err(e)
            }
        }
    }

    async fn logout(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        if let Err(e) = write_frame(&mut stream, &Frame::new(Opcode::Close, json!({}))).await {
            warn!(error = %e, "Failed to send close frame to Discord");
        }
        if let Err(e) = stream.shutdown().await {
            debug!(error = %e, "IPC stream shutdown failed");
        }
        info!("Logged out of Discord IPC");
    }
}
