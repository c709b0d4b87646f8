//! Discord IPC framing.
//!
//! Every message is a little-endian `u32` opcode, a little-endian `u32`
//! body length, and a JSON body of that length.

use beacon_common::RpcError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are treated as a protocol error.
pub const MAX_FRAME_LEN: u32 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl TryFrom<u32> for Opcode {
    type Error = RpcError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Handshake),
            1 => Ok(Self::Frame),
            2 => Ok(Self::Close),
            3 => Ok(Self::Ping),
            4 => Ok(Self::Pong),
            other => Err(RpcError::Protocol(format!("unknown opcode {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub opcode: Opcode,
    pub body: serde_json::Value,
}

impl Frame {
    pub fn new(opcode: Opcode, body: serde_json::Value) -> Self {
        Self { opcode, body }
    }

    /// Encode to the on-wire byte layout.
    pub fn encode(&self) -> Result<Vec<u8>, RpcError> {
        let body = serde_json::to_vec(&self.body)
            .map_err(|e| RpcError::Protocol(format!("failed to encode frame: {e}")))?;
        let len = u32::try_from(body.len())
            .ok()
            .filter(|len| *len <= MAX_FRAME_LEN)
            .ok_or_else(|| RpcError::Protocol(format!("frame too large: {} bytes", body.len())))?;

        let mut buf = Vec::with_capacity(8 + body.len());
        buf.extend_from_slice(&(self.opcode as u32).to_le_bytes());
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// String field of the body, if present.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(|v| v.as_str())
    }
}

pub async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), RpcError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let bytes = frame.encode()?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_frame<R>(reader: &mut R) -> Result<Frame, RpcError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let opcode = Opcode::try_from(reader.read_u32_le().await?)?;
    let len = reader.read_u32_le().await?;
    if len > MAX_FRAME_LEN {
        return Err(RpcError::Protocol(format!("frame too large: {len} bytes")));
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;

    let body = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RpcError::Protocol(format!("invalid frame body: {e}")))?
    };
    Ok(Frame { opcode, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_layout() {
        let frame = Frame::new(Opcode::Handshake, json!({"v": 1}));
        let bytes = frame.encode().unwrap();
        assert_eq!(&bytes[0..4], &0u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &7u32.to_le_bytes());
        assert_eq!(&bytes[8..], br#"{"v":1}"#);
    }

    #[tokio::test]
    async fn write_then_read_over_duplex() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        let frame = Frame::new(Opcode::Frame, json!({"cmd": "SET_ACTIVITY", "nonce": "n1"}));
        write_frame(&mut a, &frame).await.unwrap();

        let read = read_frame(&mut b).await.unwrap();
        assert_eq!(read, frame);
        assert_eq!(read.str_field("nonce"), Some("n1"));
    }

    #[tokio::test]
    async fn rejects_unknown_opcode() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let err = read_frame(&mut bytes.as_slice()).await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
    }

    #[tokio::test]
    async fn rejects_oversized_length() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(MAX_FRAME_LEN + 1).to_le_bytes());
        let err = read_frame(&mut bytes.as_slice()).await.unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn truncated_body_is_io_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"{}");
        let err = read_frame(&mut bytes.as_slice()).await.unwrap_err();
        assert!(matches!(err, RpcError::Io(_)));
    }
}
