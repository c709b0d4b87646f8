//! Discord Rich Presence over the local IPC socket.
//!
//! Provides the `Activity` model the presence API speaks, a frame codec
//! for the Discord IPC protocol, socket discovery, and an `RpcClient`
//! that performs the handshake, sets activities, and closes the session.

pub mod activity;
pub mod client;
pub mod codec;
pub mod payload;
pub mod transport;

use async_trait::async_trait;
use beacon_common::RpcError;

pub use activity::{Activity, Button, Party, Secrets, Timestamps};
pub use client::RpcClient;
pub use codec::{Frame, Opcode};

/// The operations beacon needs from a rich presence client.
#[async_trait]
pub trait RichPresence: Send {
    /// Open the session for `app_id`.
    async fn login(&mut self, app_id: &str) -> Result<(), RpcError>;

    /// Replace the displayed activity.
    async fn set_activity(&mut self, activity: &Activity) -> Result<(), RpcError>;

    /// Close the session. Errors are logged, not returned.
    async fn logout(&mut self);
}

#[async_trait]
impl<'a, R> RichPresence for &'a mut R
where
    R: RichPresence + ?Sized,
{
    async fn login(&mut self, app_id: &str) -> Result<(), RpcError> {
        (**self).login(app_id).await
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<(), RpcError> {
        (**self).set_activity(activity).await
    }

    async fn logout(&mut self) {
        (**self).logout().await
    }
}
