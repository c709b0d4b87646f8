//! Startup connection to Discord IPC.
//!
//! Login is retried on a fixed interval until it succeeds. Discord not
//! running yet is the normal case at login, so failures are only warnings
//! and there is no attempt limit.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use beacon_common::retry::Attempt;
use beacon_common::{FixedDelay, RpcError};
use beacon_rpc::RichPresence;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// One login attempt against `rpc`.
struct Login<'a, R: ?Sized> {
    rpc: &'a mut R,
    app_id: &'a str,
}

#[async_trait]
impl<'a, R> Attempt for Login<'a, R>
where
    R: RichPresence + ?Sized,
{
    type Output = ();
    type Error = RpcError;

    async fn attempt(&mut self, _n: u32) -> Result<(), RpcError> {
        self.rpc.login(self.app_id).await
    }

    fn failed(&mut self, n: u32, error: &RpcError) {
        warn!(attempt = n, error = %error, "Connection to Discord RPC failed, retrying shortly");
    }
}

pub struct Bootstrapper {
    app_id: String,
    retry: FixedDelay,
    state: ConnectionState,
}

impl Bootstrapper {
    pub fn new(app_id: impl Into<String>, retry_interval: Duration) -> Self {
        Self {
            app_id: app_id.into(),
            retry: FixedDelay::new(retry_interval),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Log in, retrying until it succeeds. Returns the number of attempts.
    pub async fn connect<R>(&mut self, rpc: &mut R) -> u32
    where
        R: RichPresence + ?Sized,
    {
        self.connect_with_sleep(rpc, tokio::time::sleep).await
    }

    /// As [`connect`](Self::connect), with an injected sleep.
    pub async fn connect_with_sleep<R, S, F>(&mut self, rpc: &mut R, sleep: S) -> u32
    where
        R: RichPresence + ?Sized,
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        if self.state == ConnectionState::Connected {
            return 0;
        }

        let mut login = Login {
            rpc,
            app_id: &self.app_id,
        };
        let attempts = self.retry.run_with_sleep(&mut login, sleep).await.attempts;

        self.state = ConnectionState::Connected;
        info!(attempts, "Connected to Discord RPC");
        attempts
    }
}
