//! In-memory presence source and RPC client for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use beacon_api::{PresenceOutcome, PresenceSource};
use beacon_common::{ApiError, RpcError};
use beacon_rpc::{Activity, RichPresence};

/// Replays scripted poll results, then `fallback` forever.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Result<PresenceOutcome, ApiError>>>,
    fallback: PresenceOutcome,
    polls: AtomicU32,
}

impl ScriptedSource {
    pub(crate) fn always(outcome: PresenceOutcome) -> Self {
        Self::with_script(Vec::new(), outcome)
    }

    pub(crate) fn with_script(
        script: Vec<Result<PresenceOutcome, ApiError>>,
        fallback: PresenceOutcome,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            polls: AtomicU32::new(0),
        }
    }

    pub(crate) fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresenceSource for ScriptedSource {
    async fn poll(&self) -> Result<PresenceOutcome, ApiError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Records every call; login fails `login_failures` times first.
#[derive(Default)]
pub(crate) struct FakeRpc {
    pub(crate) login_failures: u32,
    pub(crate) login_attempts: u32,
    pub(crate) connected: bool,
    pub(crate) reject_activity: bool,
    pub(crate) activities: Vec<Activity>,
    pub(crate) logouts: u32,
}

#[async_trait]
impl RichPresence for FakeRpc {
    async fn login(&mut self, _app_id: &str) -> Result<(), RpcError> {
        self.login_attempts += 1;
        if self.login_attempts <= self.login_failures {
            return Err(RpcError::Connect("discord is not running".into()));
        }
        self.connected = true;
        Ok(())
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<(), RpcError> {
        if self.reject_activity {
            return Err(RpcError::Rejected {
                command: "SET_ACTIVITY".into(),
                message: "invalid payload".into(),
            });
        }
        self.activities.push(activity.clone());
        Ok(())
    }

    async fn logout(&mut self) {
        self.logouts += 1;
        self.connected = false;
    }
}

pub(crate) fn meeting() -> Activity {
    Activity {
        details: Some("Weekly sync".into()),
        state: Some("Until 10:30".into()),
        ..Activity::default()
    }
}
