//! The polling loop.
//!
//! The scheduler has two phases with different error policies:
//!
//! - `Bootstrapping`: the first cycle. Failure is returned to the caller,
//!   which treats it as fatal; it doubles as a startup self-test.
//! - `Steady`: every later cycle. Failure is logged and the loop waits for
//!   the next tick.
//!
//! Cycles are awaited inline, so they never overlap. A cycle that outlasts
//! the poll interval delays the next tick rather than queueing a burst.

use std::future::Future;
use std::time::Duration;

use beacon_api::PresenceSource;
use beacon_common::BeaconError;
use beacon_rpc::RichPresence;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::cycle::{run_cycle, CycleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    Steady,
}

pub struct Scheduler<S, R> {
    source: S,
    rpc: R,
    poll_interval: Duration,
    phase: Phase,
}

impl<S, R> Scheduler<S, R>
where
    S: PresenceSource,
    R: RichPresence,
{
    pub fn new(source: S, rpc: R, poll_interval: Duration) -> Self {
        Self {
            source,
            rpc,
            poll_interval,
            phase: Phase::Bootstrapping,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn rpc_mut(&mut self) -> &mut R {
        &mut self.rpc
    }

    /// Run one cycle under the current phase's error policy.
    ///
    /// Only a `Bootstrapping` failure is returned; a successful cycle moves
    /// the scheduler to `Steady`.
    pub async fn tick(&mut self) -> Result<Option<CycleOutcome>, BeaconError> {
        let result = run_cycle(&self.source, &mut self.rpc).await;
        match (self.phase, result) {
            (Phase::Bootstrapping, Ok(outcome)) => {
                info!(?outcome, "Initial presence update succeeded");
                self.phase = Phase::Steady;
                Ok(Some(outcome))
            }
            (Phase::Bootstrapping, Err(e)) => Err(e),
            (Phase::Steady, Ok(outcome)) => Ok(Some(outcome)),
            (Phase::Steady, Err(e)) => {
                warn!(error = %e, "Failed to complete presence update");
                Ok(None)
            }
        }
    }

    /// Run the first cycle, then one per poll interval until `shutdown`
    /// resolves.
    ///
    /// Returns an error only if the first cycle fails. Shutdown abandons
    /// an in-flight cycle.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), BeaconError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tokio::select! {
            result = self.tick() => { result?; }
            _ = &mut shutdown => return Ok(()),
        }

        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => return Ok(()),
            }
            tokio::select! {
                result = self.tick() => { result?; }
                _ = &mut shutdown => return Ok(()),
            }
        }
    }
}
