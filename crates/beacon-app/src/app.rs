//! Everything after the configuration is loaded: connect, poll, log out.

use std::future::Future;

use beacon_api::PresenceSource;
use beacon_config::BeaconConfig;
use beacon_rpc::RichPresence;
use tracing::{debug, error, info};

use crate::bootstrap::Bootstrapper;
use crate::scheduler::Scheduler;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Shutdown was requested after startup, or `--once` succeeded.
    Completed,
    /// Shutdown was requested before Discord accepted a login.
    Interrupted,
    /// The first presence update failed.
    FirstCycleFailed,
    /// The configuration was missing or invalid.
    ConfigInvalid,
}

impl Exit {
    /// Process exit status.
    pub fn code(self) -> u8 {
        match self {
            Exit::Completed | Exit::Interrupted => 0,
            Exit::FirstCycleFailed => 1,
            Exit::ConfigInvalid => 2,
        }
    }
}

/// Connect to Discord, then poll `source` until `shutdown` resolves (or
/// for a single cycle when `once` is set).
///
/// Once a login has succeeded, `rpc` is logged out exactly once on every
/// path out of this function.
pub async fn serve<S, R, F>(
    config: &BeaconConfig,
    source: S,
    rpc: &mut R,
    once: bool,
    shutdown: F,
) -> Exit
where
    S: PresenceSource,
    R: RichPresence + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut bootstrapper = Bootstrapper::new(config.app_id.clone(), config.retry_interval);
    tokio::select! {
        _ = bootstrapper.connect(&mut *rpc) => {}
        _ = &mut shutdown => {
            info!("Shutdown requested before Discord connected");
            return Exit::Interrupted;
        }
    }
    debug!(state = ?bootstrapper.state(), "Bootstrap finished");

    let mut scheduler = Scheduler::new(source, &mut *rpc, config.poll_interval);
    let result = if once {
        scheduler.tick().await.map(|_| ())
    } else {
        scheduler.run(&mut shutdown).await
    };
    debug!(phase = ?scheduler.phase(), "Scheduler stopped");
    scheduler.rpc_mut().logout().await;

    match result {
        Ok(()) => {
            info!("Shutdown complete");
            Exit::Completed
        }
        Err(e) => {
            error!(error = %e, "Failed to set initial presence");
            Exit::FirstCycleFailed
        }
    }
}
