//! One fetch → parse → set-activity pass.

use beacon_api::{PresenceOutcome, PresenceSource};
use beacon_common::BeaconError;
use beacon_rpc::RichPresence;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API had nothing to show; Discord was not touched.
    NoPresence,
    /// The activity was sent to Discord.
    Applied,
}

/// Run a single update cycle.
///
/// Stops at the first failing step and returns its error unchanged. At
/// most one `set_activity` call is made, and only after a successful poll.
pub async fn run_cycle<S, R>(source: &S, rpc: &mut R) -> Result<CycleOutcome, BeaconError>
where
    S: PresenceSource + ?Sized,
    R: RichPresence + ?Sized,
{
    match source.poll().await? {
        PresenceOutcome::NoPresence => Ok(CycleOutcome::NoPresence),
        PresenceOutcome::Presence(activity) => {
            rpc.set_activity(&activity).await?;
            debug!(details = ?activity.details, state = ?activity.state, "Presence applied");
            Ok(CycleOutcome::Applied)
        }
    }
}
