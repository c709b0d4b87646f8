//! Presence parser: status classification and payload decoding.

use std::fmt::Display;
use std::future::Future;

use beacon_common::ApiError;
use beacon_rpc::activity::fold_keys;
use beacon_rpc::Activity;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

const ENVELOPE_KEY: &str = "presence";

/// Wire wrapper around the activity.
#[derive(Debug, Deserialize)]
pub struct PresenceEnvelope {
    pub presence: Activity,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// Nothing to display; leave the current presence alone.
    NoPresence,
    Presence(Activity),
}

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 204: no presence right now.
    NoContent,
    /// 401: the API lacks calendar access.
    Unauthorized,
    /// 500: the API failed.
    ServerError,
    /// Anything else: decode the body.
    Decode,
}

/// Map a status code to its handling.
///
/// Only 204, 401 and 500 short-circuit. Every other code, including other
/// 4xx/5xx codes, is decoded as a presence body.
pub fn classify(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::NO_CONTENT => StatusClass::NoContent,
        StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
        StatusCode::INTERNAL_SERVER_ERROR => StatusClass::ServerError,
        _ => StatusClass::Decode,
    }
}

/// Decode a presence body and drop an empty party.
///
/// Keys are matched ignoring case, so `{"Presence":{"Details":..}}` decodes
/// the same as `{"presence":{"details":..}}`.
pub fn decode_presence(body: &[u8]) -> Result<Activity, ApiError> {
    let mut document: Value = serde_json::from_slice(body).map_err(decode_error)?;
    if let Value::Object(map) = &mut document {
        fold_envelope_key(map);
        if let Some(presence) = map.get_mut(ENVELOPE_KEY) {
            fold_keys(presence);
        }
    }
    let envelope: PresenceEnvelope = serde_json::from_value(document).map_err(decode_error)?;
    Ok(envelope.presence.sanitise())
}

fn fold_envelope_key(map: &mut Map<String, Value>) {
    if map.contains_key(ENVELOPE_KEY) {
        return;
    }
    let found = map
        .keys()
        .find(|key| key.eq_ignore_ascii_case(ENVELOPE_KEY))
        .cloned();
    if let Some(presence) = found.and_then(|key| map.remove(&key)) {
        map.insert(ENVELOPE_KEY.to_string(), presence);
    }
}

fn decode_error(e: serde_json::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

/// Parse a response from the presence API.
pub async fn parse_presence(response: reqwest::Response) -> Result<PresenceOutcome, ApiError> {
    let status = response.status();
    parse_with(status, || response.bytes()).await
}

/// Classify `status` and, only when a body is expected, read it with
/// `read_body` and decode it.
pub async fn parse_with<F, Fut, B, E>(
    status: StatusCode,
    read_body: F,
) -> Result<PresenceOutcome, ApiError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    match classify(status) {
        StatusClass::NoContent => {
            info!("No presence data available");
            Ok(PresenceOutcome::NoPresence)
        }
        StatusClass::Unauthorized => {
            warn!("Presence API not authorized to access calendar");
            Ok(PresenceOutcome::NoPresence)
        }
        StatusClass::ServerError => {
            error!("Presence API experienced an internal error");
            Ok(PresenceOutcome::NoPresence)
        }
        StatusClass::Decode => {
            let body = read_body().await.map_err(|e| ApiError::Io(e.to_string()))?;
            decode_presence(body.as_ref()).map(PresenceOutcome::Presence)
        }
    }
}
