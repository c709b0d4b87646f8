//! Client for the presence HTTP API.
//!
//! `GET {base}/presence` answers with one of:
//! - `204 No Content`: nothing to show
//! - `401 Unauthorized`: the API cannot read the calendar right now
//! - `500 Internal Server Error`: the API failed
//! - anything else: a `{"presence": {...}}` JSON body
//!
//! [`PresenceApi`] fetches, [`parse`] classifies and decodes.

pub mod client;
pub mod parse;

use async_trait::async_trait;
use beacon_common::ApiError;

pub use client::{presence_url, PresenceApi, PRESENCE_PATH};
pub use parse::{
    classify, decode_presence, parse_presence, PresenceEnvelope, PresenceOutcome, StatusClass,
};

/// Something that can be polled for the current presence.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    async fn poll(&self) -> Result<PresenceOutcome, ApiError>;
}

#[async_trait]
impl PresenceSource for PresenceApi {
    async fn poll(&self) -> Result<PresenceOutcome, ApiError> {
        let response = self.fetch().await?;
        parse_presence(response).await
    }
}

#[cfg(test)]
mod test_server;
