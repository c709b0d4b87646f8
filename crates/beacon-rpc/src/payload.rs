//! Mapping from [`Activity`] to the nested shape Discord's
//! `SET_ACTIVITY` command expects.

use serde::Serialize;

use crate::activity::{Activity, Button};

#[derive(Debug, Serialize, PartialEq)]
pub struct ActivityPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<PartyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<TimestampsPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsPayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct AssetsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PartyPayload {
    pub id: String,
    /// `[current, max]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
}

/// Unix milliseconds.
#[derive(Debug, Serialize, PartialEq)]
pub struct TimestampsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SecretsPayload {
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectate: Option<String>,
}

/// Discord rejects empty strings in most activity fields.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Both counts must be present and fit a `u32`, otherwise no size is sent.
fn party_size(players: Option<i64>, max_players: Option<i64>) -> Option<[u32; 2]> {
    let current = u32::try_from(players?).ok()?;
    let max = u32::try_from(max_players?).ok()?;
    Some([current, max])
}

impl From<&Activity> for ActivityPayload {
    fn from(activity: &Activity) -> Self {
        let assets = AssetsPayload {
            large_image: non_empty(&activity.large_image),
            large_text: non_empty(&activity.large_text),
            small_image: non_empty(&activity.small_image),
            small_text: non_empty(&activity.small_text),
        };
        let assets = (assets != AssetsPayload::default()).then_some(assets);

        let party = activity
            .party
            .as_ref()
            .filter(|p| !p.is_absent())
            .map(|p| PartyPayload {
                id: p.id.clone(),
                size: party_size(p.players, p.max_players),
            });

        let timestamps = activity
            .timestamps
            .as_ref()
            .filter(|t| t.start.is_some() || t.end.is_some())
            .map(|t| TimestampsPayload {
                start: t.start.map(|s| s.timestamp_millis()),
                end: t.end.map(|e| e.timestamp_millis()),
            });

        let secrets = activity.secrets.as_ref().map(|s| SecretsPayload {
            match_secret: non_empty(&s.match_secret),
            join: non_empty(&s.join),
            spectate: non_empty(&s.spectate),
        });

        Self {
            details: non_empty(&activity.details),
            state: non_empty(&activity.state),
            assets,
            party,
            timestamps,
            secrets,
            buttons: activity
                .buttons
                .iter()
                .filter(|b| !b.label.is_empty() && !b.url.is_empty())
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Party, Timestamps};
    use serde_json::json;

    #[test]
    fn empty_activity_serializes_to_empty_object() {
        let payload = ActivityPayload::from(&Activity::default());
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({}));
    }

    #[test]
    fn images_are_nested_under_assets() {
        let activity = Activity {
            details: Some("In a meeting".into()),
            large_image: Some("calendar".into()),
            large_text: Some("".into()),
            ..Activity::default()
        };
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(
            value,
            json!({
                "details": "In a meeting",
                "assets": { "large_image": "calendar" }
            })
        );
    }

    #[test]
    fn party_size_needs_both_counts() {
        let mut activity = Activity {
            party: Some(Party {
                id: "standup".into(),
                players: Some(3),
                max_players: Some(8),
            }),
            ..Activity::default()
        };
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(value["party"], json!({ "id": "standup", "size": [3, 8] }));

        activity.party.as_mut().unwrap().max_players = None;
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(value["party"], json!({ "id": "standup" }));
    }

    #[test]
    fn negative_party_count_drops_size() {
        let activity = Activity {
            party: Some(Party {
                id: "standup".into(),
                players: Some(-1),
                max_players: Some(8),
            }),
            ..Activity::default()
        };
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(value["party"], json!({ "id": "standup" }));
    }

    #[test]
    fn incomplete_buttons_are_omitted() {
        let activity = Activity {
            buttons: vec![
                Button {
                    label: "Join".into(),
                    url: "https://meet.example.com".into(),
                },
                Button {
                    label: "x".into(),
                    url: String::new(),
                },
            ],
            ..Activity::default()
        };
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(
            value["buttons"],
            json!([{ "label": "Join", "url": "https://meet.example.com" }])
        );
    }

    #[test]
    fn timestamps_are_unix_millis() {
        let start = "2026-10-15T09:00:00Z".parse().unwrap();
        let activity = Activity {
            timestamps: Some(Timestamps {
                start: Some(start),
                end: None,
            }),
            ..Activity::default()
        };
        let value = serde_json::to_value(ActivityPayload::from(&activity)).unwrap();
        assert_eq!(value["timestamps"], json!({ "start": 1_792_054_800_000_i64 }));
    }
}
