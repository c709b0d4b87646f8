//! The activity record as the presence API sends it.
//!
//! Field names are matched ignoring case and underscores, so `large_image`,
//! `largeImage` and `LargeImage` all land in the same field. Everything is
//! optional; an activity with no fields is valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every key the activity model reads, nested records included.
const FIELD_NAMES: &[&str] = &[
    "details",
    "state",
    "large_image",
    "large_text",
    "small_image",
    "small_text",
    "party",
    "timestamps",
    "secrets",
    "buttons",
    "id",
    "players",
    "max_players",
    "start",
    "end",
    "match",
    "join",
    "spectate",
    "label",
    "url",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    /// Upper line of the presence card.
    pub details: Option<String>,
    /// Lower line of the presence card.
    pub state: Option<String>,
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub party: Option<Party>,
    pub timestamps: Option<Timestamps>,
    pub secrets: Option<Secrets>,
    pub buttons: Vec<Button>,
}

/// A joinable group. An empty `id` means there is no party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    pub id: String,
    pub players: Option<i64>,
    pub max_players: Option<i64>,
}

impl Party {
    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamps {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secrets {
    #[serde(rename = "match")]
    pub match_secret: Option<String>,
    pub join: Option<String>,
    pub spectate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    pub label: String,
    pub url: String,
}

impl Activity {
    /// Decode an activity from JSON, folding key spellings first.
    pub fn from_json(mut value: Value) -> Result<Self, serde_json::Error> {
        fold_keys(&mut value);
        serde_json::from_value(value)
    }

    /// Drop a party whose id is empty.
    ///
    /// Discord refuses a `SET_ACTIVITY` whose party has an empty id, so
    /// such a party must be removed entirely rather than sent as-is.
    pub fn sanitise(mut self) -> Self {
        if self.party.as_ref().is_some_and(Party::is_absent) {
            self.party = None;
        }
        self
    }
}

/// Rewrite object keys, recursively, to the matching name in
/// [`FIELD_NAMES`]. Unknown keys are left alone.
pub fn fold_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, mut child) in std::mem::take(map) {
                fold_keys(&mut child);
                let key = canonical_field(&key).map_or(key, str::to_string);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(fold_keys),
        _ => {}
    }
}

fn canonical_field(key: &str) -> Option<&'static str> {
    let wanted = squash(key);
    FIELD_NAMES
        .iter()
        .copied()
        .find(|name| squash(name) == wanted)
}

fn squash(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_empty_activity() {
        let activity: Activity = serde_json::from_str("{}").unwrap();
        assert_eq!(activity, Activity::default());
    }

    #[test]
    fn accepts_camel_case_keys() {
        let activity = Activity::from_json(serde_json::json!({
            "largeImage": "calendar",
            "smallText": "busy",
            "party": { "id": "p", "maxPlayers": 4 }
        }))
        .unwrap();
        assert_eq!(activity.large_image.as_deref(), Some("calendar"));
        assert_eq!(activity.small_text.as_deref(), Some("busy"));
        assert_eq!(activity.party.unwrap().max_players, Some(4));
    }

    #[test]
    fn accepts_pascal_case_keys() {
        let activity = Activity::from_json(serde_json::json!({
            "Details": "Design review",
            "LARGEIMAGE": "cal",
            "Party": { "ID": "abc123", "Players": 1, "MaxPlayers": 4 },
            "Timestamps": { "Start": "2026-10-15T09:00:00Z" },
            "Secrets": { "Match": "m1" },
            "Buttons": [{ "Label": "Join", "Url": "https://meet.example.com" }]
        }))
        .unwrap();
        assert_eq!(activity.details.as_deref(), Some("Design review"));
        assert_eq!(activity.large_image.as_deref(), Some("cal"));
        assert_eq!(
            activity.party,
            Some(Party {
                id: "abc123".into(),
                players: Some(1),
                max_players: Some(4),
            })
        );
        assert_eq!(
            activity.timestamps.unwrap().start.unwrap().timestamp(),
            1_792_054_800
        );
        assert_eq!(activity.secrets.unwrap().match_secret.as_deref(), Some("m1"));
        assert_eq!(activity.buttons[0].url, "https://meet.example.com");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let activity = Activity::from_json(serde_json::json!({
            "Details": "Focus",
            "Instance": true
        }))
        .unwrap();
        assert_eq!(activity.details.as_deref(), Some("Focus"));
    }

    #[test]
    fn negative_party_counts_decode() {
        let activity = Activity::from_json(serde_json::json!({
            "party": { "id": "p", "players": -1 }
        }))
        .unwrap();
        assert_eq!(activity.party.unwrap().players, Some(-1));
    }

    #[test]
    fn button_fields_default_to_empty() {
        let activity = Activity::from_json(serde_json::json!({
            "buttons": [{ "label": "x" }]
        }))
        .unwrap();
        assert_eq!(
            activity.buttons,
            vec![Button {
                label: "x".into(),
                url: String::new(),
            }]
        );
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let activity: Activity = serde_json::from_str(
            r#"{"timestamps":{"start":"2026-10-15T09:00:00Z","end":"2026-10-15T10:30:00+00:00"}}"#,
        )
        .unwrap();
        let ts = activity.timestamps.unwrap();
        assert_eq!(ts.start.unwrap().timestamp(), 1_792_054_800);
        assert_eq!(ts.end.unwrap().timestamp(), 1_792_060_200);
    }

    #[test]
    fn sanitise_removes_empty_party() {
        let activity = Activity {
            party: Some(Party::default()),
            ..Activity::default()
        };
        assert_eq!(activity.sanitise().party, None);
    }

    #[test]
    fn sanitise_keeps_real_party() {
        let party = Party {
            id: "abc123".into(),
            players: Some(1),
            max_players: Some(3),
        };
        let activity = Activity {
            party: Some(party.clone()),
            ..Activity::default()
        };
        assert_eq!(activity.sanitise().party, Some(party));
    }
}
