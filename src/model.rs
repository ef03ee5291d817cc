//! Domain types for adventures and decoding of the API payload.
//!
//! The API returns adventures as a JSON object keyed by stringified ids, and
//! each adventure carries its participants in the same keyed-object shape.
//! Decoding flattens both into ordered vectors (see [`numeric_key_order`]).

use crate::error::FetchError;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// A user who joined an adventure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Participant {
    /// Unique participant id.
    pub id: i64,
    /// The participant's username.
    pub username: String,
}

/// A single adventure record as fetched from the API. Read-only; the full
/// list is replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adventure {
    /// Unique adventure id.
    pub id: i64,
    /// Id of the creating user.
    pub creator_id: i64,
    /// Username of the creating user.
    pub creator_username: String,
    /// Start date as a unix timestamp (seconds).
    pub date: i64,
    /// Free-text description.
    pub info: String,
    /// Number of users who joined.
    pub joined: u32,
    /// Users who joined, ordered by numeric map key.
    pub participants: Vec<Participant>,
    /// URL of the thumbnail image.
    pub image_url: String,
}

impl Adventure {
    /// Human-readable start date, e.g. `2015-07-24 18:00`.
    pub fn formatted_date(&self) -> String {
        match chrono::DateTime::from_timestamp(self.date, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => format!("@{}", self.date),
        }
    }

    /// First line of the description, for list rows.
    pub fn title_line(&self) -> &str {
        self.info.lines().next().unwrap_or("")
    }
}

/// Wire shape of one adventure entry. `participants` stays raw here because
/// the map needs key-ordered flattening before it becomes a vector.
#[derive(Debug, Deserialize)]
struct AdventureWire {
    id: i64,
    creator_id: i64,
    creator_username: String,
    date: i64,
    info: String,
    joined: u32,
    #[serde(rename = "static_image_url")]
    image_url: String,
    #[serde(default)]
    participants: serde_json::Map<String, Value>,
}

/// Orders JSON map keys numerically when both parse as integers; numeric keys
/// sort before non-numeric ones, and non-numeric keys fall back to
/// lexicographic order. The API keys its maps by stringified ids, so this
/// yields a stable id-ascending order.
pub fn numeric_key_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Decodes a full API response body into the adventure list.
///
/// Error branches, in order:
/// - body is not a JSON object → [`FetchError::Decode`]
/// - object contains an `"error"` key → [`FetchError::Server`] with the
///   server-provided message
/// - any entry fails to decode → [`FetchError::Decode`]
pub fn decode_adventures(body: &str) -> Result<Vec<Adventure>, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let map = root
        .as_object()
        .ok_or_else(|| FetchError::Decode("expected a JSON object".to_string()))?;

    if let Some(err) = map.get("error") {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(FetchError::Server(message));
    }

    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| numeric_key_order(a, b));

    entries
        .into_iter()
        .map(|(key, value)| {
            decode_one(value).map_err(|e| FetchError::Decode(format!("adventure {}: {}", key, e)))
        })
        .collect()
}

fn decode_one(value: &Value) -> Result<Adventure, serde_json::Error> {
    let wire: AdventureWire = serde_json::from_value(value.clone())?;

    let mut raw: Vec<(&String, &Value)> = wire.participants.iter().collect();
    raw.sort_by(|(a, _), (b, _)| numeric_key_order(a, b));
    let participants = raw
        .into_iter()
        .map(|(_, v)| serde_json::from_value::<Participant>(v.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Adventure {
        id: wire.id,
        creator_id: wire.creator_id,
        creator_username: wire.creator_username,
        date: wire.date,
        info: wire.info,
        joined: wire.joined,
        participants,
        image_url: wire.image_url,
    })
}
