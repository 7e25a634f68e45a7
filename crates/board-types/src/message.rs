//! The message entity and its wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a message body.
pub const BODY_MAX_CHARS: usize = 250;

/// Maximum number of characters allowed in a username.
pub const USERNAME_MAX_CHARS: usize = 50;

/// One posted message, as stored and as served to clients.
///
/// `id` is assigned by the store on creation and never reused;
/// `created_at` is set once at insert and never modified afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub body: String,
    pub username: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Serde adapter for `created_at`: `YYYY-MM-DD HH:MM:SS`, UTC, second
/// precision, no timezone suffix.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}
