use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Listing identifier assigned by the server.
///
/// The server sends an integer, but the client never interprets the id beyond
/// building request paths. Whether it arrived as a JSON number or a string is
/// kept so it goes back out in the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId {
    text: String,
    numeric: bool,
}

impl ListingId {
    /// An id that is sent as a JSON string.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            text: id.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        Self {
            text: id.to_string(),
            numeric: true,
        }
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for ListingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.numeric, self.text.parse::<u64>()) {
            (true, Ok(numeric)) => serializer.serialize_u64(numeric),
            _ => serializer.serialize_str(&self.text),
        }
    }
}

impl<'de> Deserialize<'de> for ListingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ListingId::from(n),
            Raw::Text(s) => ListingId::new(s),
        })
    }
}

/// Listing id plus the update key that proves ownership of it.
///
/// The key is only ever checked by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCredential {
    pub id: ListingId,
    pub key: String,
}

impl ListingCredential {
    pub fn new(id: impl Into<ListingId>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }
}

/// Lease information returned by the server when a listing is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseTerms {
    pub expires_in_minutes: i64,
    pub message: Option<String>,
}

/// Success body of an announce request.
///
/// Every field is optional so a reply missing `id` or `key` can still be
/// parsed and reported as malformed instead of unparseable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnounceReply {
    #[serde(default)]
    pub id: Option<ListingId>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub roomcode: Option<String>,
    #[serde(default)]
    pub private: Option<bool>,
}

impl AnnounceReply {
    /// The credential, if the server sent both halves of it.
    pub fn credential(&self) -> Option<ListingCredential> {
        match (&self.id, &self.key) {
            (Some(id), Some(key)) => Some(ListingCredential::new(id.clone(), key.clone())),
            _ => None,
        }
    }

    /// Lease terms, falling back to `default_minutes` when `expires` is absent.
    pub fn lease(&self, default_minutes: i64) -> LeaseTerms {
        LeaseTerms {
            expires_in_minutes: self.expires.unwrap_or(default_minutes),
            message: self.message.clone().filter(|m| !m.is_empty()),
        }
    }
}

/// Success body of a single or batch refresh. Only the optional server
/// message is of interest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of the public session list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub host: String,
    pub port: u16,
    pub id: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub users: u32,
    #[serde(default)]
    pub usernames: Vec<String>,
    #[serde(default)]
    pub password: bool,
    #[serde(default)]
    pub nsfm: bool,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub started: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roomcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl SessionRecord {
    /// Parse the `started` timestamp (`YYYY-MM-DDTHH:MM:SSZ`).
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.started, "%Y-%m-%dT%H:%M:%SZ")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Connection details returned by a room code lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinInfo {
    pub host: String,
    pub port: u16,
    pub id: String,
}
