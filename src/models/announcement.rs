use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sort_keys;
use crate::config::AnnounceDefaults;

/// A session as announced to the list server.
///
/// `id` is the session identifier chosen by the announcing client, not the
/// listing id the server assigns (see [`ListingId`](super::ListingId)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAnnouncement {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub title: String,
    pub users: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usernames: Vec<String>,
    pub password: bool,
    pub nsfm: bool,
    pub owner: String,
    pub private: bool,
}

impl SessionAnnouncement {
    /// Create an announcement with a fresh session id and the configured defaults.
    pub fn new(defaults: &AnnounceDefaults) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            host: defaults.host.clone(),
            port: defaults.port,
            protocol: defaults.protocol.clone(),
            title: defaults.title.clone(),
            users: 1,
            usernames: Vec::new(),
            password: false,
            nsfm: false,
            owner: defaults.owner.clone(),
            private: false,
        }
    }

    /// Create a test announcement with a random user count and a
    /// one-in-three chance of being password protected.
    pub fn random(defaults: &AnnounceDefaults) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            users: rng.gen_range(1..=255),
            password: rng.gen_range(1..=3) == 1,
            ..Self::new(defaults)
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_nsfm(mut self, nsfm: bool) -> Self {
        self.nsfm = nsfm;
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// JSON request body with keys in sorted order.
    pub fn to_request_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self).map(sort_keys)
    }
}
