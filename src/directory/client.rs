//! Blocking HTTP client for the session list server.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use super::{Directory, DirectoryResponse, UPDATE_KEY_HEADER};
use crate::config::HttpConfig;
use crate::error::DirectoryError;
use crate::models::{
    BatchUpdateRequest, ListingId, SessionAnnouncement, SessionQuery, UpdateFields,
};

/// Make sure the API root ends in a path separator so relative paths join
/// underneath it.
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Create an HTTP client with connect and total request timeouts so a
/// stalled server cannot hang the keep-alive loop.
fn create_http_client(config: &HttpConfig) -> Result<Client, DirectoryError> {
    Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(DirectoryError::Client)
}

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str, config: &HttpConfig) -> Result<Self, DirectoryError> {
        let base_url = normalize_base_url(base_url);
        Url::parse(&base_url).map_err(|e| DirectoryError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http: create_http_client(config)?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_url(&self, id: &ListingId) -> String {
        self.url(&format!("sessions/{id}"))
    }

    /// Create a new listing.
    pub fn announce(
        &self,
        session: &SessionAnnouncement,
    ) -> Result<DirectoryResponse, DirectoryError> {
        let body = session
            .to_request_body()
            .map_err(|source| DirectoryError::Encode {
                operation: "announce",
                source,
            })?;
        log_body("announce", &body);

        self.send("announce", self.http.post(self.url("sessions/")).json(&body))
    }

    /// Fetch the public session list.
    pub fn query(&self, query: &SessionQuery) -> Result<DirectoryResponse, DirectoryError> {
        let mut url = Url::parse(&self.url("sessions/")).map_err(|e| {
            DirectoryError::InvalidUrl {
                url: self.url("sessions/"),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .extend_pairs(query.to_pairs().iter().map(|(k, v)| (*k, v.as_str())));

        self.send("query", self.http.get(url))
    }

    /// Resolve a room code to connection details.
    pub fn lookup_by_room_code(&self, code: &str) -> Result<DirectoryResponse, DirectoryError> {
        self.send("room code lookup", self.http.get(self.url(&format!("join/{code}"))))
    }

    /// Change some fields of a listing and extend its lease. Empty `fields`
    /// is a plain heartbeat.
    pub fn update(
        &self,
        id: &ListingId,
        update_key: &str,
        fields: &UpdateFields,
    ) -> Result<DirectoryResponse, DirectoryError> {
        let body = fields.to_request_body();
        log_body("update", &body);

        self.send(
            "update",
            self.http
                .put(self.session_url(id))
                .header(UPDATE_KEY_HEADER, update_key)
                .json(&body),
        )
    }

    /// Refresh several listings in one request. Each entry carries its own key.
    pub fn batch_update(
        &self,
        batch: &BatchUpdateRequest,
    ) -> Result<DirectoryResponse, DirectoryError> {
        let body = batch.to_request_body();
        log_body("batch update", &body);

        self.send("batch update", self.http.put(self.url("sessions/")).json(&body))
    }

    /// Remove a listing.
    pub fn unlist(
        &self,
        id: &ListingId,
        update_key: &str,
    ) -> Result<DirectoryResponse, DirectoryError> {
        self.send(
            "unlist",
            self.http
                .delete(self.session_url(id))
                .header(UPDATE_KEY_HEADER, update_key),
        )
    }

    fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<DirectoryResponse, DirectoryError> {
        let response = request
            .send()
            .map_err(|source| DirectoryError::Transport { operation, source })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|source| DirectoryError::Transport { operation, source })?;

        debug!(operation, status, "list server replied");
        Ok(DirectoryResponse { status, body })
    }
}

fn log_body(operation: &str, body: &Value) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let pretty = serde_json::to_string_pretty(body).unwrap_or_default();
        debug!(operation, "request body:\n{pretty}");
    }
}

impl Directory for DirectoryClient {
    fn announce(
        &self,
        session: &SessionAnnouncement,
    ) -> Result<DirectoryResponse, DirectoryError> {
        DirectoryClient::announce(self, session)
    }

    fn update(
        &self,
        id: &ListingId,
        update_key: &str,
        fields: &UpdateFields,
    ) -> Result<DirectoryResponse, DirectoryError> {
        DirectoryClient::update(self, id, update_key, fields)
    }

    fn unlist(
        &self,
        id: &ListingId,
        update_key: &str,
    ) -> Result<DirectoryResponse, DirectoryError> {
        DirectoryClient::unlist(self, id, update_key)
    }

    fn batch_update(
        &self,
        batch: &BatchUpdateRequest,
    ) -> Result<DirectoryResponse, DirectoryError> {
        DirectoryClient::batch_update(self, batch)
    }
}
