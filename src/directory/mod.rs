//! Session list server API.
//!
//! Every operation returns the HTTP status and raw body. Interpreting them is
//! left to the caller, since the server reports failures as ordinary HTTP
//! statuses with a JSON error body.

mod client;

pub use client::{normalize_base_url, DirectoryClient};

use serde::de::DeserializeOwned;

use crate::error::DirectoryError;
use crate::models::{BatchUpdateRequest, ListingId, SessionAnnouncement, UpdateFields};

/// Header carrying the update key on single listing requests.
pub const UPDATE_KEY_HEADER: &str = "X-Update-Key";

/// Status code and raw body of a list server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResponse {
    pub status: u16,
    pub body: String,
}

impl DirectoryResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status is exactly 200, which announce and refresh require.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Status is 200 or 204, the statuses an unlist may answer with.
    pub fn is_ok_or_no_content(&self) -> bool {
        matches!(self.status, 200 | 204)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// The list server operations that keep a listing alive.
///
/// Implemented by [`DirectoryClient`]; the lifecycle controller and batch
/// coordinator only depend on this trait.
pub trait Directory {
    fn announce(&self, session: &SessionAnnouncement)
        -> Result<DirectoryResponse, DirectoryError>;

    fn update(
        &self,
        id: &ListingId,
        update_key: &str,
        fields: &UpdateFields,
    ) -> Result<DirectoryResponse, DirectoryError>;

    fn unlist(&self, id: &ListingId, update_key: &str)
        -> Result<DirectoryResponse, DirectoryError>;

    fn batch_update(
        &self,
        batch: &BatchUpdateRequest,
    ) -> Result<DirectoryResponse, DirectoryError>;
}
