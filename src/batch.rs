//! Combining several listing updates into one request.
//!
//! The server applies each batch entry on its own but answers with a single
//! status. Callers only see that aggregate; a per-listing breakdown is not
//! available through this API.

use tracing::{info, warn};

use crate::directory::{Directory, DirectoryResponse};
use crate::error::BatchError;
use crate::models::{BatchUpdateRequest, ListingCredential, UpdateFields};

/// Fields to send for one listing, with the key that authorizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub credential: ListingCredential,
    pub fields: UpdateFields,
}

impl PendingUpdate {
    pub fn new(credential: ListingCredential, fields: UpdateFields) -> Self {
        Self { credential, fields }
    }
}

/// Build one batch request from pending updates, keyed by listing id.
///
/// If the same listing appears twice the later entry wins.
pub fn build_batch(pending: &[PendingUpdate]) -> BatchUpdateRequest {
    let mut batch = BatchUpdateRequest::new();
    for update in pending {
        if batch
            .insert(&update.credential, update.fields.clone())
            .is_some()
        {
            warn!(id = %update.credential.id, "listing appears more than once in batch");
        }
    }
    batch
}

pub struct BatchCoordinator<'a, D: Directory> {
    directory: &'a D,
}

impl<'a, D: Directory> BatchCoordinator<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Send the pending updates in as few requests as possible.
    ///
    /// A single listing goes out as a plain update; more than one becomes
    /// exactly one batch request.
    pub fn submit(&self, pending: &[PendingUpdate]) -> Result<DirectoryResponse, BatchError> {
        match pending {
            [] => Err(BatchError::Empty),
            [single] => {
                info!(id = %single.credential.id, "updating listing");
                Ok(self.directory.update(
                    &single.credential.id,
                    &single.credential.key,
                    &single.fields,
                )?)
            }
            _ => {
                let batch = build_batch(pending);
                info!(listings = batch.len(), "batch updating listings");
                Ok(self.directory.batch_update(&batch)?)
            }
        }
    }
}
