//! Announcement response files.
//!
//! The output of `sessionlist announce` can be saved and handed back to
//! `sessionlist update` to change or remove the listing later. The file is a
//! JSON document like:
//!
//! ```json
//! { "id": 42, "key": "update key", "updates": { "title": "..." } }
//! ```
//!
//! `updates` is optional. Updating goes through three steps that each
//! produce a new value: [`load`] a file, [`merge`] command line overrides
//! into it, then [`submit`] the result.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::batch::{BatchCoordinator, PendingUpdate};
use crate::directory::{Directory, DirectoryResponse};
use crate::models::{ListingCredential, ListingId, UpdateFields};

#[derive(Debug, Deserialize)]
struct RawResponseFile {
    #[serde(default)]
    id: Option<ListingId>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    updates: UpdateFields,
}

/// A response file with its credential checked.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredListing {
    pub source: PathBuf,
    pub credential: ListingCredential,
    pub updates: UpdateFields,
}

/// Read and check one response file.
pub fn load(path: &Path) -> Result<StoredListing> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read response file: {}", path.display()))?;
    parse(path, &content)
}

/// Read several response files, stopping at the first bad one.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<StoredListing>> {
    paths.iter().map(|path| load(path)).collect()
}

fn parse(path: &Path, content: &str) -> Result<StoredListing> {
    let raw: RawResponseFile = serde_json::from_str(content)
        .with_context(|| format!("{}: not a valid response file", path.display()))?;

    let id = match raw.id {
        Some(id) if !id.is_empty() && id.as_str() != "0" => id,
        _ => bail!("{}: Listing ID not set in response file!", path.display()),
    };
    let key = match raw.key {
        Some(key) if !key.is_empty() => key,
        _ => bail!("{}: Update key not set in response file!", path.display()),
    };

    Ok(StoredListing {
        source: path.to_path_buf(),
        credential: ListingCredential::new(id, key),
        updates: raw.updates,
    })
}

/// Apply command line overrides on top of the file's stored updates.
pub fn merge(listing: &StoredListing, overrides: &UpdateFields) -> PendingUpdate {
    PendingUpdate::new(
        listing.credential.clone(),
        listing.updates.merged_with(overrides),
    )
}

/// What to do with the loaded listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Unlist,
}

/// Send the merged updates, or unlist every listing.
///
/// Updates go out as one request (batched when there is more than one
/// listing), and failing to send it is an error. Unlisting has no batch
/// form, so it is one request per listing; every listing is tried and each
/// gets its own result.
pub fn submit<D: Directory>(
    directory: &D,
    pending: &[PendingUpdate],
    action: Action,
) -> Result<Vec<Result<DirectoryResponse>>> {
    match action {
        Action::Update => {
            let response = BatchCoordinator::new(directory).submit(pending)?;
            Ok(vec![Ok(response)])
        }
        Action::Unlist => Ok(pending
            .iter()
            .map(|update| {
                directory
                    .unlist(&update.credential.id, &update.credential.key)
                    .with_context(|| format!("Failed to unlist {}", update.credential.id))
            })
            .collect()),
    }
}
