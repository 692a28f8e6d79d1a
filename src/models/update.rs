use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::listing::{ListingCredential, ListingId};
use super::sort_keys;

/// Field name of the per-entry update key in a batch refresh body.
pub const BATCH_KEY_FIELD: &str = "updatekey";

/// Partial set of announcement fields to change.
///
/// A field that is absent is left unchanged by the server. An empty set is a
/// plain heartbeat that only extends the lease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateFields(BTreeMap<String, Value>);

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Set an arbitrary field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with("title", title.into())
    }

    pub fn with_users(self, users: u32) -> Self {
        self.with("users", users)
    }

    pub fn with_usernames(self, usernames: Vec<String>) -> Self {
        self.with("usernames", usernames)
    }

    pub fn with_nsfm(self, nsfm: bool) -> Self {
        self.with("nsfm", nsfm)
    }

    pub fn with_password(self, password: bool) -> Self {
        self.with("password", password)
    }

    /// Combine two field sets; fields in `overrides` win.
    pub fn merged_with(&self, overrides: &UpdateFields) -> UpdateFields {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        UpdateFields(merged)
    }

    /// JSON request body with keys in sorted order.
    pub fn to_request_body(&self) -> Value {
        sort_keys(Value::Object(self.0.clone().into_iter().collect()))
    }
}

/// One listing's part of a batch refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub update_key: String,
    pub fields: UpdateFields,
}

/// Several listing updates sent in one request, keyed by listing id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdateRequest {
    entries: BTreeMap<ListingId, BatchEntry>,
}

impl BatchUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listing. Returns the entry it replaced if the id was already present.
    pub fn insert(
        &mut self,
        credential: &ListingCredential,
        fields: UpdateFields,
    ) -> Option<BatchEntry> {
        self.entries.insert(
            credential.id.clone(),
            BatchEntry {
                update_key: credential.key.clone(),
                fields,
            },
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &ListingId) -> Option<&BatchEntry> {
        self.entries.get(id)
    }

    /// `{id: {updatekey, ...fields}}` with keys in sorted order.
    ///
    /// The update key is written last so it cannot be shadowed by a field
    /// of the same name.
    pub fn to_request_body(&self) -> Value {
        let body: Map<String, Value> = self
            .entries
            .iter()
            .map(|(id, entry)| {
                let mut object: Map<String, Value> = entry
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                object.insert(
                    BATCH_KEY_FIELD.to_string(),
                    Value::String(entry.update_key.clone()),
                );
                (id.to_string(), Value::Object(object))
            })
            .collect();
        sort_keys(Value::Object(body))
    }
}
