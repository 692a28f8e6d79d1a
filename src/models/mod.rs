//! Data shapes exchanged with the session list server.

pub mod announcement;
pub mod listing;
pub mod query;
pub mod update;

pub use announcement::SessionAnnouncement;
pub use listing::{
    AnnounceReply, JoinInfo, LeaseTerms, ListingCredential, ListingId, RefreshReply, SessionRecord,
};
pub use query::SessionQuery;
pub use update::{BatchEntry, BatchUpdateRequest, UpdateFields};

use serde_json::{Map, Value};

/// Rebuild every object in `value` with its keys in sorted order.
///
/// Request bodies go through this so they are reproducible in logs and tests
/// whatever map representation serde_json was built with.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
