pub mod announce;
pub mod list;
pub mod roomcode;
pub mod run;
pub mod update;

use anyhow::{bail, Result};

use crate::directory::DirectoryResponse;

/// Print the raw response body and fail unless the status is acceptable.
pub(crate) fn print_and_check(
    response: &DirectoryResponse,
    accept: fn(&DirectoryResponse) -> bool,
) -> Result<()> {
    println!("{}", response.body);
    if !accept(response) {
        bail!("list server returned HTTP {}", response.status);
    }
    Ok(())
}

/// Pretty JSON with sorted keys for human consumption.
pub(crate) fn to_pretty_json(value: serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&crate::models::sort_keys(value))?)
}
