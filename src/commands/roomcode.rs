//! Look up session details by room code.
//! Usage: sessionlist roomcode <url> <code>

use anyhow::{bail, Context, Result};

use super::to_pretty_json;
use crate::config::Config;
use crate::directory::DirectoryClient;

pub fn execute(url: &str, config: &Config, code: &str) -> Result<()> {
    let client = DirectoryClient::new(url, &config.http)?;
    let response = client.lookup_by_room_code(code)?;

    let value: serde_json::Value = response
        .json()
        .with_context(|| {
            format!(
                "Unexpected reply (HTTP {}): {}",
                response.status, response.body
            )
        })?;
    println!("{}", to_pretty_json(value)?);

    if !response.is_success() {
        bail!("list server returned HTTP {}", response.status);
    }
    Ok(())
}
