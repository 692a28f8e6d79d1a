//! Update or unlist announcements from saved response files.
//! Usage: sessionlist update <file>... <url> [--title T] [--users N] [--nsfm true|false] [--unlist]
//!
//! With more than one file the updates are sent as a single batch request.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::models::UpdateFields;
use crate::response_file::{self, Action};

/// Field overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct UpdateOverrides {
    pub title: Option<String>,
    pub users: Option<u32>,
    pub usernames: Option<String>,
    pub nsfm: Option<String>,
    pub password: Option<String>,
}

impl UpdateOverrides {
    /// Only flags that were given become fields. Boolean flags are true only
    /// for the literal `true`.
    pub fn to_fields(&self) -> UpdateFields {
        let mut fields = UpdateFields::new();
        if let Some(nsfm) = &self.nsfm {
            fields = fields.with_nsfm(nsfm == "true");
        }
        if let Some(password) = &self.password {
            fields = fields.with_password(password == "true");
        }
        if let Some(title) = &self.title {
            fields = fields.with_title(title.as_str());
        }
        if let Some(users) = self.users {
            fields = fields.with_users(users);
        }
        if let Some(usernames) = &self.usernames {
            fields = fields.with_usernames(
                usernames
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
        fields
    }
}

pub fn execute(
    files: &[PathBuf],
    url: &str,
    config: &Config,
    overrides: &UpdateOverrides,
    unlist: bool,
) -> Result<()> {
    let listings = response_file::load_all(files)?;
    let override_fields = overrides.to_fields();
    let pending: Vec<_> = listings
        .iter()
        .map(|listing| response_file::merge(listing, &override_fields))
        .collect();

    let client = DirectoryClient::new(url, &config.http)?;
    let action = if unlist { Action::Unlist } else { Action::Update };
    let results = response_file::submit(&client, &pending, action)?;

    let mut failed = 0;
    for result in &results {
        match result {
            Ok(response) => {
                println!("{}", response.body);
                if !response.is_ok_or_no_content() {
                    eprintln!("list server returned HTTP {}", response.status);
                    failed += 1;
                }
            }
            Err(e) => {
                eprintln!("{e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} request(s) failed", results.len());
    }
    Ok(())
}
