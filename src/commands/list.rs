//! Show the public session list.
//! Usage: sessionlist list <url> [--nsfm] [--protocol LIST] [--title TEXT] [--json]

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use super::to_pretty_json;
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::models::{SessionQuery, SessionRecord};

const HEADERS: [&str; 9] = [
    "Host", "Port", "Id", "Room", "Owner", "Users", "⚑", "Title", "Age",
];

pub fn execute(url: &str, config: &Config, query: &SessionQuery, json: bool) -> Result<()> {
    let client = DirectoryClient::new(url, &config.http)?;
    let response = client.query(query)?;
    if !response.is_success() {
        println!("{}", response.body);
        bail!("list server returned HTTP {}", response.status);
    }

    if json {
        let value: serde_json::Value = response
            .json()
            .context("Session list is not valid JSON")?;
        println!("{}", to_pretty_json(value)?);
    } else {
        let sessions: Vec<SessionRecord> = response
            .json()
            .context("Failed to parse session list")?;
        print!("{}", render_table(&sessions, Utc::now()));
    }
    Ok(())
}

/// `h:mm` elapsed since the session started, or `?` if unknown.
pub fn format_age(record: &SessionRecord, now: DateTime<Utc>) -> String {
    match record.started_at() {
        Some(started) => {
            let minutes = now.signed_duration_since(started).num_minutes().max(0);
            format!("{}:{:02}", minutes / 60, minutes % 60)
        }
        None => "?".to_string(),
    }
}

fn flags(record: &SessionRecord) -> String {
    let mut flags = String::new();
    if record.password {
        flags.push('P');
    }
    if record.nsfm {
        flags.push('X');
    }
    flags
}

fn row(record: &SessionRecord, now: DateTime<Utc>) -> [String; 9] {
    [
        record.host.clone(),
        record.port.to_string(),
        record.id.clone(),
        record.roomcode.clone().unwrap_or_default(),
        record.owner.clone(),
        record.users.to_string(),
        flags(record),
        record.title.clone(),
        format_age(record, now),
    ]
}

/// Render sessions as a plain column-aligned table.
pub fn render_table(sessions: &[SessionRecord], now: DateTime<Utc>) -> String {
    if sessions.is_empty() {
        return "(no sessions listed)\n".to_string();
    }

    let rows: Vec<[String; 9]> = sessions.iter().map(|s| row(s, now)).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join(" │ ").trim_end())
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let separator: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);

    let mut out = format_line(&header[..]);
    out.push_str(&"─".repeat(separator));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_line(&row[..]));
    }
    out
}
