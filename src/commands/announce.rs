//! Make a random test announcement.
//! Usage: sessionlist announce <url> [--host H] [--port P] [--protocol V] [--nsfm] [--private]
//!
//! Prints the server response; the output can be saved as a response file
//! for `sessionlist update`.

use anyhow::Result;

use super::print_and_check;
use crate::config::Config;
use crate::directory::{DirectoryClient, DirectoryResponse};
use crate::models::SessionAnnouncement;

/// Command line overrides for the announced session.
#[derive(Debug, Clone, Default)]
pub struct AnnounceOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<String>,
    pub nsfm: bool,
    pub private: bool,
}

/// Build the random announcement from config defaults and overrides.
pub fn build_announcement(config: &Config, options: &AnnounceOptions) -> SessionAnnouncement {
    let mut session = SessionAnnouncement::random(&config.announce)
        .with_nsfm(options.nsfm)
        .with_private(options.private);

    if let Some(host) = &options.host {
        session = session.with_host(host.as_str());
    }
    if let Some(port) = options.port {
        session = session.with_port(port);
    }
    if let Some(protocol) = &options.protocol {
        session = session.with_protocol(protocol.as_str());
    }
    session
}

pub fn execute(url: &str, config: &Config, options: &AnnounceOptions) -> Result<()> {
    let client = DirectoryClient::new(url, &config.http)?;
    let session = build_announcement(config, options);
    let response = client.announce(&session)?;

    print_and_check(&response, DirectoryResponse::is_ok)
}
