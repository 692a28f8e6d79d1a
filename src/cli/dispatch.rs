use anyhow::{Context, Result};
use sessionlist::commands::announce::AnnounceOptions;
use sessionlist::commands::update::UpdateOverrides;
use sessionlist::commands::{announce, list, roomcode, run, update};
use sessionlist::config::Config;
use sessionlist::models::SessionQuery;
use std::path::PathBuf;

use super::types::Commands;

pub fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Announce {
            url,
            host,
            port,
            protocol,
            nsfm,
            private,
        } => {
            let options = AnnounceOptions {
                host,
                port,
                protocol,
                nsfm,
                private,
            };
            announce::execute(&url, config, &options)
        }
        Commands::List {
            url,
            nsfm,
            protocol,
            title,
            json,
        } => {
            let query = SessionQuery {
                nsfm,
                protocol,
                title,
            };
            list::execute(&url, config, &query, json)
        }
        Commands::Roomcode { url, code } => roomcode::execute(&url, config, &code),
        Commands::Update {
            mut args,
            title,
            users,
            usernames,
            nsfm,
            password,
            unlist,
        } => {
            let url = args.pop().context("List server URL is required")?;
            let files: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();
            let overrides = UpdateOverrides {
                title,
                users,
                usernames,
                nsfm,
                password,
            };
            update::execute(&files, &url, config, &overrides, unlist)
        }
        Commands::Run { url, host } => {
            let options = AnnounceOptions {
                host,
                ..AnnounceOptions::default()
            };
            run::execute(&url, config, &options)
        }
    }
}
