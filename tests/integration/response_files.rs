//! Saved announce replies fed back through the update pipeline

use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use sessionlist::commands::update::{self, UpdateOverrides};
use sessionlist::config::{AnnounceDefaults, Config};
use sessionlist::directory::DirectoryClient;
use sessionlist::models::SessionAnnouncement;
use sessionlist::response_file::{self, Action};

use super::helpers::FakeListServer;

/// Announce `count` sessions and save each raw reply as a response file.
fn announce_to_files(server: &FakeListServer, dir: &TempDir, count: usize) -> Vec<PathBuf> {
    let config = Config::default();
    let client = DirectoryClient::new(server.url(), &config.http).expect("valid url");

    (0..count)
        .map(|i| {
            let session = SessionAnnouncement::random(&AnnounceDefaults::default());
            let response = client.announce(&session).expect("announce reaches server");
            let path = dir.path().join(format!("session{i}.json"));
            fs::write(&path, &response.body).expect("write response file");
            path
        })
        .collect()
}

#[test]
fn test_update_one_file_merges_stored_updates() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    announce_to_files(&server, &dir, 1);

    // A hand-edited file with stored updates and the real credential
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("session0.json")).unwrap())
            .unwrap();
    fs::write(
        &path,
        json!({"id": saved["id"], "key": saved["key"], "updates": {"title": "stored", "users": 2}})
            .to_string(),
    )
    .unwrap();

    let overrides = UpdateOverrides {
        users: Some(9),
        ..UpdateOverrides::default()
    };
    update::execute(&[path], server.url(), &Config::default(), &overrides, false)
        .expect("update succeeds");

    let listing = server.listing(1).expect("listing present");
    assert_eq!(listing.fields["title"], "stored");
    assert_eq!(listing.fields["users"], 9);
}

#[test]
fn test_update_many_files_is_one_batch() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let files = announce_to_files(&server, &dir, 2);

    let overrides = UpdateOverrides {
        title: Some("batched".to_string()),
        ..UpdateOverrides::default()
    };
    update::execute(&files, server.url(), &Config::default(), &overrides, false)
        .expect("batch update succeeds");

    let puts: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.method == "PUT")
        .collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "sessions/");
    assert_eq!(server.listing(1).map(|l| l.fields["title"].clone()), Some(json!("batched")));
    assert_eq!(server.listing(2).map(|l| l.fields["title"].clone()), Some(json!("batched")));
}

#[test]
fn test_unlist_every_file() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let files = announce_to_files(&server, &dir, 2);

    let overrides = UpdateOverrides::default();
    update::execute(&files, server.url(), &Config::default(), &overrides, true)
        .expect("unlist succeeds");
    assert_eq!(server.listing_count(), 0);

    let again = update::execute(&files, server.url(), &Config::default(), &overrides, true);
    assert!(again.is_err());
}

#[test]
fn test_unlist_continues_past_a_rejected_file() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let files = announce_to_files(&server, &dir, 2);
    let overrides = UpdateOverrides::default();

    update::execute(&files[..1], server.url(), &Config::default(), &overrides, true)
        .expect("first unlist succeeds");

    let result = update::execute(&files, server.url(), &Config::default(), &overrides, true);
    assert!(result.is_err());
    assert_eq!(server.listing_count(), 0);

    let deletes = server
        .requests()
        .into_iter()
        .filter(|r| r.method == "DELETE")
        .count();
    assert_eq!(deletes, 3);
}

#[test]
fn test_bad_file_stops_before_any_request() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let mut files = announce_to_files(&server, &dir, 1);
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"key": "orphan"}"#).unwrap();
    files.push(bad);

    let err = update::execute(
        &files,
        server.url(),
        &Config::default(),
        &UpdateOverrides::default(),
        false,
    )
    .expect_err("missing id is rejected");
    assert!(err.to_string().contains("Listing ID not set"));

    let puts = server.requests().into_iter().filter(|r| r.method == "PUT").count();
    assert_eq!(puts, 0);
}

#[test]
fn test_pipeline_steps_compose() {
    let server = FakeListServer::start();
    let dir = TempDir::new().expect("temp dir");
    let files = announce_to_files(&server, &dir, 1);
    let client = DirectoryClient::new(server.url(), &Config::default().http).expect("valid url");

    let listings = response_file::load_all(&files).expect("files load");
    let overrides = UpdateOverrides {
        nsfm: Some("true".to_string()),
        ..UpdateOverrides::default()
    }
    .to_fields();
    let pending: Vec<_> = listings
        .iter()
        .map(|l| response_file::merge(l, &overrides))
        .collect();

    let responses = response_file::submit(&client, &pending, Action::Update).expect("submitted");
    assert_eq!(responses.len(), 1);
    assert!(responses[0].as_ref().expect("update sent").is_ok());
    assert_eq!(server.listing(1).map(|l| l.fields["nsfm"].clone()), Some(json!(true)));
}
