//! Batched updates go out as one request

use sessionlist::batch::{BatchCoordinator, PendingUpdate};
use sessionlist::config::{AnnounceDefaults, HttpConfig};
use sessionlist::directory::DirectoryClient;
use sessionlist::error::BatchError;
use sessionlist::models::{AnnounceReply, ListingCredential, SessionAnnouncement, UpdateFields};

use super::helpers::FakeListServer;

fn announce_many(client: &DirectoryClient, count: usize) -> Vec<ListingCredential> {
    (0..count)
        .map(|_| {
            let session = SessionAnnouncement::random(&AnnounceDefaults::default());
            let reply: AnnounceReply = client
                .announce(&session)
                .expect("announce reaches server")
                .json()
                .expect("reply parses");
            reply.credential().expect("reply has credential")
        })
        .collect()
}

#[test]
fn test_batch_is_one_request_with_every_key() {
    let server = FakeListServer::start();
    let client = DirectoryClient::new(server.url(), &HttpConfig::default()).expect("valid url");
    let credentials = announce_many(&client, 3);

    let pending: Vec<PendingUpdate> = credentials
        .iter()
        .map(|c| PendingUpdate::new(c.clone(), UpdateFields::new().with_users(7)))
        .collect();
    let response = BatchCoordinator::new(&client)
        .submit(&pending)
        .expect("batch submitted");
    assert!(response.is_ok());

    let requests = server.requests();
    let updates: Vec<_> = requests.iter().filter(|r| r.method == "PUT").collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].path, "sessions/");
    assert_eq!(updates[0].update_key, None);

    let body = updates[0].body.as_ref().expect("batch has a body");
    let entries = body.as_object().expect("batch body is an object");
    assert_eq!(entries.len(), 3);
    for credential in &credentials {
        let entry = &entries[credential.id.as_str()];
        assert_eq!(entry["updatekey"], credential.key.as_str());
        assert_eq!(entry["users"], 7);
    }

    for id in 1..=3 {
        assert_eq!(server.listing(id).map(|l| l.refreshes), Some(1));
    }
}

#[test]
fn test_single_entry_uses_plain_update() {
    let server = FakeListServer::start();
    let client = DirectoryClient::new(server.url(), &HttpConfig::default()).expect("valid url");
    let credentials = announce_many(&client, 1);

    let pending = [PendingUpdate::new(credentials[0].clone(), UpdateFields::new())];
    let response = BatchCoordinator::new(&client)
        .submit(&pending)
        .expect("update submitted");
    assert!(response.is_ok());

    let request = server.requests().pop().expect("update recorded");
    assert_eq!(request.path, format!("sessions/{}", credentials[0].id));
    assert_eq!(request.update_key.as_deref(), Some(credentials[0].key.as_str()));
}

#[test]
fn test_empty_batch_sends_nothing() {
    let server = FakeListServer::start();
    let client = DirectoryClient::new(server.url(), &HttpConfig::default()).expect("valid url");

    let result = BatchCoordinator::new(&client).submit(&[]);
    assert!(matches!(result, Err(BatchError::Empty)));
    assert!(server.requests().is_empty());
}
