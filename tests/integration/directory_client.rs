//! Single-listing operations over HTTP

use sessionlist::config::{AnnounceDefaults, HttpConfig};
use sessionlist::directory::DirectoryClient;
use sessionlist::models::{
    AnnounceReply, JoinInfo, ListingId, SessionAnnouncement, SessionQuery, SessionRecord,
    UpdateFields,
};

use super::helpers::FakeListServer;

fn client(server: &FakeListServer) -> DirectoryClient {
    DirectoryClient::new(server.url(), &HttpConfig::default()).expect("valid url")
}

fn session() -> SessionAnnouncement {
    SessionAnnouncement::new(&AnnounceDefaults::default())
        .with_host("test")
        .with_port(27750)
        .with_protocol("dp:4.20.1")
}

fn announce(client: &DirectoryClient) -> (ListingId, String) {
    let response = client.announce(&session()).expect("announce reaches server");
    assert_eq!(response.status, 200);
    let reply: AnnounceReply = response.json().expect("announce reply parses");
    let credential = reply.credential().expect("reply carries id and key");
    (credential.id, credential.key)
}

#[test]
fn test_announce_then_unlist() {
    let server = FakeListServer::start();
    let client = client(&server);

    let (id, key) = announce(&client);
    assert_eq!(server.listing_count(), 1);

    let response = client.unlist(&id, &key).expect("unlist reaches server");
    assert!(response.is_ok_or_no_content());
    assert_eq!(server.listing_count(), 0);

    let again = client.unlist(&id, &key).expect("second unlist reaches server");
    assert!(!again.is_success());
}

#[test]
fn test_announce_body_has_session_fields() {
    let server = FakeListServer::start();
    let client = client(&server);
    announce(&client);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "sessions/");

    let body = requests[0].body.as_ref().expect("announce has a JSON body");
    assert_eq!(body["host"], "test");
    assert_eq!(body["port"], 27750);
    assert_eq!(body["protocol"], "dp:4.20.1");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn test_heartbeat_extends_listing_with_key_header() {
    let server = FakeListServer::start();
    let client = client(&server);
    let (id, key) = announce(&client);

    let response = client
        .update(&id, &key, &UpdateFields::new())
        .expect("refresh reaches server");
    assert_eq!(response.status, 200);

    let refresh = server.requests().pop().expect("refresh recorded");
    assert_eq!(refresh.method, "PUT");
    assert_eq!(refresh.path, format!("sessions/{id}"));
    assert_eq!(refresh.update_key.as_deref(), Some(key.as_str()));
    assert_eq!(refresh.body, Some(serde_json::json!({})));

    let stored = server.listing(1).expect("listing still present");
    assert_eq!(stored.refreshes, 1);
}

#[test]
fn test_refresh_with_wrong_key_is_rejected() {
    let server = FakeListServer::start();
    let client = client(&server);
    let (id, _) = announce(&client);

    let response = client
        .update(&id, "not-the-key", &UpdateFields::new())
        .expect("refresh reaches server");
    assert!(!response.is_success());
    assert_eq!(server.listing(1).map(|l| l.refreshes), Some(0));
}

#[test]
fn test_update_changes_fields() {
    let server = FakeListServer::start();
    let client = client(&server);
    let (id, key) = announce(&client);

    let fields = UpdateFields::new().with_title("renamed").with_users(3);
    let response = client.update(&id, &key, &fields).expect("update reaches server");
    assert!(response.is_ok());

    let stored = server.listing(1).expect("listing present");
    assert_eq!(stored.fields["title"], "renamed");
    assert_eq!(stored.fields["users"], 3);
}

#[test]
fn test_room_code_lookup() {
    let server = FakeListServer::start();
    let client = client(&server);
    announce(&client);

    let response = client.lookup_by_room_code("ROOM1").expect("lookup reaches server");
    assert!(response.is_ok());
    let info: JoinInfo = response.json().expect("join info parses");
    assert_eq!(info.host, "test");
    assert_eq!(info.port, 27750);

    let missing = client.lookup_by_room_code("NOPE").expect("lookup reaches server");
    assert_eq!(missing.status, 404);
}

#[test]
fn test_query_sends_filters_and_parses_list() {
    let server = FakeListServer::start();
    let client = client(&server);
    announce(&client);

    let query = SessionQuery {
        nsfm: false,
        protocol: Some("dp:4.20.1".to_string()),
        title: None,
    };
    let response = client.query(&query).expect("query reaches server");
    assert!(response.is_ok());

    let sessions: Vec<SessionRecord> = response.json().expect("list parses");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].host, "test");
    assert!(sessions[0].started_at().is_some());

    let request = server.requests().pop().expect("query recorded");
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "sessions/");
    assert_eq!(request.query, "protocol=dp%3A4.20.1&title=&nsfm=false");
}

#[test]
fn test_query_encodes_nsfm_and_title() {
    let server = FakeListServer::start();
    let client = client(&server);

    let query = SessionQuery {
        nsfm: true,
        protocol: None,
        title: Some("Test: night".to_string()),
    };
    client.query(&query).expect("query reaches server");
    client
        .query(&SessionQuery::default())
        .expect("query reaches server");

    let queries: Vec<String> = server.requests().into_iter().map(|r| r.query).collect();
    assert_eq!(
        queries,
        [
            "protocol=&title=Test%3A+night&nsfm=true",
            "protocol=&title=&nsfm=false",
        ]
    );
}

#[test]
fn test_unreachable_server_is_transport_error() {
    let url = {
        let server = FakeListServer::start();
        server.url().to_string()
    };
    let client = DirectoryClient::new(&url, &HttpConfig::default()).expect("valid url");

    assert!(client.announce(&session()).is_err());
}
