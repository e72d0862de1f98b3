//! Scryfall client tests against a local scripted server.

mod common;

use std::time::{Duration, Instant};

use common::{scryfall_card, Canned, MockServer};
use mtga_deckbuilder::{DeckError, ScryfallClient};
use serde_json::json;

fn client(server: &MockServer) -> ScryfallClient {
    ScryfallClient::new(&server.url, Duration::from_secs(5))
        .unwrap()
        .with_requests_per_second(0.0)
}

fn not_found(details: &str) -> Canned {
    Canned::json(404, json!({ "object": "error", "code": "not_found", "details": details }))
}

// ---------------------------------------------------------------------------
// Single cards
// ---------------------------------------------------------------------------

#[test]
fn get_card_fetches_by_id() {
    let server = MockServer::bind().serve(vec![Canned::json(
        200,
        scryfall_card("abc", "Shock", 1.0, "Instant"),
    )]);

    let card = client(&server).get_card("abc").unwrap();
    assert_eq!(card.name, "Shock");
    assert_eq!(server.requests(), vec!["/cards/abc"]);
}

#[test]
fn get_card_by_name_selects_match_mode() {
    let server = MockServer::bind().serve(vec![
        Canned::json(200, scryfall_card("a", "Opt", 1.0, "Instant")),
        Canned::json(200, scryfall_card("a", "Opt", 1.0, "Instant")),
    ]);
    let client = client(&server);

    client.get_card_by_name("Opt", true).unwrap();
    client.get_card_by_name("opt", false).unwrap();

    let requests = server.requests();
    assert_eq!(requests[0], "/cards/named?exact=Opt");
    assert_eq!(requests[1], "/cards/named?fuzzy=opt");
}

#[test]
fn error_status_carries_details() {
    let server = MockServer::bind().serve(vec![not_found("No card found with the given ID")]);

    match client(&server).get_card("missing") {
        Err(DeckError::Scryfall { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "No card found with the given ID");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn error_without_json_body_uses_generic_message() {
    let server = MockServer::bind().serve(vec![Canned {
        status: 500,
        headers: Vec::new(),
        body: "oops".into(),
    }]);

    match client(&server).get_card("x") {
        Err(DeckError::Scryfall { status: 500, message }) => {
            assert_eq!(message, "Unknown error occurred")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[test]
fn too_many_requests_is_retried_after_delay() {
    let server = MockServer::bind().serve(vec![
        Canned::json(429, json!({ "details": "slow down" })).header("Retry-After", "0"),
        Canned::json(200, scryfall_card("abc", "Shock", 1.0, "Instant")),
    ]);

    let card = client(&server).get_card("abc").unwrap();
    assert_eq!(card.id, "abc");
    assert_eq!(server.requests().len(), 2);
}

#[test]
fn retries_stop_after_limit() {
    let server = MockServer::bind().serve(vec![
        Canned::json(429, json!({ "details": "slow down" })).header("Retry-After", "0"),
        Canned::json(429, json!({ "details": "slow down" })).header("Retry-After", "0"),
    ]);

    let err = client(&server)
        .with_max_retries(1)
        .get_card("abc")
        .unwrap_err();
    assert!(matches!(err, DeckError::Scryfall { status: 429, .. }));
    assert_eq!(server.requests().len(), 2);
}

#[test]
fn requests_are_spaced_by_rate_limit() {
    let card = scryfall_card("abc", "Shock", 1.0, "Instant");
    let server = MockServer::bind().serve(vec![
        Canned::json(200, card.clone()),
        Canned::json(200, card.clone()),
        Canned::json(200, card),
    ]);
    let client = client(&server).with_requests_per_second(20.0);

    let started = Instant::now();
    for _ in 0..3 {
        client.get_card("abc").unwrap();
    }
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn long_retry_after_is_capped() {
    let server = MockServer::bind().serve(vec![
        Canned::json(429, json!({ "details": "slow down" })).header("Retry-After", "3600"),
        Canned::json(200, scryfall_card("abc", "Shock", 1.0, "Instant")),
    ]);

    let started = Instant::now();
    let card = client(&server)
        .with_max_retry_wait(Duration::from_millis(50))
        .get_card("abc")
        .unwrap();
    assert_eq!(card.id, "abc");
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[test]
fn extreme_rates_do_not_panic() {
    let base = ScryfallClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

    let tiny = base.with_requests_per_second(1e-320);
    assert_eq!(tiny.request_interval(), Duration::from_secs(60));

    let slow = tiny.with_requests_per_second(0.001);
    assert_eq!(slow.request_interval(), Duration::from_secs(60));

    let unthrottled = slow.with_requests_per_second(f64::NAN);
    assert_eq!(unthrottled.request_interval(), Duration::ZERO);

    let fast = unthrottled.with_requests_per_second(f64::INFINITY);
    assert_eq!(fast.request_interval(), Duration::ZERO);

    let default = fast.with_requests_per_second(10.0);
    assert_eq!(default.request_interval(), Duration::from_millis(100));
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_follows_next_page() {
    let server = MockServer::bind();
    let next = format!("{}/cards/search?page=2&q=t%3Aelf", server.url);
    let server = server.serve(vec![
        Canned::json(
            200,
            json!({
                "object": "list",
                "has_more": true,
                "next_page": next,
                "data": [scryfall_card("a", "Llanowar Elves", 1.0, "Creature — Elf Druid")]
            }),
        ),
        Canned::json(
            200,
            json!({
                "object": "list",
                "has_more": false,
                "data": [scryfall_card("b", "Elvish Mystic", 1.0, "Creature — Elf Druid")]
            }),
        ),
    ]);

    let cards = client(&server).search("t:elf").unwrap();
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Llanowar Elves", "Elvish Mystic"]);

    let requests = server.requests();
    assert_eq!(requests[0], "/cards/search?q=t%3Aelf");
    assert_eq!(requests[1], "/cards/search?page=2&q=t%3Aelf");
}

#[test]
fn search_without_matches_is_empty() {
    let server = MockServer::bind().serve(vec![not_found("Your query didn't match any cards.")]);
    assert!(client(&server).search("t:nothing").unwrap().is_empty());
}
