//! Shared test fixtures for the deck builder integration tests.
//!
//! Provides a small sample catalog (`sample_catalog()`), a helper to build
//! mainboards from `(id, qty)` pairs, and `setup_sample_db()` which opens an
//! in-memory DuckDB connection with the sample cards stored. `MockServer`
//! replays scripted HTTP responses for the Scryfall client tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use mtga_deckbuilder::queries::CardStore;
use mtga_deckbuilder::{CardCatalog, CardRef, Connection};

pub fn bolt() -> CardRef {
    CardRef::new("bolt", "Lightning Bolt", 1.0, "Instant")
        .with_set("a25", "141")
        .with_colors(&["R"])
        .with_mana_cost("{R}")
}

pub fn bears() -> CardRef {
    let mut card = CardRef::new("bears", "Grizzly Bears", 2.0, "Creature — Bear")
        .with_set("M10", "172")
        .with_colors(&["G"])
        .with_mana_cost("{1}{G}");
    card.power = Some("2".into());
    card.toughness = Some("2".into());
    card
}

pub fn forest() -> CardRef {
    CardRef::new("forest", "Forest", 0.0, "Basic Land — Forest").with_set("M21", "274")
}

pub fn mountain() -> CardRef {
    CardRef::new("mountain", "Mountain", 0.0, "Basic Land — Mountain").with_set("M21", "269")
}

pub fn fireball() -> CardRef {
    CardRef::new("fireball", "Fireball", 1.0, "Sorcery")
        .with_set("M10", "136")
        .with_colors(&["R"])
        .with_mana_cost("{X}{R}")
}

pub fn counterspell() -> CardRef {
    let mut card = CardRef::new("counterspell", "Counterspell", 2.0, "Instant")
        .with_set("A25", "50")
        .with_colors(&["U"])
        .with_mana_cost("{U}{U}");
    card.rarity = "uncommon".into();
    card.oracle_text = Some("Counter target spell.".into());
    card
}

pub fn colossus() -> CardRef {
    CardRef::new("colossus", "Darksteel Colossus", 11.0, "Artifact Creature — Golem")
        .with_set("M10", "208")
        .with_mana_cost("{11}")
}

pub fn sample_cards() -> Vec<CardRef> {
    vec![
        bolt(),
        bears(),
        forest(),
        mountain(),
        fireball(),
        counterspell(),
        colossus(),
    ]
}

pub fn sample_catalog() -> CardCatalog {
    CardCatalog::from_cards(sample_cards())
}

/// Build a zone map from `(id, qty)` pairs.
pub fn board(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries
        .iter()
        .map(|(id, qty)| (id.to_string(), *qty))
        .collect()
}

/// In-memory database with every sample card stored.
pub fn setup_sample_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    CardStore::new(&conn).upsert_many(&sample_cards()).unwrap();
    conn
}

/// A Scryfall-shaped card object.
pub fn scryfall_card(id: &str, name: &str, cmc: f64, type_line: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "card",
        "id": id,
        "name": name,
        "cmc": cmc,
        "type_line": type_line,
        "color_identity": [],
        "rarity": "common",
        "set": "tst",
        "collector_number": "1",
        "image_uris": { "normal": format!("https://img.example/{}.jpg", id) }
    })
}

// ---------------------------------------------------------------------------
// Canned HTTP server
// ---------------------------------------------------------------------------

/// One scripted HTTP response.
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Canned {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Serves the scripted responses in order, one per connection, and records
/// each request target (`/cards/search?q=...`).
pub struct MockServer {
    listener: Option<TcpListener>,
    pub url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        Self {
            listener: Some(listener),
            url,
            requests: Arc::new(Mutex::new(Vec::new())),
            handle: None,
        }
    }

    pub fn serve(mut self, responses: Vec<Canned>) -> Self {
        let listener = self.listener.take().unwrap();
        let requests = self.requests.clone();
        self.handle = Some(std::thread::spawn(move || {
            for canned in responses {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }
                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                requests.lock().unwrap().push(target);

                let mut response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    canned.status,
                    canned.body.len()
                );
                for (name, value) in &canned.headers {
                    response.push_str(&format!("{}: {}\r\n", name, value));
                }
                response.push_str("\r\n");
                response.push_str(&canned.body);
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        }));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
