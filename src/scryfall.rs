//! Blocking client for the Scryfall card API.
//!
//! Requests are spaced at least `1 / requests_per_second` apart. A `429 Too
//! Many Requests` answer is retried after the server's `Retry-After` delay,
//! capped at `max_retry_wait`, up to `max_retries` times. Every other non-success status becomes
//! [`DeckError::Scryfall`] carrying Scryfall's `details` text.

use std::cell::Cell;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;

use crate::catalog::normalize_card;
use crate::config;
use crate::error::{DeckError, Result};
use crate::models::CardRef;

const USER_AGENT: &str = concat!("mtga-deckbuilder/", env!("CARGO_PKG_VERSION"));

pub struct ScryfallClient {
    base_url: String,
    client: Client,
    min_interval: Duration,
    max_retries: u32,
    max_retry_wait: Duration,
    last_request: Cell<Option<Instant>>,
}

impl ScryfallClient {
    /// Create a client against `base_url` with the default rate limit.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            min_interval: Duration::from_secs_f64(1.0 / config::SCRYFALL_REQUESTS_PER_SECOND),
            max_retries: config::SCRYFALL_MAX_RETRIES,
            max_retry_wait: config::SCRYFALL_MAX_RETRY_WAIT,
            last_request: Cell::new(None),
        })
    }

    /// Override the request rate. Non-positive or NaN values disable
    /// throttling; very low rates are capped at one request per
    /// [`config::SCRYFALL_MAX_REQUEST_INTERVAL`].
    pub fn with_requests_per_second(mut self, rate: f64) -> Self {
        self.min_interval = if rate > 0.0 {
            Duration::try_from_secs_f64(1.0 / rate)
                .unwrap_or(config::SCRYFALL_MAX_REQUEST_INTERVAL)
                .min(config::SCRYFALL_MAX_REQUEST_INTERVAL)
        } else {
            Duration::ZERO
        };
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Longest `Retry-After` wait honored before retrying.
    pub fn with_max_retry_wait(mut self, wait: Duration) -> Self {
        self.max_retry_wait = wait;
        self
    }

    /// Minimum spacing between consecutive requests.
    pub fn request_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Endpoints ---------------------------------------------------------

    /// Fetch one card by Scryfall id.
    pub fn get_card(&self, id: &str) -> Result<CardRef> {
        let url = format!("{}/cards/{}", self.base_url, id);
        normalize_card(&self.request(&url, &[])?)
    }

    /// Fetch one card by name. `exact = false` uses Scryfall's fuzzy matching.
    pub fn get_card_by_name(&self, name: &str, exact: bool) -> Result<CardRef> {
        let url = format!("{}/cards/named", self.base_url);
        let mode = if exact { "exact" } else { "fuzzy" };
        normalize_card(&self.request(&url, &[(mode, name)])?)
    }

    /// Run a Scryfall search query, following every result page.
    pub fn search(&self, query: &str) -> Result<Vec<CardRef>> {
        self.search_raw(query)?.iter().map(normalize_card).collect()
    }

    /// Every card printed in a set.
    pub fn get_cards_by_set(&self, set_code: &str) -> Result<Vec<CardRef>> {
        self.search(&format!("set:{}", set_code))
    }

    pub fn standard_legal_cards(&self) -> Result<Vec<CardRef>> {
        self.search("legal:standard")
    }

    /// Like [`search`](Self::search) but returns the raw card objects.
    ///
    /// A query with no matches yields an empty list rather than an error.
    pub fn search_raw(&self, query: &str) -> Result<Vec<Value>> {
        let mut cards = Vec::new();
        let first = format!("{}/cards/search", self.base_url);

        let mut page = match self.request(&first, &[("q", query)]) {
            Ok(page) => page,
            Err(DeckError::Scryfall { status: 404, .. }) => return Ok(cards),
            Err(e) => return Err(e),
        };

        loop {
            if let Some(data) = page.get("data").and_then(Value::as_array) {
                cards.extend(data.iter().cloned());
            }
            let has_more = page.get("has_more").and_then(Value::as_bool).unwrap_or(false);
            let next = page.get("next_page").and_then(Value::as_str).map(str::to_string);
            match next {
                Some(url) if has_more => page = self.request(&url, &[])?,
                _ => break,
            }
        }

        tracing::info!(query, count = cards.len(), "scryfall search finished");
        Ok(cards)
    }

    // -- Transport ---------------------------------------------------------

    fn request(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let mut retries = 0;
        loop {
            self.throttle();
            tracing::debug!(url, "scryfall request");
            let mut req = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json");
            if !query.is_empty() {
                req = req.query(query);
            }
            let resp = req.send()?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS && retries < self.max_retries {
                let wait = retry_after(&resp).min(self.max_retry_wait);
                tracing::warn!(url, wait_secs = wait.as_secs(), "rate limited by scryfall");
                std::thread::sleep(wait);
                retries += 1;
                continue;
            }

            let body = resp.text()?;
            if !status.is_success() {
                return Err(DeckError::Scryfall {
                    status: status.as_u16(),
                    message: error_details(&body),
                });
            }
            return Ok(serde_json::from_str(&body)?);
        }
    }

    /// Sleep until `min_interval` has passed since the previous request.
    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

fn retry_after(resp: &Response) -> Duration {
    let secs = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(1);
    Duration::from_secs(secs)
}

fn error_details(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("details").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Unknown error occurred".to_string())
}
