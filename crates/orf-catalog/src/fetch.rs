//! Transport layer: the [`Fetch`] primitive and the TTL'd [`FetchCache`].
//!
//! The upstream audioapi is slow and every browse step would otherwise hit
//! it again, so all network access goes through one cache instance keyed by
//! exact URL.  Concurrent requests for the same URL share a single in-flight
//! fetch; failures are reported but never cached, so the next caller retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::info;

/// Raw bytes plus the Content-Type header of one upstream response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// The transport primitive the whole catalog is written against.
///
/// Implementations only move bytes; charset handling and caching live in
/// [`FetchCache`].  Tests substitute a canned-response implementation.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RawResponse>> + Send;
}

// ── Default reqwest-backed transport ─────────────────────────────────────────

pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send().await.context("request failed")?;
        if !response.status().is_success() {
            bail!("request returned status {}", response.status());
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await.context("failed to read response body")?.to_vec();
        Ok(RawResponse { body, content_type })
    }
}

// ── Cache ────────────────────────────────────────────────────────────────────

struct Entry {
    text: String,
    fetched_at: Instant,
}

/// Memoizes decoded fetch results per URL for `ttl`.
///
/// Each URL gets its own async mutex slot, taken for the whole
/// check-fetch-store sequence: a second caller for the same URL parks on the
/// slot and then reads the fresh entry instead of fetching again.  Callers
/// for different URLs never contend beyond the brief map lock.
pub struct FetchCache<F> {
    fetch: F,
    ttl: Duration,
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Option<Entry>>>>>,
}

impl<F: Fetch> FetchCache<F> {
    pub fn new(fetch: F, ttl: Duration) -> Self {
        Self {
            fetch,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Decoded body for `url`, served from cache when younger than the TTL.
    pub async fn get(&self, url: &str) -> Result<String> {
        let slot = {
            let mut slots = self.slots.lock().unwrap();
            Arc::clone(slots.entry(url.to_string()).or_default())
        };

        let mut guard = slot.lock().await;
        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.text.clone());
            }
        }

        info!("fetching data from '{}'", url);
        let response = self
            .fetch
            .fetch(url)
            .await
            .with_context(|| format!("error fetching data from '{url}'"))?;
        let text = decode_body(&response)
            .with_context(|| format!("error decoding response from '{url}'"))?;
        *guard = Some(Entry { text: text.clone(), fetched_at: Instant::now() });
        Ok(text)
    }

    /// Drops every cached entry.  In-flight fetches complete into orphaned
    /// slots, so the next `get` for any URL hits the network again.
    pub fn invalidate_all(&self) {
        self.slots.lock().unwrap().clear();
    }
}

/// Decodes the body according to the Content-Type charset parameter.
/// UTF-8 is the default; the Latin-1 family is mapped byte-for-byte.  Any
/// other declared charset is an unreadable-encoding failure.
fn decode_body(response: &RawResponse) -> Result<String> {
    let charset = response.content_type.as_deref().and_then(charset_param);
    match charset.as_deref() {
        None | Some("utf-8") | Some("utf8") => {
            String::from_utf8(response.body.clone()).context("body is not valid UTF-8")
        }
        Some("iso-8859-1") | Some("latin-1") | Some("latin1") => {
            Ok(response.body.iter().map(|&b| b as char).collect())
        }
        Some(other) => bail!("unreadable charset '{other}'"),
    }
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}
