//! Read operations against the audioapi.orf.at JSON endpoints.
//!
//! Three upstream resources exist: a station's rolling archive index, one
//! day's entry inside it, and the full broadcast record of a single show.
//! Every fetch goes through the injected [`FetchCache`]; transport and
//! decode failures are logged here and surface as empty or absent results,
//! never as errors.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::error;

use crate::fetch::{Fetch, FetchCache};
use crate::normalize::{self, Day, Item, Show};

// ── Upstream record shapes ───────────────────────────────────────────────────

/// One day in a station's rolling archive index.
#[derive(Debug, Clone, Deserialize)]
pub struct DayRecord {
    pub day: i64,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    #[serde(default)]
    pub broadcasts: Vec<BroadcastRecord>,
}

/// One scheduled broadcast inside a day's index entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRecord {
    #[serde(rename = "programKey")]
    pub program_key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "scheduledISO")]
    pub scheduled_iso: String,
    /// False announces a schedule correction; the show may differ from the
    /// printed program.
    #[serde(rename = "isBroadcasted", default)]
    pub is_broadcasted: bool,
}

/// Full broadcast record of one show, items and stream segments included.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowRecord {
    #[serde(default)]
    pub title: Option<String>,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub moderator: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub streams: Vec<StreamSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub start: i64,
    #[serde(rename = "startISO", default)]
    pub start_iso: Option<String>,
    #[serde(default)]
    pub duration: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Performer.  Absent and null both occur upstream.
    #[serde(default)]
    pub interpreter: Option<String>,
}

/// One contiguous recorded audio file backing part of a show.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSegment {
    pub start: i64,
    #[serde(rename = "loopStreamId")]
    pub loop_stream_id: String,
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct CatalogClient<F> {
    cache: FetchCache<F>,
}

impl<F: Fetch> CatalogClient<F> {
    pub fn new(cache: FetchCache<F>) -> Self {
        Self { cache }
    }

    /// The station's rolling index of archived days.  Empty on failure.
    pub async fn archive_index(&self, station: &str) -> Vec<DayRecord> {
        let url = format!("http://audioapi.orf.at/{station}/json/2.0/broadcasts/");
        self.get_json(&url).await.unwrap_or_default()
    }

    /// The index entry whose day key matches `day_id`.
    pub async fn day_detail(&self, station: &str, day_id: &str) -> Option<DayRecord> {
        self.archive_index(station)
            .await
            .into_iter()
            .find(|rec| rec.day.to_string() == day_id)
    }

    /// The broadcast record for one show, or `None` when absent or
    /// undecodable.
    pub async fn show_detail(
        &self,
        station: &str,
        show_id: &str,
        day_id: &str,
    ) -> Option<ShowRecord> {
        let url =
            format!("https://audioapi.orf.at/{station}/api/json/4.0/broadcast/{show_id}/{day_id}");
        self.get_json(&url).await
    }

    /// Archived days as normalized entities.
    pub async fn days(&self, station: &str) -> Vec<Day> {
        self.archive_index(station)
            .await
            .iter()
            .map(normalize::day_entry)
            .collect()
    }

    /// Already-aired shows of one day, relative to `now`.
    pub async fn shows(&self, station: &str, day_id: &str, now: DateTime<Utc>) -> Vec<Show> {
        match self.day_detail(station, day_id).await {
            Some(rec) => normalize::shows_for_day(&rec, now),
            None => Vec::new(),
        }
    }

    /// Playable items of one show, filtered to `allowed_types`.
    pub async fn items(
        &self,
        station: &str,
        day_id: &str,
        show_id: &str,
        allowed_types: &[String],
    ) -> Vec<Item> {
        match self.show_detail(station, show_id, day_id).await {
            Some(rec) => normalize::items_for_show(&rec, day_id, allowed_types),
            None => Vec::new(),
        }
    }

    /// Re-derives the show's item list and picks the item whose id starts
    /// with the same start timestamp, so both `"start"` and `"start-end"`
    /// forms resolve.
    pub async fn item(
        &self,
        station: &str,
        day_id: &str,
        show_id: &str,
        item_id: &str,
        allowed_types: &[String],
    ) -> Option<Item> {
        let wanted = leading_start(item_id);
        self.items(station, day_id, show_id, allowed_types)
            .await
            .into_iter()
            .find(|item| leading_start(&item.id) == wanted)
    }

    /// Drops all cached upstream responses.
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        let content = match self.cache.get(url).await {
            Ok(content) => content,
            Err(e) => {
                error!("error fetching data from '{}': {:#}", url, e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("error decoding content received from '{}': {}", url, e);
                None
            }
        }
    }
}

fn leading_start(item_id: &str) -> &str {
    item_id.split_once('-').map_or(item_id, |(start, _)| start)
}
