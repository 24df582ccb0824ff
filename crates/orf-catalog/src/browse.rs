//! The catalog facade: browse, lookup, and playback resolution.
//!
//! Every entry point first decodes its address through [`Address`], then
//! dispatches with an exhaustive match.  Browse and lookup never fail; they
//! degrade to empty results with a logged warning.  Playback resolution
//! returns `None` for anything unplayable so the host can skip the track.

use chrono::Utc;
use tracing::{info, warn};

use crate::address::Address;
use crate::client::CatalogClient;
use crate::config::Config;
use crate::fetch::{Fetch, FetchCache};
use crate::normalize::{self, Item};
use crate::station;
use crate::stream;

/// One node of the browse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory { address: String, label: String },
    Playable { address: String, label: String },
}

/// Full track metadata returned by lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDetail {
    pub address: String,
    pub name: String,
    pub artist: String,
    pub length_ms: i64,
    pub album: String,
    pub genre: String,
}

pub struct Catalog<F> {
    client: CatalogClient<F>,
    config: Config,
}

impl<F: Fetch> Catalog<F> {
    /// The cache is constructed by the host and injected once; nothing in
    /// the catalog holds other cross-request state.
    pub fn new(config: Config, cache: FetchCache<F>) -> Self {
        Self { client: CatalogClient::new(cache), config }
    }

    pub fn client(&self) -> &CatalogClient<F> {
        &self.client
    }

    pub async fn browse(&self, address: &str) -> Vec<Entry> {
        let address = match address.parse::<Address>() {
            Ok(a) => a,
            Err(e) => {
                warn!("{e}");
                return Vec::new();
            }
        };
        match &address {
            Address::Root => self.root_entries(),
            Address::Station { station } => self.browse_station(station).await,
            Address::ArchiveDay { station, day_id } => self.browse_day(station, day_id).await,
            Address::ArchiveShow { station, day_id, show_id } => {
                self.browse_show(station, day_id, show_id).await
            }
            Address::Live { .. } | Address::ArchiveItem { .. } => {
                warn!("browse called with address that does not support browsing: {address}");
                Vec::new()
            }
        }
    }

    pub async fn lookup(&self, address: &str) -> Vec<TrackDetail> {
        let address = match address.parse::<Address>() {
            Ok(a) => a,
            Err(e) => {
                warn!("{e}");
                return Vec::new();
            }
        };
        match &address {
            Address::Live { station } => {
                let name = station::find(station)
                    .map(|s| format!("{} Live", s.name))
                    .unwrap_or_else(|| "Live".to_string());
                vec![TrackDetail {
                    address: address.to_string(),
                    name,
                    artist: String::new(),
                    length_ms: 0,
                    album: String::new(),
                    genre: String::new(),
                }]
            }
            Address::ArchiveShow { station, day_id, show_id } => self
                .client
                .items(station, day_id, show_id, &self.config.archive_types)
                .await
                .iter()
                .map(|item| track_detail(station, day_id, show_id, item))
                .collect(),
            Address::ArchiveItem { station, day_id, show_id, item_id } => self
                .client
                .item(station, day_id, show_id, item_id, &self.config.archive_types)
                .await
                .map(|item| vec![track_detail(station, day_id, show_id, &item)])
                .unwrap_or_default(),
            Address::Root | Address::Station { .. } | Address::ArchiveDay { .. } => {
                warn!("lookup called with address that does not support lookup: {address}");
                Vec::new()
            }
        }
    }

    /// Playable URL for a live or archive-item address.
    pub async fn resolve(&self, address: &str) -> Option<String> {
        let address = match address.parse::<Address>() {
            Ok(a) => a,
            Err(e) => {
                warn!("{e}");
                return None;
            }
        };
        match &address {
            Address::Live { station } => {
                match stream::live_url(station, self.config.livestream_bitrate) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!("cannot resolve live stream for '{station}': {e}");
                        None
                    }
                }
            }
            Address::ArchiveItem { station, day_id, show_id, item_id } => {
                self.resolve_item(station, day_id, show_id, item_id).await
            }
            Address::Root
            | Address::Station { .. }
            | Address::ArchiveDay { .. }
            | Address::ArchiveShow { .. } => {
                warn!("resolve called with unplayable address: {address}");
                None
            }
        }
    }

    pub fn refresh(&self) {
        self.client.refresh();
    }

    fn root_entries(&self) -> Vec<Entry> {
        station::STATIONS
            .iter()
            .filter(|s| self.config.stations.iter().any(|slug| slug == s.slug))
            .map(|s| Entry::Directory {
                address: Address::Station { station: s.slug.to_string() }.to_string(),
                label: s.name.to_string(),
            })
            .collect()
    }

    async fn browse_station(&self, slug: &str) -> Vec<Entry> {
        let Some(station) = station::find(slug) else {
            warn!("browse called for unknown station '{slug}'");
            return Vec::new();
        };
        let live = Entry::Playable {
            address: Address::Live { station: slug.to_string() }.to_string(),
            label: format!("{} Live", station.name),
        };
        if station.loopstream_slug.is_none() {
            return vec![live];
        }
        let mut entries = vec![live];
        for day in self.client.days(slug).await {
            entries.push(Entry::Directory {
                address: Address::ArchiveDay {
                    station: slug.to_string(),
                    day_id: day.id,
                }
                .to_string(),
                label: day.label,
            });
        }
        entries
    }

    async fn browse_day(&self, slug: &str, day_id: &str) -> Vec<Entry> {
        self.client
            .shows(slug, day_id, Utc::now())
            .await
            .into_iter()
            .map(|show| {
                let time = if self.config.afterhours {
                    normalize::afterhours_time(&show.time)
                } else {
                    show.time.clone()
                };
                Entry::Directory {
                    address: Address::ArchiveShow {
                        station: slug.to_string(),
                        day_id: day_id.to_string(),
                        show_id: show.id,
                    }
                    .to_string(),
                    label: format!("{}: {}", time, show.title),
                }
            })
            .collect()
    }

    async fn browse_show(&self, slug: &str, day_id: &str, show_id: &str) -> Vec<Entry> {
        self.client
            .items(slug, day_id, show_id, &self.config.archive_types)
            .await
            .into_iter()
            .map(|item| Entry::Playable {
                address: Address::ArchiveItem {
                    station: slug.to_string(),
                    day_id: day_id.to_string(),
                    show_id: show_id.to_string(),
                    item_id: item.id.clone(),
                }
                .to_string(),
                label: item_label(&item),
            })
            .collect()
    }

    async fn resolve_item(
        &self,
        slug: &str,
        day_id: &str,
        show_id: &str,
        item_id: &str,
    ) -> Option<String> {
        let Some(stream_slug) = station::find(slug).and_then(|s| s.loopstream_slug) else {
            warn!("station '{slug}' has no archive stream");
            return None;
        };
        let Some(rec) = self.client.show_detail(slug, show_id, day_id).await else {
            warn!("broadcast record {show_id}/{day_id} unavailable");
            return None;
        };
        match stream::item_url(&rec, stream_slug, item_id) {
            Ok(url) if url.is_empty() => {
                info!("show {show_id}/{day_id} has no stream yet");
                None
            }
            Ok(url) => Some(url),
            Err(e) => {
                warn!("cannot resolve item '{item_id}' of {show_id}/{day_id}: {e}");
                None
            }
        }
    }
}

fn track_detail(station: &str, day_id: &str, show_id: &str, item: &Item) -> TrackDetail {
    TrackDetail {
        address: Address::ArchiveItem {
            station: station.to_string(),
            day_id: day_id.to_string(),
            show_id: show_id.to_string(),
            item_id: item.id.clone(),
        }
        .to_string(),
        name: item.title.clone(),
        artist: item.artist.clone(),
        length_ms: item.length_ms,
        album: format!("{} ({})", item.show_title, item.show_date),
        genre: item.item_type.clone(),
    }
}

fn item_label(item: &Item) -> String {
    match chrono::DateTime::parse_from_rfc3339(&item.time) {
        Ok(t) => format!("{}: {}", t.format("%H:%M"), item.title),
        Err(_) => item.title.clone(),
    }
}
