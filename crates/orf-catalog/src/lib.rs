//! Browsable catalog of ORF radio livestreams and archive recordings.
//!
//! The catalog is a three-level tree (station → day → show → item)
//! addressed by compact `orfradio:` strings and backed by the
//! audioapi.orf.at JSON endpoints.  [`Catalog`] is the entry point: it
//! decodes an [`Address`], fetches and normalizes the upstream records
//! through a TTL'd [`FetchCache`], and hands back browse entries, track
//! metadata, or a playable stream URL.
//!
//! The host supplies the transport (any [`Fetch`] implementation;
//! [`HttpFetch`] is the reqwest-backed default), a [`Config`], and a
//! tracing subscriber if it wants the logs.

pub mod address;
pub mod browse;
pub mod client;
pub mod config;
pub mod fetch;
pub mod normalize;
pub mod station;
pub mod stream;

pub use address::{Address, AddressParseError};
pub use browse::{Catalog, Entry, TrackDetail};
pub use config::Config;
pub use fetch::{Fetch, FetchCache, HttpFetch, RawResponse};
pub use stream::StreamError;
