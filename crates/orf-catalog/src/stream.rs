//! Maps catalog items and live channels to playable stream URLs.

use thiserror::Error;

use crate::client::{ShowRecord, StreamSegment};
use crate::station;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("unknown station '{0}'")]
    UnknownStation(String),
    #[error("unsupported livestream bitrate {0} (choices: 128, 192)")]
    UnsupportedBitrate(u32),
    #[error("malformed item id '{0}'")]
    MalformedItemId(String),
    #[error("no stream segment covers start {start}")]
    SegmentNotFound { start: i64 },
}

/// Livestream endpoint for a station at one of the two supported bitrates.
pub fn live_url(station_slug: &str, bitrate: u32) -> Result<String, StreamError> {
    let station = station::find(station_slug)
        .ok_or_else(|| StreamError::UnknownStation(station_slug.to_string()))?;
    let tier = match bitrate {
        128 => "q1a",
        192 => "q2a",
        other => return Err(StreamError::UnsupportedBitrate(other)),
    };
    Ok(format!("https://orf-live.ors-shoutcast.at/{}-{}", station.slug, tier))
}

/// Playback URL for one archive item of a fetched show record.
///
/// Returns `Ok("")` when the show has no stream segments yet: the show
/// exists but is not archived, which is a legitimate upstream state, not a
/// failure.
pub fn item_url(
    rec: &ShowRecord,
    stream_slug: &str,
    item_id: &str,
) -> Result<String, StreamError> {
    if rec.streams.is_empty() {
        return Ok(String::new());
    }
    let (segment, offset_start, offset_end) = locate_segment(&rec.streams, item_id)?;
    let offset_end = offset_end.map(|v| v.to_string()).unwrap_or_default();
    Ok(format!(
        "http://loopstream01.apa.at/?channel={}&shoutcast=0&id={}&offset={}&offsetende={}",
        stream_slug, segment.loop_stream_id, offset_start, offset_end
    ))
}

/// Finds the segment covering the item's start and the offsets into it.
///
/// Segments are contiguous recordings ordered by ascending start with no
/// explicit end, so the one recording at a given instant is the latest
/// whose own start is <= that instant; the scan runs back-to-front.
pub fn locate_segment<'a>(
    streams: &'a [StreamSegment],
    item_id: &str,
) -> Result<(&'a StreamSegment, i64, Option<i64>), StreamError> {
    let (start, end) = parse_item_id(item_id)?;
    let segment = streams
        .iter()
        .rev()
        .find(|s| s.start <= start)
        .ok_or(StreamError::SegmentNotFound { start })?;
    Ok((segment, start - segment.start, end.map(|e| e - segment.start)))
}

fn parse_item_id(item_id: &str) -> Result<(i64, Option<i64>), StreamError> {
    let malformed = || StreamError::MalformedItemId(item_id.to_string());
    match item_id.split_once('-') {
        Some((start, end)) => Ok((
            start.parse().map_err(|_| malformed())?,
            Some(end.parse().map_err(|_| malformed())?),
        )),
        None => Ok((item_id.parse().map_err(|_| malformed())?, None)),
    }
}
