//! Turns raw upstream records into stable catalog entities.
//!
//! The audioapi payloads are inconsistent: titles can be blank or carry
//! mis-encoded C1 control bytes, performers are absent or null, shows can
//! start recording before their first listed item, and some shows have no
//! usable items at all.  Everything here is a pure transform; source
//! records are never mutated.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use crate::client::{BroadcastRecord, DayRecord, ItemRecord, ShowRecord};

/// One archived day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub id: String,
    pub label: String,
}

/// One broadcast within a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub id: String,
    pub title: String,
    /// Scheduled start, `"HH:MM"` in the broadcast's own timezone.
    pub time: String,
    pub broadcasted: bool,
}

/// One individually playable unit of a show.
///
/// `id` is derived, never upstream-provided: the item's own start
/// timestamp, joined by a hyphen with the next item's start unless this is
/// the last item.  That makes ids unique within a show and lets the stream
/// locator recover the exact interval without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    /// ISO-8601 start time.
    pub time: String,
    pub artist: String,
    pub length_ms: i64,
    pub item_type: String,
    pub show_title: String,
    pub show_date: String,
}

pub fn day_entry(rec: &DayRecord) -> Day {
    let id = rec.day.to_string();
    let label = match DateTime::parse_from_rfc3339(&rec.date_iso) {
        Ok(date) => date.format("%a %d. %b %Y").to_string(),
        Err(e) => {
            warn!("unparsable dateISO {:?} in archive index: {}", rec.date_iso, e);
            id.clone()
        }
    };
    Day { id, label }
}

/// Shows of one day that have already started airing, in index order.
pub fn shows_for_day(rec: &DayRecord, now: DateTime<Utc>) -> Vec<Show> {
    rec.broadcasts
        .iter()
        .filter_map(|b| show_entry(b, now))
        .collect()
}

fn show_entry(rec: &BroadcastRecord, now: DateTime<Utc>) -> Option<Show> {
    let scheduled = match DateTime::parse_from_rfc3339(&rec.scheduled_iso) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                "skipping broadcast {}: unparsable scheduledISO {:?}: {}",
                rec.program_key, rec.scheduled_iso, e
            );
            return None;
        }
    };
    // scheduledISO carries the broadcast's own UTC offset, so this is the
    // timezone-aware "already aired" test.
    if scheduled.with_timezone(&Utc) >= now {
        return None;
    }
    let mut title = sanitize_title(rec.title.as_deref().unwrap_or_default());
    if !rec.is_broadcasted {
        title.push_str(" *");
    }
    Some(Show {
        id: rec.program_key.clone(),
        title,
        time: scheduled.format("%H:%M").to_string(),
        broadcasted: rec.is_broadcasted,
    })
}

/// Playable items of one show, filtered to `allowed_types`.
///
/// Ids and lengths are derived over the full sequence (synthetic leader
/// included) before filtering, so an excluded neighbour still bounds the
/// interval of the item before it.
pub fn items_for_show(rec: &ShowRecord, day_id: &str, allowed_types: &[String]) -> Vec<Item> {
    let show_title = sanitize_title(rec.title.as_deref().unwrap_or_default());
    let show_date = format_day_id(day_id);

    let mut sequence: Vec<ItemRecord> = Vec::with_capacity(rec.items.len() + 1);
    if let Some(first) = rec.items.first() {
        // The recording can start before the first listed item (station
        // jingle, overhang from the previous show).  A synthetic leader
        // keeps that stretch reachable.
        if rec.start < first.start {
            sequence.push(ItemRecord {
                start: rec.start,
                start_iso: None,
                duration: first.start - rec.start,
                item_type: "S".to_string(),
                title: None,
                interpreter: None,
            });
        }
    }
    sequence.extend(rec.items.iter().cloned());

    let items: Vec<Item> = sequence
        .iter()
        .enumerate()
        .filter(|(_, item)| allowed_types.iter().any(|t| t == &item.item_type))
        .map(|(i, item)| {
            let (id, length_ms) = match sequence.get(i + 1) {
                Some(next) => (
                    format!("{}-{}", item.start, next.start),
                    next.start - item.start,
                ),
                None => (item.start.to_string(), rec.end - item.start),
            };
            let title = match item.title.as_deref().filter(|t| !t.trim().is_empty()) {
                Some(t) => sanitize_title(t),
                None => generic_title(&item.item_type),
            };
            Item {
                id,
                title,
                time: item
                    .start_iso
                    .clone()
                    .unwrap_or_else(|| iso_from_millis(item.start)),
                artist: item.interpreter.clone().unwrap_or_default(),
                length_ms,
                item_type: item.item_type.clone(),
                show_title: show_title.clone(),
                show_date: show_date.clone(),
            }
        })
        .collect();

    if !items.is_empty() {
        return items;
    }

    // Nothing matched: no archive items, or only excluded types.  One item
    // spanning the whole show keeps it playable.
    vec![Item {
        id: format!("{}-{}", rec.start, rec.end),
        title: show_title.clone(),
        time: iso_from_millis(rec.start),
        artist: rec.moderator.clone().unwrap_or_default(),
        length_ms: rec.end - rec.start,
        item_type: String::new(),
        show_title,
        show_date,
    }]
}

/// Strips the Latin-1 C1 control range (U+0080..=U+009F).  Upstream titles
/// occasionally contain these mis-encoded bytes; they are removed, not
/// replaced.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !('\u{80}'..='\u{9f}').contains(c))
        .collect()
}

/// Shows scheduled between midnight and 05:00 belong to the previous
/// broadcast day.  With the after-hours flag set, `"0H:MM"` renders as
/// `"OH:MM"` so those entries sort after the late-evening ones.
pub fn afterhours_time(time: &str) -> String {
    let bytes = time.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'0' && (b'0'..=b'4').contains(&bytes[1]) && bytes[2] == b':'
    {
        format!("O{}", &time[1..])
    } else {
        time.to_string()
    }
}

fn generic_title(type_code: &str) -> String {
    let label = match type_code {
        "M" => "Musik",
        "B" => "Beitrag",
        "BJ" => "Journal",
        "N" => "Nachrichten",
        "J" => "Jingle",
        "W" => "Werbung",
        _ => "",
    };
    if label.is_empty() {
        "ohne Namen".to_string()
    } else {
        format!("{label} ohne Namen")
    }
}

fn iso_from_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn format_day_id(day_id: &str) -> String {
    if day_id.len() == 8 && day_id.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &day_id[..4], &day_id[4..6], &day_id[6..])
    } else {
        day_id.to_string()
    }
}
