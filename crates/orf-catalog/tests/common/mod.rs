#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use orf_catalog::fetch::{Fetch, RawResponse};

/// Canned-response transport.  Counts calls so tests can assert on cache
/// behaviour; an optional delay widens the race window for the
/// single-flight tests.
#[derive(Clone)]
pub struct MockFetch {
    responses: Arc<HashMap<String, String>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockFetch {
    pub fn new(responses: &[(&str, &str)]) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            ),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for MockFetch {
    async fn fetch(&self, url: &str) -> anyhow::Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.responses.get(url) {
            Some(body) => Ok(RawResponse {
                body: body.clone().into_bytes(),
                content_type: Some("application/json; charset=utf-8".to_string()),
            }),
            None => anyhow::bail!("no canned response for '{url}'"),
        }
    }
}

pub const ARCHIVE_INDEX_URL: &str = "http://audioapi.orf.at/oe1/json/2.0/broadcasts/";
pub const SHOW_RECORD_URL: &str =
    "https://audioapi.orf.at/oe1/api/json/4.0/broadcast/475617/20170604";
pub const UNARCHIVED_SHOW_URL: &str =
    "https://audioapi.orf.at/oe1/api/json/4.0/broadcast/475619/20170604";

/// Rolling archive index for oe1: a past-midnight broadcast, a regular
/// morning one, and a far-future entry that the aired filter must drop.
pub const ARCHIVE_INDEX_JSON: &str = r#"
[
    {
        "day": 20170604,
        "dateISO": "2017-06-04T00:00:00+02:00",
        "broadcasts": [
            {
                "programKey": "475600",
                "title": "Nachtjournal",
                "scheduledISO": "2017-06-04T00:05:00+02:00",
                "isBroadcasted": true
            },
            {
                "programKey": "475617",
                "title": "Nachrichten",
                "scheduledISO": "2017-06-04T10:59:49+02:00",
                "isBroadcasted": true
            },
            {
                "programKey": "475618",
                "title": "Zukunftsmusik",
                "scheduledISO": "2099-01-01T12:00:00+01:00",
                "isBroadcasted": true
            }
        ]
    }
]
"#;

/// Broadcast record 475617: three items at 100 s spacing, one recorded
/// stream segment covering the whole show.  The second item has a blank
/// title, the third a C1 mojibake byte.
pub const SHOW_RECORD_JSON: &str = r#"
{
    "title": "Nachrichten",
    "start": 1496566789000,
    "end": 1496567089000,
    "moderator": "Moderatorin",
    "items": [
        {
            "start": 1496566789000,
            "startISO": "2017-06-04T10:59:49+02:00",
            "duration": 100000,
            "type": "N",
            "title": "Nachrichten"
        },
        {
            "start": 1496566889000,
            "startISO": "2017-06-04T11:01:29+02:00",
            "duration": 100000,
            "type": "M",
            "title": "",
            "interpreter": "Wiener Philharmoniker"
        },
        {
            "start": 1496566989000,
            "startISO": "2017-06-04T11:03:09+02:00",
            "duration": 100000,
            "type": "M",
            "title": "Konzert\u0093abend"
        }
    ],
    "streams": [
        {
            "start": 1496566789000,
            "loopStreamId": "2017-06-04_1059_tl_51_7DaysSun6_95352.mp3"
        }
    ]
}
"#;

/// Broadcast record 475619: exists upstream but has no stream segments yet.
pub const UNARCHIVED_SHOW_JSON: &str = r#"
{
    "title": "Noch nicht archiviert",
    "start": 1496567089000,
    "end": 1496567389000,
    "items": [],
    "streams": []
}
"#;

pub fn fixture_fetch() -> MockFetch {
    MockFetch::new(&[
        (ARCHIVE_INDEX_URL, ARCHIVE_INDEX_JSON),
        (SHOW_RECORD_URL, SHOW_RECORD_JSON),
        (UNARCHIVED_SHOW_URL, UNARCHIVED_SHOW_JSON),
    ])
}
