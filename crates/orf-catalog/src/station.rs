/// One ORF radio channel.
///
/// `slug` is the audioapi identifier used in catalog addresses and upstream
/// URLs.  `loopstream_slug` is the channel name on the loopstream archive
/// host; stations without one carry no archive and are live-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub slug: &'static str,
    pub name: &'static str,
    pub loopstream_slug: Option<&'static str>,
}

pub const STATIONS: &[Station] = &[
    Station { slug: "oe1", name: "Ö1", loopstream_slug: Some("oe1") },
    Station { slug: "oe3", name: "Ö3", loopstream_slug: Some("oe3") },
    Station { slug: "fm4", name: "FM4", loopstream_slug: Some("fm4") },
    Station { slug: "campus", name: "Ö1 Campus", loopstream_slug: None },
    Station { slug: "bgl", name: "Radio Burgenland", loopstream_slug: Some("oe2b") },
    Station { slug: "ktn", name: "Radio Kärnten", loopstream_slug: Some("oe2k") },
    Station { slug: "noe", name: "Radio Niederösterreich", loopstream_slug: Some("oe2n") },
    Station { slug: "ooe", name: "Radio Oberösterreich", loopstream_slug: Some("oe2o") },
    Station { slug: "sbg", name: "Radio Salzburg", loopstream_slug: Some("oe2s") },
    Station { slug: "stm", name: "Radio Steiermark", loopstream_slug: Some("oe2st") },
    Station { slug: "tir", name: "Radio Tirol", loopstream_slug: Some("oe2t") },
    Station { slug: "vbg", name: "Radio Vorarlberg", loopstream_slug: Some("oe2v") },
    Station { slug: "wie", name: "Radio Wien", loopstream_slug: Some("oe2w") },
    Station { slug: "slo", name: "ORF Slovenski spored", loopstream_slug: None },
];

pub fn find(slug: &str) -> Option<&'static Station> {
    STATIONS.iter().find(|s| s.slug == slug)
}
