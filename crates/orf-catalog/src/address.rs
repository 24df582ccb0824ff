//! The catalog's addressing grammar.
//!
//! Every browse, lookup, and playback entry point speaks addresses of the
//! form `orfradio:station[/live|/day[/show[/item]]]`.  [`Address`] is the
//! single source of truth for that grammar: parsing yields a typed variant
//! or a typed error, and [`std::fmt::Display`] is the exact inverse, so
//! `parse(serialize(a)) == a` holds for every variant.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const SCHEME: &str = "orfradio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Root,
    Station { station: String },
    Live { station: String },
    ArchiveDay { station: String, day_id: String },
    ArchiveShow { station: String, day_id: String, show_id: String },
    ArchiveItem { station: String, day_id: String, show_id: String, item_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid catalog address: {0:?}")]
pub struct AddressParseError(pub String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || AddressParseError(s.to_string());

        let path = s
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(fail)?;
        if path.is_empty() {
            return Ok(Address::Root);
        }

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() > 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(fail());
        }

        let station = parts[0].to_string();
        match parts.as_slice() {
            [_] => Ok(Address::Station { station }),
            [_, "live"] => Ok(Address::Live { station }),
            [_, day, rest @ ..] => {
                if !is_day_id(day) {
                    return Err(fail());
                }
                let day_id = day.to_string();
                match rest {
                    [] => Ok(Address::ArchiveDay { station, day_id }),
                    [show] => Ok(Address::ArchiveShow {
                        station,
                        day_id,
                        show_id: show.to_string(),
                    }),
                    [show, item] => Ok(Address::ArchiveItem {
                        station,
                        day_id,
                        show_id: show.to_string(),
                        item_id: item.to_string(),
                    }),
                    _ => Err(fail()),
                }
            }
            _ => Err(fail()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Root => write!(f, "{SCHEME}:"),
            Address::Station { station } => write!(f, "{SCHEME}:{station}"),
            Address::Live { station } => write!(f, "{SCHEME}:{station}/live"),
            Address::ArchiveDay { station, day_id } => {
                write!(f, "{SCHEME}:{station}/{day_id}")
            }
            Address::ArchiveShow { station, day_id, show_id } => {
                write!(f, "{SCHEME}:{station}/{day_id}/{show_id}")
            }
            Address::ArchiveItem { station, day_id, show_id, item_id } => {
                write!(f, "{SCHEME}:{station}/{day_id}/{show_id}/{item_id}")
            }
        }
    }
}

/// Day components are the 8-digit `YYYYMMDD` keys of the archive index.
/// This also keeps "live" unambiguous as a second path component.
fn is_day_id(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(address: Address) {
        let serialized = address.to_string();
        assert_eq!(serialized.parse::<Address>().unwrap(), address, "{serialized}");
    }

    #[test]
    fn roundtrip_all_variants() {
        roundtrip(Address::Root);
        roundtrip(Address::Station { station: "oe1".into() });
        roundtrip(Address::Live { station: "fm4".into() });
        roundtrip(Address::ArchiveDay {
            station: "oe1".into(),
            day_id: "20170604".into(),
        });
        roundtrip(Address::ArchiveShow {
            station: "oe1".into(),
            day_id: "20170604".into(),
            show_id: "475617".into(),
        });
        roundtrip(Address::ArchiveItem {
            station: "oe1".into(),
            day_id: "20170604".into(),
            show_id: "475617".into(),
            item_id: "1496566789000-1496566889000".into(),
        });
    }

    #[test]
    fn parse_root() {
        assert_eq!("orfradio:".parse::<Address>().unwrap(), Address::Root);
    }

    #[test]
    fn parse_live() {
        assert_eq!(
            "orfradio:oe1/live".parse::<Address>().unwrap(),
            Address::Live { station: "oe1".into() }
        );
    }

    #[test]
    fn parse_short_item_id() {
        assert_eq!(
            "orfradio:oe1/20170604/475617/1496566789000".parse::<Address>().unwrap(),
            Address::ArchiveItem {
                station: "oe1".into(),
                day_id: "20170604".into(),
                show_id: "475617".into(),
                item_id: "1496566789000".into(),
            }
        );
    }

    #[test]
    fn reject_wrong_scheme() {
        assert!("foo:bar".parse::<Address>().is_err());
        assert!("orfradios:oe1".parse::<Address>().is_err());
    }

    #[test]
    fn reject_empty_components() {
        assert!("orfradio:/live".parse::<Address>().is_err());
        assert!("orfradio:oe1//475617".parse::<Address>().is_err());
        assert!("orfradio:oe1/20170604/".parse::<Address>().is_err());
    }

    #[test]
    fn reject_bad_day_id() {
        assert!("orfradio:oe1/2017".parse::<Address>().is_err());
        assert!("orfradio:oe1/2017060a".parse::<Address>().is_err());
        assert!("orfradio:oe1/today".parse::<Address>().is_err());
    }

    #[test]
    fn reject_too_many_components() {
        assert!("orfradio:oe1/20170604/475617/100-200/extra"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn serialization_is_injective() {
        let addresses = [
            Address::Root,
            Address::Station { station: "oe1".into() },
            Address::Live { station: "oe1".into() },
            Address::ArchiveDay { station: "oe1".into(), day_id: "20170604".into() },
            Address::ArchiveShow {
                station: "oe1".into(),
                day_id: "20170604".into(),
                show_id: "475617".into(),
            },
            Address::ArchiveItem {
                station: "oe1".into(),
                day_id: "20170604".into(),
                show_id: "475617".into(),
                item_id: "100".into(),
            },
        ];
        for (i, a) in addresses.iter().enumerate() {
            for b in addresses.iter().skip(i + 1) {
                assert_ne!(a.to_string(), b.to_string());
            }
        }
    }
}
