use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::station;

/// Catalog configuration, supplied by the host.
///
/// Mirrors the extension's TOML surface: which stations appear at the root,
/// which archive item types are listed, whether after-midnight shows get the
/// sort-last time label, and the livestream quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Station slugs shown at the catalog root.
    #[serde(default = "default_stations")]
    pub stations: Vec<String>,
    /// Item type codes listed when browsing a show.
    #[serde(default = "default_archive_types")]
    pub archive_types: Vec<String>,
    /// Relabel 00:00-04:59 shows so they sort after the late-evening ones.
    #[serde(default)]
    pub afterhours: bool,
    /// Livestream quality, 128 or 192 kbit/s.
    #[serde(default = "default_bitrate")]
    pub livestream_bitrate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations: default_stations(),
            archive_types: default_archive_types(),
            afterhours: false,
            livestream_bitrate: default_bitrate(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !matches!(self.livestream_bitrate, 128 | 192) {
            bail!(
                "unsupported livestream bitrate {} (choices: 128, 192)",
                self.livestream_bitrate
            );
        }
        Ok(())
    }
}

fn default_stations() -> Vec<String> {
    station::STATIONS.iter().map(|s| s.slug.to_string()).collect()
}

fn default_archive_types() -> Vec<String> {
    ["M", "B", "BJ", "N", "S"].iter().map(|s| s.to_string()).collect()
}

fn default_bitrate() -> u32 {
    192
}
