use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::constants::THUMB_SIZES;
use crate::utils::format_decimal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// One entry of the search API response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ImageRecord {
    pub key: String,
    pub image_url: String,
    pub lat: f64,
    pub lon: f64,
    /// Compass angle of the camera, degrees from true north.
    pub ca: f64,
}

impl ImageRecord {
    pub fn from_json(value: &Value) -> Result<Self> {
        let record = Self::deserialize(value).context("Malformed image record")?;
        if record.key.trim().is_empty() {
            bail!("Image record has an empty key");
        }
        if record.key.contains(['/', '\\']) || record.key.contains("..") {
            bail!("Image key {:?} is not a plain file name", record.key);
        }
        Ok(record)
    }

    pub fn filename(&self) -> String {
        format!("{}.jpg", self.key)
    }

    pub fn thumbnail_url(&self, size: ThumbSize) -> String {
        format!("{}{}", self.image_url, size.url_suffix())
    }

    pub fn downloaded_entry(&self) -> DownloadedEntry {
        DownloadedEntry {
            filename: self.filename(),
            lat: format_decimal(self.lat),
            lon: format_decimal(self.lon),
        }
    }
}

/// Name a raw record for log lines, even when it failed to decode.
pub fn record_label(index: usize, value: &Value) -> String {
    value
        .get("key")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(|key| format!("{key}.jpg"))
        .unwrap_or_else(|| format!("record #{index}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadedEntry {
    pub filename: String,
    pub lat: String,
    pub lon: String,
}

impl DownloadedEntry {
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.filename, self.lat, self.lon)
    }
}

/// Pixel width of a thumbnail rendition offered by the image host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThumbSize {
    Px320,
    Px640,
    #[default]
    Px1024,
    Px2048,
}

impl ThumbSize {
    pub fn pixels(self) -> u16 {
        match self {
            ThumbSize::Px320 => 320,
            ThumbSize::Px640 => 640,
            ThumbSize::Px1024 => 1024,
            ThumbSize::Px2048 => 2048,
        }
    }

    pub fn from_pixels(pixels: u16) -> Result<Self> {
        match pixels {
            320 => Ok(ThumbSize::Px320),
            640 => Ok(ThumbSize::Px640),
            1024 => Ok(ThumbSize::Px1024),
            2048 => Ok(ThumbSize::Px2048),
            other => Err(anyhow!(
                "Unsupported thumbnail size {other}; expected one of {THUMB_SIZES:?}"
            )),
        }
    }

    pub fn url_suffix(self) -> String {
        format!("thumb-{}.jpg", self.pixels())
    }
}

impl FromStr for ThumbSize {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let pixels = value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("Failed to parse thumbnail size {value:?}"))?;
        Self::from_pixels(pixels)
    }
}

impl fmt::Display for ThumbSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}
