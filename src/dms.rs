use anyhow::{bail, Result};

use crate::constants::SECONDS_DECIMALS;
use crate::utils::round_to_decimals;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Single-letter reference as stored in GPSLatitudeRef / GPSLongitudeRef.
    pub fn letter(self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        }
    }
}

/// (negative, positive) hemisphere for an axis.
pub type HemispherePair = (Hemisphere, Hemisphere);

pub const LATITUDE_HEMISPHERES: HemispherePair = (Hemisphere::South, Hemisphere::North);
pub const LONGITUDE_HEMISPHERES: HemispherePair = (Hemisphere::West, Hemisphere::East);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    /// Rounded to six decimal places.
    pub seconds: f64,
    pub hemisphere: Hemisphere,
}

impl Dms {
    pub fn abs_decimal(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

/// Sexagesimal split of a signed decimal coordinate. Exactly zero maps to
/// the positive hemisphere.
pub fn to_dms(value: f64, (negative, positive): HemispherePair) -> Dms {
    let hemisphere = if value < 0.0 { negative } else { positive };
    let abs_value = value.abs();
    let degrees = abs_value.trunc();
    let minutes_total = (abs_value - degrees) * 60.0;
    let minutes = minutes_total.trunc();
    let seconds = round_to_decimals((minutes_total - minutes) * 60.0, SECONDS_DECIMALS);

    Dms {
        degrees: degrees as u32,
        minutes: minutes as u32,
        seconds,
        hemisphere,
    }
}

pub fn latitude_to_dms(lat: f64) -> Result<Dms> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        bail!("Latitude {lat} is outside [-90, 90]");
    }
    Ok(to_dms(lat, LATITUDE_HEMISPHERES))
}

pub fn longitude_to_dms(lon: f64) -> Result<Dms> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        bail!("Longitude {lon} is outside [-180, 180]");
    }
    Ok(to_dms(lon, LONGITUDE_HEMISPHERES))
}
