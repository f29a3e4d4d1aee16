use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};

use crate::constants::{
    BEARING_DENOMINATOR, GPS_IMG_DIRECTION_REF, GPS_MAP_DATUM, GPS_VERSION_ID,
    SECONDS_DENOMINATOR,
};
use crate::dms::{latitude_to_dms, longitude_to_dms, Dms};
use crate::jpeg::{find_exif, replace_exif};

/// GPS values written into a downloaded image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsTags {
    pub latitude: Dms,
    pub longitude: Dms,
    /// Whole degrees clockwise from true north, in [0, 360). Rounding up to
    /// 360 wraps to 0, and negative bearings wrap into range.
    pub bearing_degrees: u32,
}

impl GpsTags {
    pub fn from_decimal(lat: f64, lon: f64, bearing: f64) -> Result<Self> {
        if !bearing.is_finite() {
            bail!("Bearing {bearing} is not a finite number");
        }
        Ok(Self {
            latitude: latitude_to_dms(lat)?,
            longitude: longitude_to_dms(lon)?,
            bearing_degrees: bearing.round().rem_euclid(360.0) as u32,
        })
    }

    pub fn bearing_rational(&self) -> Rational {
        Rational {
            num: self.bearing_degrees * BEARING_DENOMINATOR,
            denom: BEARING_DENOMINATOR,
        }
    }

    /// GPS IFD fields. The IFD0 pointer (GPSTag) is emitted by the writer
    /// whenever GPS fields are present.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            gps_field(Tag::GPSVersionID, Value::Byte(GPS_VERSION_ID.to_vec())),
            gps_field(Tag::GPSLatitudeRef, ascii(self.latitude.hemisphere.letter())),
            gps_field(Tag::GPSLatitude, Value::Rational(dms_rationals(&self.latitude))),
            gps_field(Tag::GPSLongitudeRef, ascii(self.longitude.hemisphere.letter())),
            gps_field(Tag::GPSLongitude, Value::Rational(dms_rationals(&self.longitude))),
            gps_field(Tag::GPSImgDirectionRef, ascii(GPS_IMG_DIRECTION_REF)),
            gps_field(Tag::GPSImgDirection, Value::Rational(vec![self.bearing_rational()])),
            gps_field(Tag::GPSMapDatum, ascii(GPS_MAP_DATUM)),
        ]
    }
}

pub fn dms_rationals(dms: &Dms) -> Vec<Rational> {
    let micro_seconds = (dms.seconds * SECONDS_DENOMINATOR as f64).round() as u32;
    vec![
        Rational {
            num: dms.degrees,
            denom: 1,
        },
        Rational {
            num: dms.minutes,
            denom: 1,
        },
        Rational {
            num: micro_seconds,
            denom: SECONDS_DENOMINATOR,
        },
    ]
}

fn gps_field(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

fn ascii(text: &str) -> Value {
    Value::Ascii(vec![text.as_bytes().to_vec()])
}

/// Write `tags` into the JPEG at `path` in place. Fields already present in
/// IFD0, the Exif IFD and IFD1 are carried over, along with an embedded JPEG
/// thumbnail. Earlier GPS fields are replaced. Strip-based thumbnails and
/// fields of unknown type are not carried over.
pub fn write_gps_exif(path: &Path, tags: &GpsTags) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let existing = match find_exif(&data)? {
        Some(tiff) => Some(
            exif::Reader::new()
                .read_raw(tiff.to_vec())
                .with_context(|| format!("Failed to parse existing EXIF in {}", path.display()))?,
        ),
        None => None,
    };
    let little_endian = existing.as_ref().map_or(true, |exif| exif.little_endian());
    let gps_fields = tags.fields();

    let mut writer = Writer::new();
    if let Some(exif) = existing.as_ref() {
        for field in exif.fields().filter(|field| is_preserved(field)) {
            writer.push_field(field);
        }
        if let Some(jpeg) = thumbnail_jpeg(exif) {
            writer.set_jpeg(jpeg, In::THUMBNAIL);
        }
    }
    for field in &gps_fields {
        writer.push_field(field);
    }

    let mut tiff = Cursor::new(Vec::new());
    writer
        .write(&mut tiff, little_endian)
        .with_context(|| format!("Failed to encode EXIF for {}", path.display()))?;

    let updated = replace_exif(&data, tiff.get_ref())?;
    fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn is_preserved(field: &Field) -> bool {
    (field.ifd_num == In::PRIMARY || field.ifd_num == In::THUMBNAIL)
        && !matches!(field.tag.context(), exif::Context::Gps)
        && !matches!(field.value, Value::Unknown(..))
}

/// JPEG thumbnail bytes referenced from IFD1.
pub fn thumbnail_jpeg(exif: &exif::Exif) -> Option<&[u8]> {
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let length = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    exif.buf().get(offset..offset.checked_add(length)?)
}

pub fn geotag_file(path: &Path, lat: f64, lon: f64, bearing: f64) -> Result<()> {
    let tags = GpsTags::from_decimal(lat, lon, bearing)
        .with_context(|| format!("Invalid coordinates for {}", path.display()))?;
    write_gps_exif(path, &tags)
}
