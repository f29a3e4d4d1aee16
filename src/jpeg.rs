//! Minimal JPEG marker walker: enough to find and replace the EXIF APP1
//! segment without touching the entropy-coded image data.

use anyhow::{bail, Result};

use crate::constants::{
    EXIF_APP1_HEADER, JPEG_APP0, JPEG_APP1, JPEG_EOI, JPEG_MARKER_PREFIX, JPEG_SOI, JPEG_SOS,
    MAX_SEGMENT_PAYLOAD_BYTES,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    marker: u8,
    start: usize,
    end: usize,
}

impl Segment {
    fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start + 4..self.end]
    }

    fn is_exif(&self, data: &[u8]) -> bool {
        self.marker == JPEG_APP1 && self.payload(data).starts_with(EXIF_APP1_HEADER)
    }
}

/// Header segments up to (not including) the first SOS marker, plus the
/// offset where the SOS marker begins.
fn header_segments(data: &[u8]) -> Result<(Vec<Segment>, usize)> {
    if data.len() < 4 || data[0] != JPEG_MARKER_PREFIX || data[1] != JPEG_SOI {
        bail!("Not a JPEG file (missing SOI marker)");
    }

    let mut segments = Vec::new();
    let mut pos = 2;
    loop {
        if pos + 1 >= data.len() {
            bail!("JPEG ended before image data");
        }
        if data[pos] != JPEG_MARKER_PREFIX {
            bail!("Expected JPEG marker at offset {pos}");
        }
        let marker = data[pos + 1];
        if marker == JPEG_MARKER_PREFIX {
            // Fill byte before the real marker.
            pos += 1;
            continue;
        }
        if marker == JPEG_SOS || marker == JPEG_EOI {
            return Ok((segments, pos));
        }
        if pos + 4 > data.len() {
            bail!("Truncated JPEG segment header at offset {pos}");
        }
        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 {
            bail!("Invalid JPEG segment length {length} at offset {pos}");
        }
        let end = pos + 2 + length;
        if end > data.len() {
            bail!("JPEG segment at offset {pos} runs past end of file");
        }
        segments.push(Segment {
            marker,
            start: pos,
            end,
        });
        pos = end;
    }
}

/// TIFF block of the first EXIF APP1 segment, if the file has one.
pub fn find_exif(data: &[u8]) -> Result<Option<&[u8]>> {
    let (segments, _) = header_segments(data)?;
    Ok(segments
        .iter()
        .find(|segment| segment.is_exif(data))
        .map(|segment| &segment.payload(data)[EXIF_APP1_HEADER.len()..]))
}

/// Rebuild `data` with `tiff` as its only EXIF APP1 segment, placed after
/// any leading JFIF APP0 segments.
pub fn replace_exif(data: &[u8], tiff: &[u8]) -> Result<Vec<u8>> {
    let payload_len = EXIF_APP1_HEADER.len() + tiff.len();
    if payload_len > MAX_SEGMENT_PAYLOAD_BYTES {
        bail!("EXIF block of {payload_len} bytes does not fit in one APP1 segment");
    }
    let (segments, scan_start) = header_segments(data)?;

    let mut out = Vec::with_capacity(data.len() + payload_len + 4);
    out.extend_from_slice(&[JPEG_MARKER_PREFIX, JPEG_SOI]);

    let leading_app0 = segments
        .iter()
        .take_while(|segment| segment.marker == JPEG_APP0)
        .count();
    for segment in &segments[..leading_app0] {
        out.extend_from_slice(&data[segment.start..segment.end]);
    }

    out.extend_from_slice(&[JPEG_MARKER_PREFIX, JPEG_APP1]);
    out.extend_from_slice(&((payload_len + 2) as u16).to_be_bytes());
    out.extend_from_slice(EXIF_APP1_HEADER);
    out.extend_from_slice(tiff);

    for segment in &segments[leading_app0..] {
        if segment.is_exif(data) {
            continue;
        }
        out.extend_from_slice(&data[segment.start..segment.end]);
    }

    out.extend_from_slice(&data[scan_start..]);
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// SOI, JFIF APP0, a one-component SOS with two bytes of scan data, EOI.
    pub(crate) fn sample_jpeg() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        data.extend_from_slice(&[0x12, 0x34]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn plain_jpeg_has_no_exif() {
        assert_eq!(find_exif(&sample_jpeg()).unwrap(), None);
    }

    #[test]
    fn replace_inserts_after_app0_and_keeps_scan_data() {
        let original = sample_jpeg();
        let tiff = b"II*\0fake".to_vec();
        let updated = replace_exif(&original, &tiff).unwrap();

        assert_eq!(find_exif(&updated).unwrap(), Some(tiff.as_slice()));
        // APP0 still directly follows SOI.
        assert_eq!(&updated[2..4], &[0xFF, 0xE0]);
        assert_eq!(&updated[20..22], &[0xFF, 0xE1]);
        assert!(updated.ends_with(&original[20..]));
    }

    #[test]
    fn replace_drops_previous_exif_segment() {
        let first = replace_exif(&sample_jpeg(), b"MM\0*old").unwrap();
        let second = replace_exif(&first, b"II*\0new").unwrap();

        assert_eq!(find_exif(&second).unwrap(), Some(&b"II*\0new"[..]));
        assert_eq!(second.len(), first.len());
    }

    #[test]
    fn rejects_non_jpeg_data() {
        assert!(find_exif(b"<html>not found</html>").is_err());
        assert!(replace_exif(&[0xFF, 0xD8, 0xFF], b"II*\0").is_err());
    }
}
