pub const MAPILLARY_SEARCH_URL: &str = "http://api.mapillary.com/v1/im/search";
pub const USER_AGENT: &str = "mapillary-geotag/0.1";

pub const DEFAULT_MAX_RESULTS: u32 = 400;
pub const DEFAULT_OUTPUT_DIR: &str = "downloaded";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DOWNLOADED_LIST_FILE: &str = "downloaded.txt";
pub const SIGNIFICANT_DIGITS: i32 = 12;
pub const THUMB_SIZES: [u16; 4] = [320, 640, 1024, 2048];

pub const SECONDS_DECIMALS: i32 = 6;
pub const SECONDS_DENOMINATOR: u32 = 1_000_000;
pub const BEARING_DENOMINATOR: u32 = 100;
pub const GPS_MAP_DATUM: &str = "WGS-84";
pub const GPS_VERSION_ID: [u8; 4] = [2, 0, 0, 0];
pub const GPS_IMG_DIRECTION_REF: &str = "T";

pub const JPEG_MARKER_PREFIX: u8 = 0xFF;
pub const JPEG_SOI: u8 = 0xD8;
pub const JPEG_EOI: u8 = 0xD9;
pub const JPEG_SOS: u8 = 0xDA;
pub const JPEG_APP0: u8 = 0xE0;
pub const JPEG_APP1: u8 = 0xE1;
pub const EXIF_APP1_HEADER: &[u8; 6] = b"Exif\0\0";
pub const MAX_SEGMENT_PAYLOAD_BYTES: usize = u16::MAX as usize - 2;
