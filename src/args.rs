use std::path::PathBuf;

use clap::Parser;

use crate::constants::DEFAULT_MAX_RESULTS;
use crate::types::{BoundingBox, ThumbSize};

/// Download geotagged street-level images inside a bounding box and write
/// their position and bearing into EXIF, ready for JOSM.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ProgramArgs {
    /// Southern edge, decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub min_lat: f64,

    /// Northern edge, decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub max_lat: f64,

    /// Western edge, decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub min_lon: f64,

    /// Eastern edge, decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub max_lon: f64,

    /// Upper bound on the number of search results
    #[arg(default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: u32,

    /// Thumbnail width: 320, 640, 1024 or 2048
    #[arg(short, long)]
    pub size: Option<ThumbSize>,

    /// Output directory, wiped at the start of every run
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl ProgramArgs {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
        }
    }
}
