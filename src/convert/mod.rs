//! Format conversion: images and layout databases in, polygons out.

pub mod gdsii;
pub mod pgm;
pub mod trace;

pub use gdsii::{read_gdsii, write_gdsii};
pub use pgm::{read_pgm, write_pgm, Image};
pub use trace::polygons_from_image;

use std::path::Path;

use crate::check::geometry::Polygon;
use crate::error::{Error, Result};

/// Decode a layout file into polygons, picking the decoder from the file
/// extension (`.pgm` or `.gds`).
pub fn decode<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pgm") => Ok(polygons_from_image(&read_pgm(path)?)),
        Some("gds") | Some("gdsii") => read_gdsii(path),
        _ => Err(Error::Format(format!(
            "unsupported input format: {}",
            path.display()
        ))),
    }
}
