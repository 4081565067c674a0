//! Mask rule checking (MRC) for rectilinear photomask layouts.
//!
//! Given a set of axis-aligned polygons and a rule distance R, the
//! checker reports two classes of violations:
//!
//! - **Space**: points of different polygons closer than R.
//! - **Width**: opposite edges of one polygon closer than R.
//!
//! The engine prunes candidate polygon pairs with a bounding-box
//! sweepline, samples each polygon down to representative vertices and
//! edges (with shielded geometry preserving exactness), runs two
//! sweepline detectors per pair, and dispatches the work across a
//! fork-join worker pool.
//!
//! ```no_run
//! use maskcheck::{convert, run, Config};
//!
//! # fn main() -> maskcheck::Result<()> {
//! let polygons = convert::decode("layout.pgm")?;
//! let results = run(&polygons, &Config::default())?;
//! println!("{} violations", results.total_violations());
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod convert;
pub mod error;
pub mod report;

pub use check::geometry::{Point, Polygon, Segment};
pub use check::runner::{run, Results};
pub use config::Config;
pub use error::{Error, Result};
