//! Match geometry and replacement layout.
//!
//! [`reconstruct`] turns the fragments of a match into a padded page-space box
//! plus the raster rectangles used for color sampling; [`fit_text`] picks the
//! size and baseline for the replacement inside that box.

pub mod fitter;
pub mod reconstruct;

pub use fitter::{fit_text, FitError, TextPlacement};
pub use reconstruct::{reconstruct, MatchGeometry};
