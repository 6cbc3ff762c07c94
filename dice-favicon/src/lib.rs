//! Procedural favicon of two overlapping dice, each showing six.
//!
//! The same layout is emitted as an SVG document, as PNGs at any size and as
//! a multi-resolution ICO.

pub mod bundle;
pub mod export;
pub mod geometry;
pub mod palette;
pub mod raster;
pub mod vector;

pub use bundle::{IconBundle, render_icon_bundle};
pub use export::{OUTPUTS, export_all};
pub use raster::{Canvas, render_raster};
pub use vector::{Svg, render_vector};
