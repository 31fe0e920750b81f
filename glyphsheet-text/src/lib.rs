//! # glyphsheet-text
//!
//! Font-to-atlas engine. Turns an outline font (TTF/OTF/WOFF/WOFF2, rasterized with
//! `swash`) or a BDF bitmap font into a single-strip glyph atlas, written as
//! an indexed-palette PNG and an RGBA PNG plus a companion alphabet file.
//!
//! ## Architecture
//!
//! ```text
//! font file ──► FontSource::open ──► OutlineRasterizer | BitmapRasterizer
//!                                         │  (GlyphRasterizer)
//!                                         ▼
//!                   pack(): printable filter ──► AtlasPacker ──► Atlas
//!                                                                  │
//!                                                                  ▼
//!                          write_outputs ──► palette/<name>.png(.dat)
//!                                            rgba/<name>.png(.dat)
//! ```
//!
//! - **`raster`**: pixel classes, glyph rasters, format selection.
//! - **`outline`** / **`bdf`**: the two rasterizer backends.
//! - **`atlas`**: strip packer and the finished atlas grid.
//! - **`encode`**: PNG and alphabet output.
//! - **`pipeline`**: the end-to-end run.

pub mod atlas;
pub mod bdf;
pub mod diagnostics;
pub mod encode;
pub mod error;
pub mod options;
pub mod outline;
pub mod pipeline;
pub mod raster;
mod woff;

// Re-exports for ergonomic use.
pub use atlas::{locate_strips, Atlas, AtlasPacker, GlyphStrip};
pub use bdf::{BdfFont, BitmapRasterizer};
pub use diagnostics::{Diagnostics, LogDiagnostics, RecordingDiagnostics, SkipReason};
pub use encode::{write_outputs, OutputPaths, PALETTE};
pub use error::{Result, SheetError};
pub use options::AtlasOptions;
pub use outline::OutlineRasterizer;
pub use pipeline::{create_font, pack, RunSummary};
pub use raster::{is_printable, FontFormat, FontSource, GlyphRaster, GlyphRasterizer, PixelClass};
