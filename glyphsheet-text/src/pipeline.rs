//! The end-to-end run: open a font, pack its printable glyphs, write outputs.

use std::path::Path;

use crate::atlas::{Atlas, AtlasPacker};
use crate::diagnostics::{Diagnostics, SkipReason};
use crate::encode::{write_outputs, OutputPaths};
use crate::error::Result;
use crate::options::AtlasOptions;
use crate::raster::{is_printable, FontSource, GlyphRasterizer};

/// What one run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub glyph_count: usize,
    pub width: usize,
    pub height: usize,
    pub alphabet: String,
    pub outputs: OutputPaths,
}

/// Pack every printable glyph of `source` in enumeration order.
///
/// Code points whose character is not printable, or that the font cannot
/// rasterize, are skipped without touching the atlas.
pub fn pack(source: &dyn GlyphRasterizer, mut diagnostics: Option<&mut (dyn Diagnostics + '_)>) -> Atlas {
    let mut packer = AtlasPacker::new(source.line_height());

    for code_point in source.code_points() {
        let Some(ch) = char::from_u32(code_point).filter(|c| is_printable(*c)) else {
            if let Some(sink) = diagnostics.as_deref_mut() {
                sink.glyph_skipped(code_point, SkipReason::NotPrintable);
            }
            continue;
        };
        let Some(raster) = source.rasterize(code_point) else {
            if let Some(sink) = diagnostics.as_deref_mut() {
                sink.glyph_skipped(code_point, SkipReason::Absent);
            }
            continue;
        };
        if let Some(sink) = diagnostics.as_deref_mut() {
            sink.glyph_packed(code_point, ch, raster.width());
        }
        packer.push(ch, &raster);
    }

    packer.finish()
}

/// Convert one font file into `palette/` and `rgba/` atlas artifacts.
///
/// Configuration problems (unknown extension, missing size) and unreadable
/// fonts fail before anything is written.
pub fn create_font(
    font_path: impl AsRef<Path>,
    name: &str,
    out_dir: impl AsRef<Path>,
    options: &AtlasOptions,
    mut diagnostics: Option<&mut (dyn Diagnostics + '_)>,
) -> Result<RunSummary> {
    let font_path = font_path.as_ref();
    let source = FontSource::open(font_path, options)?;
    if let Some(sink) = diagnostics.as_deref_mut() {
        sink.font_loaded(font_path, source.line_height());
    }

    let atlas = pack(&source, diagnostics.as_deref_mut());
    let outputs = write_outputs(out_dir.as_ref(), name, &atlas, diagnostics)?;

    Ok(RunSummary {
        glyph_count: atlas.glyph_count(),
        width: atlas.width(),
        height: atlas.height(),
        alphabet: atlas.alphabet(),
        outputs,
    })
}
