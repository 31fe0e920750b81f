//! Run diagnostics.
//!
//! A pipeline run reports progress to an optional [`Diagnostics`] sink that
//! lives exactly as long as the run. [`LogDiagnostics`] forwards to the
//! `log` facade; pass `None` for a silent run.

use std::path::Path;

/// Why a code point did not make it into the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Control, format, separator or private-use character.
    NotPrintable,
    /// The font has no glyph for it.
    Absent,
}

/// Observer for one pipeline run. Every hook defaults to a no-op.
pub trait Diagnostics {
    fn font_loaded(&mut self, _path: &Path, _line_height: usize) {}

    fn glyph_packed(&mut self, _code_point: u32, _ch: char, _width: usize) {}

    fn glyph_skipped(&mut self, _code_point: u32, _reason: SkipReason) {}

    fn artifact_written(&mut self, _path: &Path) {}
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn font_loaded(&mut self, path: &Path, line_height: usize) {
        log::info!("loaded font file: {} (line height {line_height})", path.display());
    }

    fn glyph_packed(&mut self, code_point: u32, ch: char, width: usize) {
        log::debug!("rasterize glyph: {code_point} - {ch} - {width}");
    }

    fn glyph_skipped(&mut self, code_point: u32, reason: SkipReason) {
        log::trace!("skip code point U+{code_point:04X}: {reason:?}");
    }

    fn artifact_written(&mut self, path: &Path) {
        log::info!("make {}", path.display());
    }
}

/// Collects every event; handy for assertions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingDiagnostics {
    pub packed: Vec<(u32, char, usize)>,
    pub skipped: Vec<(u32, SkipReason)>,
    pub written: Vec<std::path::PathBuf>,
    pub fonts: usize,
}

impl Diagnostics for RecordingDiagnostics {
    fn font_loaded(&mut self, _path: &Path, _line_height: usize) {
        self.fonts += 1;
    }

    fn glyph_packed(&mut self, code_point: u32, ch: char, width: usize) {
        self.packed.push((code_point, ch, width));
    }

    fn glyph_skipped(&mut self, code_point: u32, reason: SkipReason) {
        self.skipped.push((code_point, reason));
    }

    fn artifact_written(&mut self, path: &Path) {
        self.written.push(path.to_path_buf());
    }
}
