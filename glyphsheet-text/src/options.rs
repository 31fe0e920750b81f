//! Session options: font size plus the glyph offset/adjustment knobs.
//!
//! Options are fixed for a whole run. They can be built in code, loaded
//! from a JSON file, or both (the CLI loads a file and then overrides
//! individual fields from flags).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Rasterization options for one atlas run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasOptions {
    /// Pixel size for outline fonts. Ignored for bitmap fonts.
    pub font_size: Option<f32>,
    /// Horizontal shift of the sampling origin, in pixels.
    pub glyph_offset_x: i32,
    /// Vertical shift of the sampling origin, in pixels.
    pub glyph_offset_y: i32,
    /// Added to every rounded advance width.
    pub glyph_adjust_width: i32,
    /// Added to the rounded line height.
    pub glyph_adjust_height: i32,
}

impl AtlasOptions {
    /// Options with only a font size set.
    pub fn with_size(font_size: f32) -> Self {
        Self {
            font_size: Some(font_size),
            ..Default::default()
        }
    }

    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SheetError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| SheetError::Options {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Font size required by outline sources.
    pub(crate) fn required_size(&self, font_path: &Path) -> Result<f32> {
        let size = self
            .font_size
            .ok_or_else(|| SheetError::MissingFontSize(font_path.to_path_buf()))?;
        if !size.is_finite() || size <= 0.0 {
            return Err(SheetError::InvalidFontSize(size));
        }
        Ok(size)
    }
}

/// Apply a signed adjustment to a rounded metric, clamping at zero.
///
/// Halfway values round to even.
pub(crate) fn adjusted(native: f32, delta: i32) -> usize {
    let value = native.round_ties_even() as i64 + i64::from(delta);
    value.max(0) as usize
}
