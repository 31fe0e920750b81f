//! Glyph rasterization contract and the closed set of font sources.
//!
//! Every font source exposes the same capability: a fixed line height, an
//! ordered sequence of the code points it defines, and a pure
//! `rasterize(code_point)` that yields a binarized glyph strip or `None`.
//!
//! ```text
//! FontSource::open(path, options)
//!     ├── Outline(OutlineRasterizer)   .otf .ttf .woff .woff2   (swash)
//!     └── Bitmap(BitmapRasterizer)     .bdf                     (BDF 2.1)
//! ```

use std::path::Path;

use icu_properties::props::GeneralCategory;
use icu_properties::CodePointMapData;

use crate::bdf::BitmapRasterizer;
use crate::error::{Result, SheetError};
use crate::options::AtlasOptions;
use crate::outline::OutlineRasterizer;

// ── Pixel classification ────────────────────────────────────────────

/// Per-pixel classification stored in glyph strips and the atlas.
///
/// The discriminants are the palette indices written to the indexed PNG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelClass {
    #[default]
    Transparent = 0,
    Solid = 1,
    Border = 2,
}

impl PixelClass {
    /// Binarize a coverage sample: anything above zero is ink.
    pub fn from_coverage(coverage: u8) -> Self {
        if coverage > 0 {
            Self::Solid
        } else {
            Self::Transparent
        }
    }

    /// Palette index of this class.
    pub fn index(self) -> u8 {
        self as u8
    }
}

// ── Glyph strip ─────────────────────────────────────────────────────

/// A rasterized glyph: `height` rows of exactly `width` pixels.
///
/// Produced by a rasterizer, consumed by the packer. Only `Transparent`
/// and `Solid` appear here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRaster {
    width: usize,
    height: usize,
    pixels: Vec<PixelClass>,
}

impl GlyphRaster {
    /// A fully transparent strip.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelClass::Transparent; width * height],
        }
    }

    /// Build a strip by sampling coverage at every `(x, y)`.
    pub fn from_fn(width: usize, height: usize, mut coverage: impl FnMut(usize, usize) -> u8) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(PixelClass::from_coverage(coverage(x, y)));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Adjusted advance width; also the strip width.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// One row of the strip.
    pub fn row(&self, y: usize) -> &[PixelClass] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> PixelClass {
        self.pixels[y * self.width + x]
    }

    /// Number of `Solid` pixels.
    pub fn ink(&self) -> usize {
        self.pixels.iter().filter(|p| **p == PixelClass::Solid).count()
    }
}

// ── Rasterizer capability ───────────────────────────────────────────

/// Capability shared by every font source.
pub trait GlyphRasterizer {
    /// Adjusted line height, constant for the session.
    fn line_height(&self) -> usize;

    /// Code points the font defines, deduplicated, in a stable order.
    fn code_points(&self) -> Box<dyn Iterator<Item = u32> + '_>;

    /// Rasterize one code point, or `None` when the font has no glyph for it.
    fn rasterize(&self, code_point: u32) -> Option<GlyphRaster>;
}

// ── Format selection ────────────────────────────────────────────────

/// Font container families recognized by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    /// Scalable outlines: OpenType, TrueType, WOFF, WOFF2.
    Outline,
    /// Text bitmap font (BDF).
    Bitmap,
}

impl FontFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "otf" | "ttf" | "woff" | "woff2" => Ok(Self::Outline),
            "bdf" => Ok(Self::Bitmap),
            _ => Err(SheetError::UnsupportedFormat(format!(".{ext}"))),
        }
    }
}

/// An opened font, immutable for the rest of the run.
pub enum FontSource {
    Outline(OutlineRasterizer),
    Bitmap(BitmapRasterizer),
}

impl FontSource {
    /// Open a font file, running every configuration check up front.
    ///
    /// The extension and the size requirement are checked before the file
    /// is read, so a misconfigured run touches nothing.
    pub fn open(path: impl AsRef<Path>, options: &AtlasOptions) -> Result<Self> {
        let path = path.as_ref();
        match FontFormat::from_path(path)? {
            FontFormat::Outline => {
                let size = options.required_size(path)?;
                let data = std::fs::read(path).map_err(|e| SheetError::io(path, e))?;
                OutlineRasterizer::from_bytes(path, data, size, options).map(Self::Outline)
            }
            FontFormat::Bitmap => {
                let text = std::fs::read_to_string(path).map_err(|e| SheetError::io(path, e))?;
                BitmapRasterizer::parse(&text, options).map(Self::Bitmap)
            }
        }
    }

    pub fn format(&self) -> FontFormat {
        match self {
            Self::Outline(_) => FontFormat::Outline,
            Self::Bitmap(_) => FontFormat::Bitmap,
        }
    }
}

impl GlyphRasterizer for FontSource {
    fn line_height(&self) -> usize {
        match self {
            Self::Outline(r) => r.line_height(),
            Self::Bitmap(r) => r.line_height(),
        }
    }

    fn code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Self::Outline(r) => r.code_points(),
            Self::Bitmap(r) => r.code_points(),
        }
    }

    fn rasterize(&self, code_point: u32) -> Option<GlyphRaster> {
        match self {
            Self::Outline(r) => r.rasterize(code_point),
            Self::Bitmap(r) => r.rasterize(code_point),
        }
    }
}

// ── Printable filter ────────────────────────────────────────────────

/// Whether a character belongs in the alphabet.
///
/// Rejects the "Other" and "Separator" general categories (control, format,
/// surrogate, private use, unassigned, line/paragraph/space separators),
/// except for the ASCII space.
pub fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        CodePointMapData::<GeneralCategory>::new().get(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
    )
}
