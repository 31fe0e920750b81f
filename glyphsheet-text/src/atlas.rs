//! Glyph atlas: one horizontal strip of glyphs separated by border columns.
//!
//! ```text
//! B g g g B g g B g g g g B      B = Border, g = glyph pixels
//! B g g g B g g B g g g g B
//! B B B B B B B B B B B B B      bottom border row
//! ```
//!
//! The packer appends glyph strips strictly in the order they arrive, each
//! followed by one border column; column 0 is the left border. The alphabet
//! grows in lockstep so that the Nth character labels the Nth strip.
//! Consumers recover each strip's left edge by summing `width + 1` over the
//! preceding alphabet entries, starting at column 1.

use crate::raster::{GlyphRaster, PixelClass};

/// Placement of one glyph strip inside the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphStrip {
    pub ch: char,
    /// Left column of the strip.
    pub x: usize,
    /// Strip width (the glyph's adjusted advance).
    pub width: usize,
}

/// Accumulates glyph strips row by row.
pub struct AtlasPacker {
    line_height: usize,
    /// One growing buffer per glyph row.
    rows: Vec<Vec<PixelClass>>,
    width: usize,
    strips: Vec<GlyphStrip>,
}

impl AtlasPacker {
    /// Start an atlas holding only the left border column.
    pub fn new(line_height: usize) -> Self {
        Self {
            line_height,
            rows: vec![vec![PixelClass::Border]; line_height],
            width: 1,
            strips: Vec::new(),
        }
    }

    /// Append one glyph strip and its trailing border column.
    ///
    /// # Panics
    ///
    /// Panics if the raster height differs from the packer's line height.
    pub fn push(&mut self, ch: char, raster: &GlyphRaster) {
        assert_eq!(
            raster.height(),
            self.line_height,
            "glyph {ch:?} rasterized at the wrong line height"
        );
        for (y, row) in self.rows.iter_mut().enumerate() {
            row.extend_from_slice(raster.row(y));
            row.push(PixelClass::Border);
        }
        self.strips.push(GlyphStrip {
            ch,
            x: self.width,
            width: raster.width(),
        });
        self.width += raster.width() + 1;
    }

    /// Current atlas width, borders included.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn glyph_count(&self) -> usize {
        self.strips.len()
    }

    /// Append the bottom border row and freeze the atlas.
    pub fn finish(self) -> Atlas {
        let height = self.line_height + 1;
        let mut pixels = Vec::with_capacity(self.width * height);
        for row in self.rows {
            pixels.extend(row);
        }
        pixels.extend(std::iter::repeat(PixelClass::Border).take(self.width));
        Atlas {
            width: self.width,
            height,
            pixels,
            strips: self.strips,
        }
    }
}

/// Finished atlas grid plus the alphabet that labels its strips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
    width: usize,
    height: usize,
    pixels: Vec<PixelClass>,
    strips: Vec<GlyphStrip>,
}

impl Atlas {
    pub fn width(&self) -> usize {
        self.width
    }

    /// Line height plus the bottom border row.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> PixelClass {
        self.pixels[y * self.width + x]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[PixelClass]> + '_ {
        self.pixels.chunks_exact(self.width)
    }

    /// Row-major pixel classes.
    pub fn pixels(&self) -> &[PixelClass] {
        &self.pixels
    }

    pub fn strips(&self) -> &[GlyphStrip] {
        &self.strips
    }

    /// Characters in strip order, concatenated.
    pub fn alphabet(&self) -> String {
        self.strips.iter().map(|s| s.ch).collect()
    }

    pub fn glyph_count(&self) -> usize {
        self.strips.len()
    }
}

/// Recover strip column ranges `(x, width)` from the border columns of row 0.
///
/// This is the consumer-side view of the atlas: every border column after
/// column 0 closes one strip. Zero-width glyphs show up as adjacent borders.
/// An atlas without glyph rows (line height 0) cannot be delimited and
/// yields an empty list.
pub fn locate_strips(atlas: &Atlas) -> Vec<(usize, usize)> {
    if atlas.height() < 2 {
        return Vec::new();
    }
    let Some(top) = atlas.rows().next() else {
        return Vec::new();
    };
    let mut strips = Vec::new();
    let mut start = 1;
    for (x, class) in top.iter().enumerate().skip(1) {
        if *class == PixelClass::Border {
            strips.push((start, x - start));
            start = x + 1;
        }
    }
    strips
}

// ===================================================================
// Tests
// ===================================================================
