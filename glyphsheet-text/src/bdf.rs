//! BDF bitmap fonts: a small line-oriented parser plus the bitmap rasterizer.
//!
//! Only the records the atlas needs are interpreted:
//!
//! ```text
//! FONTBOUNDINGBOX w h xoff yoff        fallback line metrics
//! STARTPROPERTIES n
//!   FONT_ASCENT a / FONT_DESCENT d     preferred line metrics
//! ENDPROPERTIES
//! STARTCHAR name
//!   ENCODING cp                        negative = unencoded, skipped
//!   DWIDTH dx dy                       advance
//!   BBX w h xoff yoff                  bitmap box relative to the origin
//!   BITMAP
//!   <hex row> × h                      MSB first, padded to whole bytes
//! ENDCHAR
//! ```
//!
//! Everything else (`SWIDTH`, `COMMENT`, metric sets, ...) is skipped.

use std::collections::HashMap;

use crate::error::{Result, SheetError};
use crate::options::{adjusted, AtlasOptions};
use crate::raster::{GlyphRaster, GlyphRasterizer};

/// Bounding box record (`FONTBOUNDINGBOX` / `BBX`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: usize,
    pub height: usize,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// One encoded glyph from a BDF file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BdfGlyph {
    pub code_point: u32,
    /// `DWIDTH` x component, in pixels.
    pub device_width: i32,
    pub bbox: BoundingBox,
    /// `bbox.height` rows of `bbox.width` bits, one `bool` per pixel.
    bitmap: Vec<bool>,
}

impl BdfGlyph {
    /// Whether the bitmap pixel at `(x, y)` inside the glyph box is set.
    pub fn bit(&self, x: usize, y: usize) -> bool {
        self.bitmap[y * self.bbox.width + x]
    }
}

/// Parsed BDF font: line metrics plus glyphs in file order.
#[derive(Clone, Debug)]
pub struct BdfFont {
    pub bounding_box: BoundingBox,
    pub ascent: i32,
    pub descent: i32,
    glyphs: Vec<BdfGlyph>,
    /// Code point → index into `glyphs` (first definition wins).
    index: HashMap<u32, usize>,
}

impl BdfFont {
    /// Parse BDF source text.
    pub fn parse(source: &str) -> Result<Self> {
        Parser::new(source).parse()
    }

    /// Native line height: ascent plus descent.
    pub fn line_height(&self) -> i32 {
        self.ascent.saturating_add(self.descent)
    }

    pub fn glyph(&self, code_point: u32) -> Option<&BdfGlyph> {
        self.index.get(&code_point).map(|&i| &self.glyphs[i])
    }

    /// Encoded glyphs in file order, duplicates removed.
    pub fn glyphs(&self) -> impl Iterator<Item = &BdfGlyph> + '_ {
        self.glyphs
            .iter()
            .enumerate()
            .filter(|(i, g)| self.index.get(&g.code_point) == Some(i))
            .map(|(_, g)| g)
    }

    pub fn glyph_count(&self) -> usize {
        self.index.len()
    }
}

// ── Parser ──────────────────────────────────────────────────────────

struct Parser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    line_no: usize,
}

/// Glyph record being assembled between `STARTCHAR` and `ENDCHAR`.
#[derive(Default)]
struct PendingGlyph {
    encoding: Option<i64>,
    device_width: Option<i32>,
    bbox: Option<BoundingBox>,
    bitmap: Vec<bool>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
            line_no: 0,
        }
    }

    /// Next non-empty line as (keyword, rest).
    fn next_record(&mut self) -> Option<(&'a str, &'a str)> {
        for (i, line) in self.lines.by_ref() {
            self.line_no = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(match line.split_once(char::is_whitespace) {
                Some((key, rest)) => (key, rest.trim()),
                None => (line, ""),
            });
        }
        None
    }

    fn error(&self, reason: impl Into<String>) -> SheetError {
        SheetError::bdf(self.line_no, reason)
    }

    /// Read `N` integer fields. Values outside `i32` are rejected.
    fn ints<const N: usize>(&self, key: &str, rest: &str) -> Result<[i32; N]> {
        let mut out = [0i32; N];
        let mut fields = rest.split_whitespace();
        for slot in &mut out {
            let field = fields
                .next()
                .ok_or_else(|| self.error(format!("{key} expects {} values", N)))?;
            *slot = field
                .parse()
                .map_err(|_| self.error(format!("{key}: invalid number {field:?}")))?;
        }
        Ok(out)
    }

    fn bbox(&self, key: &str, rest: &str) -> Result<BoundingBox> {
        let [w, h, x, y] = self.ints::<4>(key, rest)?;
        if w < 0 || h < 0 {
            return Err(self.error(format!("{key}: negative size {w}x{h}")));
        }
        Ok(BoundingBox {
            width: w as usize,
            height: h as usize,
            x_offset: x,
            y_offset: y,
        })
    }

    fn parse(mut self) -> Result<BdfFont> {
        match self.next_record() {
            Some(("STARTFONT", _)) => {}
            _ => return Err(self.error("missing STARTFONT")),
        }

        let mut bounding_box = None;
        let mut ascent = None;
        let mut descent = None;
        let mut glyphs = Vec::new();
        let mut index = HashMap::new();
        let mut in_properties = false;

        loop {
            let Some((key, rest)) = self.next_record() else {
                return Err(self.error("missing ENDFONT"));
            };
            match key {
                "ENDFONT" => break,
                "STARTPROPERTIES" => in_properties = true,
                "ENDPROPERTIES" => in_properties = false,
                "FONT_ASCENT" if in_properties => ascent = Some(self.ints::<1>(key, rest)?[0]),
                "FONT_DESCENT" if in_properties => descent = Some(self.ints::<1>(key, rest)?[0]),
                "FONTBOUNDINGBOX" => bounding_box = Some(self.bbox(key, rest)?),
                "STARTCHAR" => {
                    let glyph = self.parse_char()?;
                    if let Some(glyph) = glyph {
                        index.entry(glyph.code_point).or_insert(glyphs.len());
                        glyphs.push(glyph);
                    }
                }
                _ => {}
            }
        }

        let bounding_box = bounding_box.ok_or_else(|| self.error("missing FONTBOUNDINGBOX"))?;
        let ascent = ascent.unwrap_or_else(|| {
            i32::try_from(bounding_box.height)
                .unwrap_or(i32::MAX)
                .saturating_add(bounding_box.y_offset)
        });
        let descent = descent.unwrap_or(bounding_box.y_offset.saturating_neg());

        Ok(BdfFont {
            bounding_box,
            ascent,
            descent,
            glyphs,
            index,
        })
    }

    /// Parse one `STARTCHAR` block. Unencoded glyphs come back as `None`.
    fn parse_char(&mut self) -> Result<Option<BdfGlyph>> {
        let mut pending = PendingGlyph::default();
        loop {
            let Some((key, rest)) = self.next_record() else {
                return Err(self.error("unterminated STARTCHAR"));
            };
            match key {
                "ENCODING" => {
                    let field = rest.split_whitespace().next().unwrap_or_default();
                    let value = field
                        .parse::<i64>()
                        .map_err(|_| self.error(format!("ENCODING: invalid number {field:?}")))?;
                    pending.encoding = Some(value);
                }
                "DWIDTH" => pending.device_width = Some(self.ints::<2>(key, rest)?[0]),
                "BBX" => pending.bbox = Some(self.bbox(key, rest)?),
                "BITMAP" => {
                    let bbox = pending
                        .bbox
                        .ok_or_else(|| self.error("BITMAP before BBX"))?;
                    pending.bitmap = self.parse_bitmap(bbox)?;
                }
                "ENDCHAR" => break,
                _ => {}
            }
        }

        let encoding = pending
            .encoding
            .ok_or_else(|| self.error("glyph without ENCODING"))?;
        let Ok(code_point) = u32::try_from(encoding) else {
            return Ok(None);
        };
        let bbox = pending.bbox.ok_or_else(|| self.error("glyph without BBX"))?;
        let mut bitmap = pending.bitmap;
        bitmap.resize(bbox.width * bbox.height, false);

        Ok(Some(BdfGlyph {
            code_point,
            device_width: pending
                .device_width
                .unwrap_or_else(|| i32::try_from(bbox.width).unwrap_or(i32::MAX)),
            bbox,
            bitmap,
        }))
    }

    fn parse_bitmap(&mut self, bbox: BoundingBox) -> Result<Vec<bool>> {
        let mut bits = Vec::with_capacity(bbox.width * bbox.height);
        for _ in 0..bbox.height {
            let Some((row, _)) = self.next_record() else {
                return Err(self.error("truncated BITMAP"));
            };
            if row == "ENDCHAR" {
                return Err(self.error("BITMAP has fewer rows than BBX height"));
            }
            let bytes = row
                .as_bytes()
                .chunks(2)
                .map(|pair| {
                    std::str::from_utf8(pair)
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok())
                        .ok_or_else(|| self.error(format!("invalid bitmap row {row:?}")))
                })
                .collect::<Result<Vec<u8>>>()?;
            for x in 0..bbox.width {
                let byte = bytes.get(x / 8).copied().unwrap_or(0);
                bits.push(byte & (0x80 >> (x % 8)) != 0);
            }
        }
        Ok(bits)
    }
}

// ── Rasterizer ──────────────────────────────────────────────────────

/// Rasterizer over a parsed BDF font. Sizes are baked into the font.
pub struct BitmapRasterizer {
    font: BdfFont,
    line_height: usize,
    offset_x: i32,
    offset_y: i32,
    adjust_width: i32,
}

impl BitmapRasterizer {
    pub fn new(font: BdfFont, options: &AtlasOptions) -> Self {
        let line_height = adjusted(font.line_height() as f32, options.glyph_adjust_height);
        Self {
            font,
            line_height,
            offset_x: options.glyph_offset_x,
            offset_y: options.glyph_offset_y,
            adjust_width: options.glyph_adjust_width,
        }
    }

    pub fn parse(source: &str, options: &AtlasOptions) -> Result<Self> {
        BdfFont::parse(source).map(|font| Self::new(font, options))
    }
}

impl GlyphRasterizer for BitmapRasterizer {
    fn line_height(&self) -> usize {
        self.line_height
    }

    fn code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.font.glyphs().map(|g| g.code_point))
    }

    fn rasterize(&self, code_point: u32) -> Option<GlyphRaster> {
        let glyph = self.font.glyph(code_point)?;
        let width = adjusted(glyph.device_width as f32, self.adjust_width);
        let bbox = glyph.bbox;
        // Top row of the glyph box, measured down from the top of the line.
        let box_top = i64::from(self.font.ascent) - bbox.height as i64 - i64::from(bbox.y_offset);
        let left = i64::from(bbox.x_offset) + i64::from(self.offset_x);
        let top = box_top + i64::from(self.offset_y);

        Some(GlyphRaster::from_fn(width, self.line_height, |x, y| {
            let gx = x as i64 - left;
            let gy = y as i64 - top;
            let inside = (0..bbox.width as i64).contains(&gx) && (0..bbox.height as i64).contains(&gy);
            if inside && glyph.bit(gx as usize, gy as usize) {
                255
            } else {
                0
            }
        }))
    }
}
