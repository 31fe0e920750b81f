//! Outline fonts (OpenType / TrueType / WOFF / WOFF2) rasterized with `swash`.
//!
//! The line box is `ascent + |descent|` pixels tall with the baseline at
//! `round(ascent)`. Each glyph is drawn with its pen origin at
//! `(glyph_offset_x, baseline + glyph_offset_y)`, then clipped or padded to
//! its adjusted advance width.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;

use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;
use swash::{CacheKey, FontRef};

use crate::error::{Result, SheetError};
use crate::options::{adjusted, AtlasOptions};
use crate::raster::{GlyphRaster, GlyphRasterizer};
use crate::woff;

/// Rasterizer over one outline face at a fixed pixel size.
pub struct OutlineRasterizer {
    /// Plain sfnt bytes (WOFF/WOFF2 containers already decoded).
    data: Vec<u8>,
    /// Byte offset to the table directory (from `FontRef::from_index`).
    offset: u32,
    key: CacheKey,
    size: f32,
    line_height: usize,
    baseline: i32,
    offset_x: i32,
    offset_y: i32,
    adjust_width: i32,
    /// Mapped code points, ascending.
    code_points: Vec<u32>,
    /// Scratch space reused across glyphs.
    context: RefCell<ScaleContext>,
}

impl OutlineRasterizer {
    /// Parse face 0 of `data` and fix the session metrics at `size` pixels.
    pub fn from_bytes(path: &Path, data: Vec<u8>, size: f32, options: &AtlasOptions) -> Result<Self> {
        let data = woff::to_sfnt(data)?;
        let font = FontRef::from_index(&data, 0).ok_or_else(|| SheetError::FontParse {
            path: path.to_path_buf(),
            reason: "not a valid OpenType/TrueType face".into(),
        })?;
        let (offset, key) = (font.offset, font.key);

        let metrics = font.metrics(&[]).scale(size);
        let line_height = adjusted(metrics.ascent + metrics.descent.abs(), options.glyph_adjust_height);
        let baseline = metrics.ascent.round_ties_even() as i32;

        let mut mapped = BTreeSet::new();
        font.charmap().enumerate(|code_point, glyph_id| {
            if glyph_id != 0 {
                mapped.insert(code_point);
            }
        });

        log::debug!(
            "outline face: {size}px, line height {line_height}, baseline {baseline}, {} code points",
            mapped.len()
        );

        Ok(Self {
            data,
            offset,
            key,
            size,
            line_height,
            baseline,
            offset_x: options.glyph_offset_x,
            offset_y: options.glyph_offset_y,
            adjust_width: options.glyph_adjust_width,
            code_points: mapped.into_iter().collect(),
            context: RefCell::new(ScaleContext::new()),
        })
    }

    /// Transient `FontRef` over the stored bytes.
    fn font(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }
}

impl GlyphRasterizer for OutlineRasterizer {
    fn line_height(&self) -> usize {
        self.line_height
    }

    fn code_points(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.code_points.iter().copied())
    }

    fn rasterize(&self, code_point: u32) -> Option<GlyphRaster> {
        let ch = char::from_u32(code_point)?;
        let font = self.font();
        let glyph_id = font.charmap().map(ch);
        if glyph_id == 0 {
            return None;
        }

        let advance = font.glyph_metrics(&[]).scale(self.size).advance_width(glyph_id);
        let width = adjusted(advance, self.adjust_width);

        let mut context = self.context.borrow_mut();
        let mut scaler = context.builder(font).size(self.size).hint(false).build();
        let Some(image) = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id)
        else {
            // No outline (space and friends): a blank strip of the advance width.
            return Some(GlyphRaster::blank(width, self.line_height));
        };

        let placement = image.placement;
        let left = self.offset_x + placement.left;
        let top = self.baseline + self.offset_y - placement.top;
        let (w, h) = (placement.width as i32, placement.height as i32);

        Some(GlyphRaster::from_fn(width, self.line_height, |x, y| {
            let gx = x as i32 - left;
            let gy = y as i32 - top;
            if (0..w).contains(&gx) && (0..h).contains(&gy) {
                image.data[(gy * w + gx) as usize]
            } else {
                0
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelClass;

    /// 1000 upem, ascender 800, descender -200. Boxes: `A` (100,0)-(400,700)
    /// adv 500, `.` (100,0)-(300,200) adv 600, `g` (100,-200)-(400,300)
    /// adv 500, space adv 500 without outline. U+000A also maps to `A`.
    const BLOCK_TTF: &[u8] = include_bytes!("../tests/fonts/block.ttf");
    const BLOCK_WOFF: &[u8] = include_bytes!("../tests/fonts/block.woff");

    fn block(options: &AtlasOptions) -> OutlineRasterizer {
        OutlineRasterizer::from_bytes(Path::new("block.ttf"), BLOCK_TTF.to_vec(), 20.0, options).unwrap()
    }

    #[test]
    fn test_line_metrics_at_size() {
        let r = block(&AtlasOptions::default());
        assert_eq!(r.line_height(), 20);
        assert_eq!(r.baseline, 16);

        let larger = OutlineRasterizer::from_bytes(
            Path::new("block.ttf"),
            BLOCK_TTF.to_vec(),
            25.0,
            &AtlasOptions::default(),
        )
        .unwrap();
        assert_eq!(larger.line_height(), 25);
        assert_eq!(larger.baseline, 20);
    }

    #[test]
    fn test_code_points_ascending() {
        let r = block(&AtlasOptions::default());
        assert_eq!(r.code_points().collect::<Vec<_>>(), vec![0x0A, 0x20, 0x2E, 0x41, 0x67]);
    }

    #[test]
    fn test_strip_width_is_rounded_advance() {
        let r = block(&AtlasOptions::default());
        for (ch, width) in [('A', 10), ('.', 12), ('g', 10), (' ', 10)] {
            let raster = r.rasterize(ch as u32).unwrap();
            assert_eq!((raster.width(), raster.height()), (width, 20), "{ch:?}");
        }
    }

    #[test]
    fn test_glyph_sits_on_baseline() {
        let r = block(&AtlasOptions::default());
        let a = r.rasterize('A' as u32).unwrap();
        // Box covers columns 2..8 and rows 2..16.
        for (x, y) in [(5, 3), (5, 15), (3, 9), (7, 9)] {
            assert_eq!(a.get(x, y), PixelClass::Solid, "A at ({x}, {y})");
        }
        for (x, y) in [(5, 0), (5, 1), (0, 9), (9, 9), (5, 17), (5, 19)] {
            assert_eq!(a.get(x, y), PixelClass::Transparent, "A at ({x}, {y})");
        }

        // Descender reaches four rows below the baseline.
        let g = r.rasterize('g' as u32).unwrap();
        assert_eq!(g.get(5, 11), PixelClass::Solid);
        assert_eq!(g.get(5, 18), PixelClass::Solid);
        assert_eq!(g.get(5, 8), PixelClass::Transparent);

        let dot = r.rasterize('.' as u32).unwrap();
        assert_eq!(dot.get(3, 14), PixelClass::Solid);
        assert_eq!(dot.get(3, 11), PixelClass::Transparent);
        assert_eq!(dot.get(8, 14), PixelClass::Transparent);
    }

    #[test]
    fn test_space_is_blank_strip() {
        let space = block(&AtlasOptions::default()).rasterize(0x20).unwrap();
        assert_eq!(space.width(), 10);
        assert_eq!(space.ink(), 0);
    }

    #[test]
    fn test_unmapped_is_absent() {
        let r = block(&AtlasOptions::default());
        assert!(r.rasterize('B' as u32).is_none());
        assert!(r.rasterize(0xD800).is_none());
    }

    #[test]
    fn test_offsets_move_sampling_origin() {
        let r = block(&AtlasOptions {
            font_size: Some(20.0),
            glyph_offset_x: 1,
            glyph_offset_y: 2,
            ..Default::default()
        });
        let a = r.rasterize('A' as u32).unwrap();
        // Box now covers columns 3..9 and rows 4..18.
        assert_eq!(a.get(8, 10), PixelClass::Solid);
        assert_eq!(a.get(4, 17), PixelClass::Solid);
        assert_eq!(a.get(2, 10), PixelClass::Transparent);
        assert_eq!(a.get(5, 3), PixelClass::Transparent);
    }

    #[test]
    fn test_adjustments_clip_and_extend() {
        let r = block(&AtlasOptions {
            font_size: Some(20.0),
            glyph_adjust_width: -4,
            glyph_adjust_height: 2,
            ..Default::default()
        });
        assert_eq!(r.line_height(), 22);
        let a = r.rasterize('A' as u32).unwrap();
        assert_eq!((a.width(), a.height()), (6, 22));
        assert_eq!(a.get(5, 9), PixelClass::Solid);
        assert_eq!(a.get(5, 21), PixelClass::Transparent);
    }

    #[test]
    fn test_woff_renders_like_ttf() {
        let ttf = block(&AtlasOptions::default());
        let woff = OutlineRasterizer::from_bytes(
            Path::new("block.woff"),
            BLOCK_WOFF.to_vec(),
            20.0,
            &AtlasOptions::default(),
        )
        .unwrap();
        assert_eq!(woff.line_height(), ttf.line_height());
        assert!(woff.code_points().eq(ttf.code_points()));
        for cp in ttf.code_points() {
            assert_eq!(woff.rasterize(cp), ttf.rasterize(cp), "U+{cp:04X}");
        }
    }

    #[test]
    fn test_rejects_non_font_bytes() {
        let result = OutlineRasterizer::from_bytes(
            Path::new("junk.ttf"),
            b"definitely not a font".to_vec(),
            12.0,
            &AtlasOptions::with_size(12.0),
        );
        match result {
            Err(SheetError::FontParse { path, .. }) => assert_eq!(path, Path::new("junk.ttf")),
            Err(other) => panic!("expected parse error, got {other}"),
            Ok(_) => panic!("junk bytes parsed as a font"),
        }
    }

    #[test]
    fn test_reports_broken_woff2() {
        let result = OutlineRasterizer::from_bytes(
            Path::new("demo.woff2"),
            b"wOF2\0\x01\0\0".to_vec(),
            12.0,
            &AtlasOptions::with_size(12.0),
        );
        assert!(matches!(result, Err(SheetError::Woff(_))));
    }
}
