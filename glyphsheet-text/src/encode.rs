//! Atlas encoding: indexed-palette and RGBA PNGs plus the alphabet files.
//!
//! Output layout under the chosen directory:
//!
//! ```text
//! palette/<name>.png       8-bit indexed, palette [white, black, magenta]
//! palette/<name>.png.dat   alphabet, UTF-8, no separators
//! rgba/<name>.png          8-bit RGBA
//! rgba/<name>.png.dat      same bytes as the palette copy
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::atlas::Atlas;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SheetError};
use crate::raster::PixelClass;

/// Palette entries in index order: Transparent, Solid, Border.
pub const PALETTE: [[u8; 3]; 3] = [[255, 255, 255], [0, 0, 0], [255, 0, 255]];

/// RGBA color for a pixel class.
pub fn rgba(class: PixelClass) -> [u8; 4] {
    match class {
        PixelClass::Transparent => [0, 0, 0, 0],
        PixelClass::Solid => [0, 0, 0, 255],
        PixelClass::Border => [255, 0, 255, 255],
    }
}

/// One palette index per pixel, row-major.
pub fn encode_palette(atlas: &Atlas) -> Vec<u8> {
    atlas.pixels().iter().map(|p| p.index()).collect()
}

/// Four bytes per pixel, row-major.
pub fn encode_rgba(atlas: &Atlas) -> Vec<u8> {
    atlas.pixels().iter().flat_map(|p| rgba(*p)).collect()
}

fn encode_png(atlas: &Atlas, color: png::ColorType, data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, atlas.width() as u32, atlas.height() as u32);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if color == png::ColorType::Indexed {
            encoder.set_palette(PALETTE.concat());
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Indexed-palette PNG bytes.
pub fn encode_palette_png(atlas: &Atlas) -> Result<Vec<u8>> {
    encode_png(atlas, png::ColorType::Indexed, &encode_palette(atlas))
}

/// RGBA PNG bytes.
pub fn encode_rgba_png(atlas: &Atlas) -> Result<Vec<u8>> {
    encode_png(atlas, png::ColorType::Rgba, &encode_rgba(atlas))
}

/// Paths of the four artifacts of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub palette_png: PathBuf,
    pub palette_dat: PathBuf,
    pub rgba_png: PathBuf,
    pub rgba_dat: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path, name: &str) -> Self {
        let png = format!("{name}.png");
        let dat = format!("{name}.png.dat");
        Self {
            palette_png: out_dir.join("palette").join(&png),
            palette_dat: out_dir.join("palette").join(&dat),
            rgba_png: out_dir.join("rgba").join(&png),
            rgba_dat: out_dir.join("rgba").join(&dat),
        }
    }
}

fn write_file(path: &Path, bytes: &[u8], diagnostics: &mut Option<&mut (dyn Diagnostics + '_)>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SheetError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| SheetError::io(path, e))?;
    let mut w = BufWriter::new(file);
    w.write_all(bytes)
        .and_then(|()| w.flush())
        .map_err(|e| SheetError::io(path, e))?;
    if let Some(sink) = diagnostics.as_deref_mut() {
        sink.artifact_written(path);
    }
    Ok(())
}

/// Write both images and both alphabet files for `atlas`.
pub fn write_outputs(
    out_dir: &Path,
    name: &str,
    atlas: &Atlas,
    mut diagnostics: Option<&mut (dyn Diagnostics + '_)>,
) -> Result<OutputPaths> {
    let paths = OutputPaths::new(out_dir, name);
    let alphabet = atlas.alphabet();

    write_file(&paths.palette_png, &encode_palette_png(atlas)?, &mut diagnostics)?;
    write_file(&paths.palette_dat, alphabet.as_bytes(), &mut diagnostics)?;
    write_file(&paths.rgba_png, &encode_rgba_png(atlas)?, &mut diagnostics)?;
    write_file(&paths.rgba_dat, alphabet.as_bytes(), &mut diagnostics)?;

    Ok(paths)
}
