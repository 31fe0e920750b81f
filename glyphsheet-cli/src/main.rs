//! `glyphsheet`: convert a font file into a single-strip glyph atlas.
//!
//! ```text
//! glyphsheet FONT [-n NAME] [-o DIR] [-s SIZE] [--config FILE]
//!            [--offset-x N] [--offset-y N] [--adjust-width N] [--adjust-height N]
//! ```
//!
//! Writes `DIR/palette/NAME.png`, `DIR/rgba/NAME.png` and their `.dat`
//! alphabet companions.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glyphsheet_text::{create_font, AtlasOptions, LogDiagnostics};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "glyphsheet", about = "Generate a glyph strip atlas from a font file")]
struct Args {
    /// Input font (.otf, .ttf, .woff, .woff2 or .bdf)
    #[arg(value_name = "FONT")]
    font: PathBuf,

    /// Base name of the output files [default: font file stem]
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "outputs")]
    output: PathBuf,

    /// Pixel size for outline fonts
    #[arg(short, long)]
    size: Option<f32>,

    /// JSON options file; flags override its fields
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Horizontal glyph offset in pixels
    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<i32>,

    /// Vertical glyph offset in pixels
    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<i32>,

    /// Added to every glyph advance width
    #[arg(long, allow_negative_numbers = true)]
    adjust_width: Option<i32>,

    /// Added to the line height
    #[arg(long, allow_negative_numbers = true)]
    adjust_height: Option<i32>,
}

impl Args {
    /// Output base name: `--name`, else the font file stem.
    fn output_name(&self) -> anyhow::Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }
        self.font
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_owned)
            .with_context(|| format!("cannot derive an output name from {}", self.font.display()))
    }

    /// Layer flag values over `base`.
    fn apply(&self, mut base: AtlasOptions) -> AtlasOptions {
        if let Some(size) = self.size {
            base.font_size = Some(size);
        }
        if let Some(v) = self.offset_x {
            base.glyph_offset_x = v;
        }
        if let Some(v) = self.offset_y {
            base.glyph_offset_y = v;
        }
        if let Some(v) = self.adjust_width {
            base.glyph_adjust_width = v;
        }
        if let Some(v) = self.adjust_height {
            base.glyph_adjust_height = v;
        }
        base
    }

    fn options(&self) -> anyhow::Result<AtlasOptions> {
        let base = match &self.config {
            Some(path) => AtlasOptions::from_json_file(path)
                .with_context(|| format!("loading options from {}", path.display()))?,
            None => AtlasOptions::default(),
        };
        Ok(self.apply(base))
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let name = args.output_name()?;
    let options = args.options()?;
    let mut diagnostics = LogDiagnostics;

    let summary = create_font(&args.font, &name, &args.output, &options, Some(&mut diagnostics))
        .with_context(|| format!("converting {}", args.font.display()))?;

    info!(
        "{} glyphs, atlas {}x{}",
        summary.glyph_count, summary.width, summary.height
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)
}

// ====================================================================
// Tests
// ====================================================================
