//! Outline fonts end to end: TTF, WOFF and WOFF2 fixtures under `tests/fonts`.
//!
//! `SourceCodePro-Medium.woff2` is distributed under the SIL Open Font
//! License (see `tests/fonts/SOURCE-CODE-PRO-LICENSE.txt`).

use std::fs;
use std::path::PathBuf;

use glyphsheet_text::{
    create_font, locate_strips, pack, AtlasOptions, FontFormat, FontSource, PixelClass, RecordingDiagnostics,
    SheetError, SkipReason,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fonts").join(name)
}

#[test]
fn test_ttf_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = RecordingDiagnostics::default();
    let summary = create_font(
        fixture("block.ttf"),
        "block",
        dir.path(),
        &AtlasOptions::with_size(20.0),
        Some(&mut recorder),
    )
    .unwrap();

    // U+000A maps to a real glyph but is a control character.
    assert_eq!(summary.alphabet, " .Ag");
    assert_eq!(summary.glyph_count, 4);
    assert_eq!(summary.width, 1 + (10 + 1) + (12 + 1) + (10 + 1) + (10 + 1));
    assert_eq!(summary.height, 21);
    assert_eq!(recorder.skipped, vec![(0x0A, SkipReason::NotPrintable)]);
    assert_eq!(fs::read_to_string(&summary.outputs.rgba_dat).unwrap(), " .Ag");
}

#[test]
fn test_woff_matches_ttf_output() {
    let dir = tempfile::tempdir().unwrap();
    let options = AtlasOptions::with_size(20.0);
    let ttf = create_font(fixture("block.ttf"), "block", dir.path().join("ttf"), &options, None).unwrap();
    let woff = create_font(fixture("block.woff"), "block", dir.path().join("woff"), &options, None).unwrap();

    assert_eq!(ttf.alphabet, woff.alphabet);
    assert_eq!(
        fs::read(&ttf.outputs.palette_png).unwrap(),
        fs::read(&woff.outputs.palette_png).unwrap()
    );
    assert_eq!(fs::read(&ttf.outputs.rgba_png).unwrap(), fs::read(&woff.outputs.rgba_png).unwrap());
}

#[test]
fn test_woff2_face_produces_glyphs() {
    let source = FontSource::open(fixture("SourceCodePro-Medium.woff2"), &AtlasOptions::with_size(16.0)).unwrap();
    assert_eq!(source.format(), FontFormat::Outline);

    let atlas = pack(&source, None);
    let alphabet = atlas.alphabet();
    assert!(atlas.glyph_count() > 90, "only {} glyphs", atlas.glyph_count());
    for ch in ['A', 'z', '0', '~', ' '] {
        assert!(alphabet.contains(ch), "{ch:?} missing");
    }
    // Byte order mark and private-use icons are mapped but not printable.
    assert!(!alphabet.contains('\u{feff}'));
    assert!(!alphabet.contains('\u{e0a0}'));

    let located = locate_strips(&atlas);
    let recorded: Vec<_> = atlas.strips().iter().map(|s| (s.x, s.width)).collect();
    assert_eq!(located, recorded);

    let a = atlas.strips().iter().find(|s| s.ch == 'A').unwrap();
    let ink = (0..atlas.height() - 1)
        .flat_map(|y| (a.x..a.x + a.width).map(move |x| (x, y)))
        .filter(|&(x, y)| atlas.pixel(x, y) == PixelClass::Solid)
        .count();
    assert!(ink > 0, "'A' rendered without ink");
}

#[test]
fn test_woff2_without_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let err = create_font(fixture("SourceCodePro-Medium.woff2"), "scp", &out, &AtlasOptions::default(), None)
        .unwrap_err();
    assert!(matches!(err, SheetError::MissingFontSize(_)));
    assert!(!out.exists());
}
