//! Error type shared by every stage of the atlas pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout `glyphsheet-text`.
pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Font file type not supported: {0:?}")]
    UnsupportedFormat(String),
    #[error("Outline font {} needs a font size", .0.display())]
    MissingFontSize(PathBuf),
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse font {}: {reason}", path.display())]
    FontParse { path: PathBuf, reason: String },
    #[error("BDF parse error at line {line}: {reason}")]
    Bdf { line: usize, reason: String },
    #[error("WOFF container error: {0}")]
    Woff(String),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Invalid options file {}: {source}", path.display())]
    Options {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SheetError {
    /// Wrap an I/O error together with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn bdf(line: usize, reason: impl Into<String>) -> Self {
        Self::Bdf {
            line,
            reason: reason.into(),
        }
    }
}
