//! Sidecar file format.
//!
//! One sidecar per annotated document, stored next to it at the document
//! path plus [`SUFFIX`]. Layout:
//!
//! ```text
//! generated by sidenote. DO NOT EDIT.
//! <document base file name>
//! YYYY-MM-DD HH:MM:SS
//! IN|OUT
//! <position>,<length>
//! <exactly length bytes of raw content>
//! <newline>
//! ...
//! ```
//!
//! Positions are 1-based offsets into the document at time of save, one
//! block per annotation in ascending start order. Content is written
//! verbatim with no escaping; a literal newline inside a block is
//! preserved, and the reader relies on the declared length, never on
//! line delimiters, to know where content ends.

pub mod reader;
pub mod writer;

pub use self::reader::{parse, SidecarFile};
pub use self::writer::serialize;

use std::path::{Path, PathBuf};

/// First line of every sidecar file.
pub const BANNER: &str = "generated by sidenote. DO NOT EDIT.";

/// Suffix appended to the document path to form the sidecar path.
pub const SUFFIX: &str = ".sidenote";

/// Sidecar path for a document path.
pub fn sidecar_path(doc_path: &Path) -> PathBuf {
    let mut os = doc_path.as_os_str().to_os_string();
    os.push(SUFFIX);
    PathBuf::from(os)
}

/// Keep-mode recorded on line 4 of the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepMode {
    /// Annotation content stays inline in the document after save.
    In,
    /// Annotation content is extracted out of the document on save and
    /// reinserted on load.
    Out,
}

impl KeepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepMode::In => "IN",
            KeepMode::Out => "OUT",
        }
    }
}

impl std::fmt::Display for KeepMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotation block: a 0-based document position and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub position: usize,
    pub content: String,
}

impl Record {
    /// Length of the content in bytes, as declared in the block header.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// End offset of the span this record covers.
    pub fn end(&self) -> usize {
        self.position + self.content.len()
    }
}

/// Result type for sidecar operations.
pub type SidecarResult<T> = Result<T, SidecarError>;

/// Sidecar parse and write errors.
///
/// A malformed sidecar is fatal for the load that hit it; the loader
/// never guesses its way past a bad header or a truncated block.
#[derive(Debug, thiserror::Error)]
pub enum SidecarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid sidecar banner")]
    InvalidBanner,

    #[error("truncated sidecar header")]
    TruncatedHeader,

    #[error("invalid keep-mode line: {0:?}")]
    InvalidMode(String),

    #[error("invalid record header: {0:?}")]
    InvalidRecordHeader(String),

    #[error("record declares {declared} bytes but only {available} remain")]
    TruncatedContent { declared: usize, available: usize },

    #[error("missing separator after record content")]
    MissingSeparator,

    #[error("sidecar content is not valid UTF-8")]
    InvalidUtf8,

    #[error("record position {position} invalid for document of length {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path_appends_suffix() {
        let path = sidecar_path(Path::new("/tmp/notes/report.md"));
        assert_eq!(path, Path::new("/tmp/notes/report.md.sidenote"));
    }

    #[test]
    fn test_keep_mode_display() {
        assert_eq!(KeepMode::In.to_string(), "IN");
        assert_eq!(KeepMode::Out.to_string(), "OUT");
    }

    #[test]
    fn test_record_end() {
        let record = Record {
            position: 4,
            content: "quick ".to_string(),
        };
        assert_eq!(record.len(), 6);
        assert_eq!(record.end(), 10);
    }
}
