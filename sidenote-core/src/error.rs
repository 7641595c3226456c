use crate::annotation::AnnotationId;
use crate::sidecar::SidecarError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("span {start}..{end} overlaps an existing annotation")]
    Overlap { start: usize, end: usize },

    #[error("invalid span {start}..{end}")]
    InvalidSpan { start: usize, end: usize },

    #[error("no annotation {0}")]
    NotFound(AnnotationId),

    #[error("no annotation at position {0}")]
    NoAnnotationAt(usize),

    #[error("sidecar error: {0}")]
    Sidecar(#[from] SidecarError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NoteError>;
