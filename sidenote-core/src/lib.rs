//! # sidenote
//!
//! Free-form side annotations over arbitrary spans of a text document,
//! without permanently mutating the document's canonical content.
//!
//! - **Live spans**: annotation boundaries follow the text through
//!   insertions and deletions before, inside, or around them
//! - **Overlap detection**: conflicting spans are rejected at creation
//! - **Sidecar persistence**: annotations round-trip exactly through a
//!   companion file next to the document
//! - **Keep-out mode**: annotated text can be extracted from the document
//!   on save and reinserted on load, leaving the canonical file clean
//!
//! ## Quick Start
//!
//! ```rust
//! use sidenote::{Session, Span};
//!
//! # fn main() -> sidenote::Result<()> {
//! let mut session = Session::open("fable.txt", "The quick fox");
//!
//! // Annotate "quick " and query it back.
//! let id = session.create_annotation(Span::new(4, 10))?;
//! assert_eq!(session.annotation_at(7), Some(id));
//!
//! // Overlapping spans are rejected.
//! assert!(session.create_annotation(Span::new(8, 13)).is_err());
//!
//! // Edits ahead of the span move it; the annotation follows the text.
//! session.buffer_mut().insert(0, "Intro. ");
//! assert_eq!(session.span_of(id), Some(Span::new(11, 17)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Saving and loading
//!
//! ```rust,no_run
//! use sidenote::{Session, Span};
//! use std::path::Path;
//!
//! # fn main() -> sidenote::Result<()> {
//! let path = Path::new("fable.txt");
//! let mut session = Session::open("fable.txt", "The quick fox");
//! session.create_annotation(Span::new(4, 10))?;
//!
//! // Keep-out save: "quick " moves into fable.txt.sidenote and the
//! // canonical text becomes "The fox". Loading reverses it.
//! session.save(path)?;
//! assert_eq!(session.buffer().text(), "The fox");
//! session.load(path)?;
//! assert_eq!(session.buffer().text(), "The quick fox");
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub mod buffer;
pub mod error;
pub mod marker;
pub mod session;
pub mod sidecar;
pub mod store;

pub use annotation::{Annotation, AnnotationId};
pub use buffer::Buffer;
pub use error::{NoteError, Result};
pub use marker::{MarkerArena, MarkerId, Span};
pub use session::{Session, Viewport};
pub use sidecar::{sidecar_path, KeepMode, SidecarError, BANNER, SUFFIX};
pub use store::AnnotationStore;

/// Current version of sidenote
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
