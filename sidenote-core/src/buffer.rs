//! In-memory host buffer.
//!
//! Stands in for the editor buffer the annotation layer normally lives
//! inside: text plus a cursor, a scroll offset, a dirty flag, the marker
//! arena, and an undo log that can be suspended while the annotation
//! layer rewrites the buffer behind the user's back.
//!
//! All positions are byte offsets into UTF-8 text and must lie on char
//! boundaries, the same contract as [`String::insert_str`].

use crate::marker::{MarkerArena, MarkerId, Span};

/// One recorded inverse edit.
#[derive(Debug, Clone)]
enum Edit {
    /// Re-insert `text` at `pos` (inverse of a deletion).
    Insert { pos: usize, text: String },
    /// Delete `[start, end)` (inverse of an insertion).
    Delete { start: usize, end: usize },
}

/// Undo log with depth-counted suspension.
#[derive(Debug, Default)]
struct UndoLog {
    edits: Vec<Edit>,
    suspended: u32,
}

impl UndoLog {
    fn record(&mut self, edit: Edit) {
        if self.suspended == 0 {
            self.edits.push(edit);
        }
    }
}

/// A text buffer with live markers and undo history.
#[derive(Debug)]
pub struct Buffer {
    text: String,
    name: String,
    /// Point position, a byte offset into `text`.
    pub cursor: usize,
    /// First visible offset of the window.
    pub scroll_top: usize,
    dirty: bool,
    markers: MarkerArena,
    undo: UndoLog,
}

impl Buffer {
    /// Create a buffer named `name` holding `text`. Starts clean, with
    /// the cursor at the top.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: name.into(),
            cursor: 0,
            scroll_top: 0,
            dirty: false,
            markers: MarkerArena::new(),
            undo: UndoLog::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the buffer text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the buffer has modifications not yet saved by the host.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Allocate a live marker over `span`.
    pub fn create_marker(&mut self, span: Span) -> MarkerId {
        self.markers.alloc(span)
    }

    /// Release a marker. Releasing a dead id is a no-op.
    pub fn release_marker(&mut self, id: MarkerId) {
        self.markers.release(id);
    }

    /// Current span of a marker, or `None` once released.
    pub fn span(&self, id: MarkerId) -> Option<Span> {
        self.markers.get(id)
    }

    /// Number of live markers.
    pub fn live_marker_count(&self) -> usize {
        self.markers.live_count()
    }

    /// Insert `text` at byte offset `pos`, shifting markers.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds or not on a char boundary.
    pub fn insert(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.insert_str(pos, text);
        self.markers.adjust_insert(pos, text.len());
        self.undo.record(Edit::Delete {
            start: pos,
            end: pos + text.len(),
        });
        self.dirty = true;
    }

    /// Delete `[start, end)`, shifting markers, and return the removed
    /// text.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or not on char boundaries.
    pub fn delete(&mut self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let removed: String = self.text.drain(start..end).collect();
        self.markers.adjust_delete(start, end);
        self.undo.record(Edit::Insert {
            pos: start,
            text: removed.clone(),
        });
        self.dirty = true;
        removed
    }

    /// Revert the most recent recorded edit. Returns false when the log
    /// is empty.
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.undo.edits.pop() else {
            return false;
        };
        // Replaying must not re-record.
        self.suspend_undo();
        match edit {
            Edit::Insert { pos, text } => self.insert(pos, &text),
            Edit::Delete { start, end } => {
                self.delete(start, end);
            }
        }
        self.resume_undo();
        true
    }

    /// Number of edits currently on the undo log.
    pub fn undo_depth(&self) -> usize {
        self.undo.edits.len()
    }

    /// Stop recording edits. Suspensions nest; every call must be paired
    /// with [`Buffer::resume_undo`] on all exit paths.
    pub fn suspend_undo(&mut self) {
        self.undo.suspended += 1;
    }

    pub fn resume_undo(&mut self) {
        debug_assert!(self.undo.suspended > 0, "unbalanced resume_undo");
        self.undo.suspended = self.undo.suspended.saturating_sub(1);
    }

    /// Whether undo recording is currently live.
    pub fn undo_enabled(&self) -> bool {
        self.undo.suspended == 0
    }
}
