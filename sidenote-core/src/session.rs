//! Per-document annotation session.
//!
//! One `Session` per open document: the buffer, its annotation store, the
//! document-wide show/keep flags, and the viewport snapshot carried
//! across a save/load pair. Initialized when the document opens, torn
//! down when it closes; nothing here is global.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::annotation::{Annotation, AnnotationId};
use crate::buffer::Buffer;
use crate::error::{NoteError, Result};
use crate::marker::Span;
use crate::sidecar::{self, KeepMode, Record, SidecarError, SidecarFile};
use crate::store::AnnotationStore;

/// Cursor and scroll position saved during a save phase and consumed by
/// the immediately following load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cursor: usize,
    pub scroll_top: usize,
}

/// Annotation state for one open document.
#[derive(Debug)]
pub struct Session {
    buffer: Buffer,
    store: AnnotationStore,
    show: bool,
    keep: bool,
    viewport: Option<Viewport>,
}

impl Session {
    /// Wrap an existing buffer. Annotations start visible, keep-out.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            store: AnnotationStore::new(),
            show: true,
            keep: false,
            viewport: None,
        }
    }

    /// Convenience constructor for a fresh named buffer.
    pub fn open(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Buffer::new(name, text))
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Whether annotation highlighting is applied.
    pub fn show(&self) -> bool {
        self.show
    }

    /// Whether annotation content stays inline in the document on save.
    pub fn keep(&self) -> bool {
        self.keep
    }

    /// Pending viewport snapshot, if a save is awaiting its paired load.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Annotate `span`. Fails on empty spans and on any overlap with an
    /// existing annotation.
    pub fn create_annotation(&mut self, span: Span) -> Result<AnnotationId> {
        let id = self.store.create(&mut self.buffer, span)?;
        debug!(%id, %span, "annotation created");
        Ok(id)
    }

    /// Remove the annotation covering `pos`, if any.
    pub fn remove_annotation_at(&mut self, pos: usize) -> Result<AnnotationId> {
        let id = self
            .store
            .annotation_at(&self.buffer, pos)
            .ok_or(NoteError::NoAnnotationAt(pos))?;
        self.store.remove(&mut self.buffer, id)?;
        debug!(%id, pos, "annotation removed");
        Ok(id)
    }

    pub fn remove_annotation(&mut self, id: AnnotationId) -> Result<()> {
        self.store.remove(&mut self.buffer, id)
    }

    /// First annotation covering `pos`, in store order.
    pub fn annotation_at(&self, pos: usize) -> Option<AnnotationId> {
        self.store.annotation_at(&self.buffer, pos)
    }

    /// Every annotation intersecting `[start, end)`, in store order.
    pub fn annotations_overlapping(&self, start: usize, end: usize) -> Vec<AnnotationId> {
        self.store.annotations_overlapping(&self.buffer, start, end)
    }

    /// Current span of an annotation.
    pub fn span_of(&self, id: AnnotationId) -> Option<Span> {
        self.store.span_of(&self.buffer, id)
    }

    /// Live annotations with their current spans, sorted by start.
    pub fn annotations(&self) -> Vec<(AnnotationId, Span)> {
        let mut all: Vec<_> = self
            .store
            .iter()
            .filter_map(|a: &Annotation| Some((a.id(), self.buffer.span(a.marker())?)))
            .collect();
        all.sort_by_key(|(_, span)| span.start);
        all
    }

    /// Flip highlighting for every annotation. Returns the status line.
    pub fn toggle_show(&mut self) -> String {
        self.set_show(!self.show);
        self.status_line()
    }

    pub fn set_show(&mut self, show: bool) {
        self.show = show;
        self.store.set_visible(show);
    }

    /// Flip the keep-mode. A content-affecting decision even though no
    /// bytes change yet, so the buffer goes dirty. Returns the status
    /// line.
    pub fn toggle_keep(&mut self) -> String {
        self.set_keep(!self.keep);
        self.status_line()
    }

    pub fn set_keep(&mut self, keep: bool) {
        if self.keep != keep {
            self.keep = keep;
            self.buffer.mark_dirty();
        }
    }

    /// Human-readable `(show|hide, keep-in|keep-out)` state.
    pub fn status_line(&self) -> String {
        format!(
            "({}, {})",
            if self.show { "show" } else { "hide" },
            if self.keep { "keep-in" } else { "keep-out" }
        )
    }

    /// Drain the store into the sidecar file for `doc_path`.
    ///
    /// With no surviving annotations the sidecar is deleted instead. In
    /// keep-out mode every annotated span is stripped from the buffer,
    /// but only once the sidecar has been fully written; an I/O failure
    /// leaves the document untouched. The pass runs with undo recording
    /// suspended and never shows up in user-visible history.
    pub fn save(&mut self, doc_path: &Path) -> Result<()> {
        let survivors = self.store.clean_up(&mut self.buffer);
        let sidecar_path = sidecar::sidecar_path(doc_path);
        if survivors.is_empty() {
            if sidecar_path.exists() {
                fs::remove_file(&sidecar_path)?;
                debug!(path = %sidecar_path.display(), "sidecar removed");
            }
            return Ok(());
        }
        self.viewport = Some(Viewport {
            cursor: self.buffer.cursor,
            scroll_top: self.buffer.scroll_top,
        });
        self.buffer.suspend_undo();
        let result = self.save_inner(doc_path, &sidecar_path, &survivors);
        self.buffer.resume_undo();
        if result.is_err() {
            // A stale snapshot must not leak into some later load.
            self.viewport = None;
        }
        result
    }

    fn save_inner(
        &mut self,
        doc_path: &Path,
        sidecar_path: &Path,
        survivors: &[(AnnotationId, Span)],
    ) -> Result<()> {
        let records: Vec<Record> = survivors
            .iter()
            .map(|(_, span)| Record {
                position: span.start,
                content: self.buffer.text()[span.start..span.end].to_string(),
            })
            .collect();
        let mode = if self.keep { KeepMode::In } else { KeepMode::Out };
        let doc_name = doc_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.buffer.name().to_string());
        let bytes = sidecar::serialize(&doc_name, mode, &records);
        // The one write that matters: nothing below runs unless it lands.
        fs::write(sidecar_path, &bytes)?;
        if !self.keep {
            for (id, _) in survivors {
                // Markers auto-adjust as earlier spans vanish; re-read
                // each one instead of trusting the snapshot.
                if let Some(span) = self.store.span_of(&self.buffer, *id) {
                    self.buffer.delete(span.start, span.end);
                }
            }
        }
        self.store.clear(&mut self.buffer);
        info!(
            path = %sidecar_path.display(),
            records = records.len(),
            %mode,
            "sidecar written"
        );
        Ok(())
    }

    /// Rebuild the store from the sidecar file for `doc_path`.
    ///
    /// Missing sidecar is a no-op. The file is parsed in full before the
    /// buffer is touched; any malformed header or truncated block fails
    /// the load with the document unchanged. Returns whether a sidecar
    /// was loaded.
    pub fn load(&mut self, doc_path: &Path) -> Result<bool> {
        let sidecar_path = sidecar::sidecar_path(doc_path);
        if !sidecar_path.exists() {
            return Ok(false);
        }
        let bytes = fs::read(&sidecar_path)?;
        let file = sidecar::parse(&bytes)?;

        self.buffer.suspend_undo();
        let result = self.apply_sidecar(&file);
        self.buffer.resume_undo();
        result?;

        if let Some(viewport) = self.viewport.take() {
            self.buffer.cursor = viewport.cursor;
            self.buffer.scroll_top = viewport.scroll_top;
        }
        self.store.set_visible(self.show);
        self.buffer.mark_saved();
        info!(
            path = %sidecar_path.display(),
            records = file.records.len(),
            "sidecar loaded {}",
            self.status_line()
        );
        Ok(true)
    }

    fn apply_sidecar(&mut self, file: &SidecarFile) -> Result<()> {
        self.keep = file.mode == KeepMode::In;
        for record in &file.records {
            match file.mode {
                KeepMode::Out => {
                    if record.position > self.buffer.len()
                        || !self.buffer.text().is_char_boundary(record.position)
                    {
                        return Err(SidecarError::PositionOutOfRange {
                            position: record.position,
                            len: self.buffer.len(),
                        }
                        .into());
                    }
                    self.buffer.insert(record.position, &record.content);
                }
                KeepMode::In => {
                    if record.end() > self.buffer.len()
                        || !self.buffer.text().is_char_boundary(record.position)
                        || !self.buffer.text().is_char_boundary(record.end())
                    {
                        return Err(SidecarError::PositionOutOfRange {
                            position: record.position,
                            len: self.buffer.len(),
                        }
                        .into());
                    }
                }
            }
            self.store
                .create(&mut self.buffer, Span::new(record.position, record.end()))?;
        }
        Ok(())
    }
}
