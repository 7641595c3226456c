//! Ordered collection of annotations for one buffer, plus the overlap
//! queries used to reject conflicting spans.
//!
//! Records keep insertion order; persistence sorts by start offset at the
//! point of use. Point and range queries walk store order, so the first
//! match wins even if overlapping ranges were ever to slip in.

use crate::annotation::{Annotation, AnnotationId};
use crate::buffer::Buffer;
use crate::error::{NoteError, Result};
use crate::marker::Span;

/// All annotations of one document session.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    entries: Vec<Annotation>,
    next_id: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate records in store (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter()
    }

    /// Current span of an annotation, or `None` for a dead id or a
    /// released marker.
    pub fn span_of(&self, buffer: &Buffer, id: AnnotationId) -> Option<Span> {
        self.entries
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| buffer.span(a.marker))
    }

    /// Create an annotation over `span`.
    ///
    /// Rejects empty spans, spans that leave the buffer or split a
    /// multibyte char, and any span intersecting a live annotation.
    /// On success the new record is appended and the buffer marked dirty.
    pub fn create(&mut self, buffer: &mut Buffer, span: Span) -> Result<AnnotationId> {
        if span.is_empty()
            || span.end > buffer.len()
            || !buffer.text().is_char_boundary(span.start)
            || !buffer.text().is_char_boundary(span.end)
        {
            return Err(NoteError::InvalidSpan {
                start: span.start,
                end: span.end,
            });
        }
        if !self.annotations_overlapping(buffer, span.start, span.end).is_empty() {
            return Err(NoteError::Overlap {
                start: span.start,
                end: span.end,
            });
        }
        let marker = buffer.create_marker(span);
        let id = AnnotationId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(Annotation {
            id,
            marker,
            visible: true,
        });
        buffer.mark_dirty();
        Ok(id)
    }

    /// Remove an annotation, releasing its marker.
    pub fn remove(&mut self, buffer: &mut Buffer, id: AnnotationId) -> Result<()> {
        let idx = self
            .entries
            .iter()
            .position(|a| a.id == id)
            .ok_or(NoteError::NotFound(id))?;
        let record = self.entries.remove(idx);
        buffer.release_marker(record.marker);
        buffer.mark_dirty();
        Ok(())
    }

    /// Purge detached and zero-width records, returning the survivors
    /// sorted ascending by start offset.
    ///
    /// Must run immediately before any persistence pass; stale entries
    /// must never reach the sidecar file.
    pub fn clean_up(&mut self, buffer: &mut Buffer) -> Vec<(AnnotationId, Span)> {
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut survivors = Vec::with_capacity(self.entries.len());
        for record in self.entries.drain(..) {
            match buffer.span(record.marker) {
                Some(span) if !span.is_empty() => {
                    survivors.push((record.id, span));
                    kept.push(record);
                }
                _ => buffer.release_marker(record.marker),
            }
        }
        self.entries = kept;
        survivors.sort_by_key(|(_, span)| span.start);
        survivors
    }

    /// Drop every record, releasing all markers.
    pub fn clear(&mut self, buffer: &mut Buffer) {
        for record in self.entries.drain(..) {
            buffer.release_marker(record.marker);
        }
    }

    /// Apply a visibility flag to every live record.
    pub fn set_visible(&mut self, visible: bool) {
        for record in &mut self.entries {
            record.visible = visible;
        }
    }

    /// First annotation, in store order, whose span contains `pos`.
    ///
    /// Store order is the tie-break, not position order; callers must not
    /// assume the match is the nearest one.
    pub fn annotation_at(&self, buffer: &Buffer, pos: usize) -> Option<AnnotationId> {
        self.entries
            .iter()
            .find(|a| buffer.span(a.marker).is_some_and(|s| s.contains(pos)))
            .map(|a| a.id)
    }

    /// Every annotation intersecting `[start, end)`, in store order.
    ///
    /// The three clauses are deliberately asymmetric about open and
    /// closed interval ends; a simplified intersection test does not
    /// classify boundary-touching spans the same way.
    pub fn annotations_overlapping(
        &self,
        buffer: &Buffer,
        start: usize,
        end: usize,
    ) -> Vec<AnnotationId> {
        self.entries
            .iter()
            .filter(|a| {
                buffer.span(a.marker).is_some_and(|s| {
                    (s.start >= start && s.start < end)
                        || (s.end > start && s.end <= end)
                        || (s.start < start && s.end > end)
                })
            })
            .map(|a| a.id)
            .collect()
    }
}
