//! Live span tracking.
//!
//! An annotation is anchored to the document by a marker: a position pair
//! that follows the text as it is edited. Editors that expose native
//! markers hand these out directly; here the arena keeps every span in one
//! table and adjusts all of them in a single pass per edit.

/// Handle to a span owned by a [`MarkerArena`].
///
/// Ids are never reused within one arena; a released marker's id stays
/// dead for the lifetime of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(u32);

/// A half-open byte range `[start, end)` into document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` falls inside the span (`start <= pos < end`).
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Arena of live spans, adjusted together on every edit.
#[derive(Debug, Default)]
pub struct MarkerArena {
    slots: Vec<Option<Span>>,
}

impl MarkerArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a marker over `span`.
    pub fn alloc(&mut self, span: Span) -> MarkerId {
        let id = MarkerId(self.slots.len() as u32);
        self.slots.push(Some(span));
        id
    }

    /// Release a marker. Releasing an already-dead id is a no-op.
    pub fn release(&mut self, id: MarkerId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    /// Current span of a marker, or `None` once released.
    pub fn get(&self, id: MarkerId) -> Option<Span> {
        self.slots.get(id.0 as usize).copied().flatten()
    }

    /// Number of live markers.
    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Shift every live span for an insertion of `len` bytes at `pos`.
    ///
    /// Insertion at a span's start shifts the whole span (the inserted
    /// text is not captured); insertion strictly inside grows the span;
    /// insertion at or after the end leaves it alone.
    pub fn adjust_insert(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        for span in self.slots.iter_mut().flatten() {
            if pos <= span.start {
                span.start += len;
                span.end += len;
            } else if pos < span.end {
                span.end += len;
            }
        }
    }

    /// Shift every live span for a deletion of `[start, end)`.
    ///
    /// Boundaries inside the deleted range collapse onto `start`; a span
    /// fully contained in the deletion becomes zero-width but stays
    /// allocated (cleanup is the store's job, not the arena's).
    pub fn adjust_delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let removed = end - start;
        let clamp = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - removed
            } else {
                start
            }
        };
        for span in self.slots.iter_mut().flatten() {
            span.start = clamp(span.start);
            span.end = clamp(span.end);
        }
    }
}
