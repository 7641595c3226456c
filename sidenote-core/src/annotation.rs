//! Annotation records.

use crate::marker::MarkerId;

/// Identity of an annotation within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(u64);

impl AnnotationId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One annotated span.
///
/// The record owns its marker exclusively: whatever drops the record must
/// release the marker through the owning store.
#[derive(Debug)]
pub struct Annotation {
    pub(crate) id: AnnotationId,
    pub(crate) marker: MarkerId,
    pub(crate) visible: bool,
}

impl Annotation {
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }

    /// Whether highlighting is currently applied to this span.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
