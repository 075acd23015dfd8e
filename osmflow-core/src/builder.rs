//! Reusable in-progress object slot shared by the format readers.
//!
//! A reader owns one [`ObjectBuilder`]. It begins an object, populates it
//! field by field as tokens arrive, then finishes it and hands the borrowed
//! result to a handler. Each kind keeps its own slot so that allocations are
//! reused across a run of objects of the same kind; the slot is reset when
//! the next object begins rather than when the previous one ends.

use crate::{ModelError, ObjectKind, ObjectMeta, ObjectRef, Point, Relation, Way};

/// Owned builder holding at most one in-progress object.
///
/// # Examples
/// ```
/// use osmflow_core::{ObjectBuilder, ObjectKind, ObjectRef};
///
/// let mut builder = ObjectBuilder::new();
/// builder.begin(ObjectKind::Way, true);
/// builder.set_id(2);
/// if let Some(way) = builder.way_mut() {
///     way.add_node(1);
///     way.add_node(1);
/// }
///
/// match builder.finish()? {
///     ObjectRef::Way(way) => assert_eq!(way.nodes, vec![1, 1]),
///     other => panic!("unexpected object {other:?}"),
/// }
/// assert_eq!(builder.kind(), None);
/// # Ok::<(), osmflow_core::ModelError>(())
/// ```
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    kind: Option<ObjectKind>,
    has_id: bool,
    point: Point,
    way: Way,
    relation: Relation,
}

impl ObjectBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new object of `kind`, discarding anything still in progress.
    pub fn begin(&mut self, kind: ObjectKind, visible: bool) {
        match kind {
            ObjectKind::Point => self.point.reset(),
            ObjectKind::Way => self.way.reset(),
            ObjectKind::Relation => self.relation.reset(),
        }
        self.kind = Some(kind);
        self.has_id = false;
        if let Some(meta) = self.meta_mut() {
            meta.visible = visible;
        }
    }

    /// Kind of the object in progress.
    #[must_use]
    pub const fn kind(&self) -> Option<ObjectKind> {
        self.kind
    }

    /// Whether an object is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// Set the identifier of the object in progress.
    pub fn set_id(&mut self, id: i64) {
        if let Some(meta) = self.meta_mut() {
            meta.id = id;
            self.has_id = true;
        }
    }

    /// Shared attributes of the object in progress.
    pub fn meta_mut(&mut self) -> Option<&mut ObjectMeta> {
        match self.kind? {
            ObjectKind::Point => Some(&mut self.point.meta),
            ObjectKind::Way => Some(&mut self.way.meta),
            ObjectKind::Relation => Some(&mut self.relation.meta),
        }
    }

    /// The point in progress, if the current kind is a point.
    pub fn point_mut(&mut self) -> Option<&mut Point> {
        (self.kind == Some(ObjectKind::Point)).then_some(&mut self.point)
    }

    /// The way in progress, if the current kind is a way.
    pub fn way_mut(&mut self) -> Option<&mut Way> {
        (self.kind == Some(ObjectKind::Way)).then_some(&mut self.way)
    }

    /// The relation in progress, if the current kind is a relation.
    pub fn relation_mut(&mut self) -> Option<&mut Relation> {
        (self.kind == Some(ObjectKind::Relation)).then_some(&mut self.relation)
    }

    /// Drop the object in progress without finishing it.
    pub fn abandon(&mut self) {
        self.kind = None;
    }

    /// Complete the object in progress and clear the slot.
    ///
    /// Returns `Ok(None)` when nothing was in progress.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingIdentifier`] when no identifier was set.
    pub fn try_finish(&mut self) -> Result<Option<ObjectRef<'_>>, ModelError> {
        let Some(kind) = self.kind.take() else {
            return Ok(None);
        };
        if !self.has_id {
            return Err(ModelError::MissingIdentifier { kind });
        }
        Ok(Some(match kind {
            ObjectKind::Point => ObjectRef::Point(&self.point),
            ObjectKind::Way => ObjectRef::Way(&self.way),
            ObjectKind::Relation => ObjectRef::Relation(&self.relation),
        }))
    }

    /// Complete the object in progress, which must exist.
    ///
    /// # Errors
    /// Returns [`ModelError::NothingInProgress`] when no object was begun
    /// and [`ModelError::MissingIdentifier`] when no identifier was set.
    pub fn finish(&mut self) -> Result<ObjectRef<'_>, ModelError> {
        self.try_finish()?.ok_or(ModelError::NothingInProgress)
    }
}
