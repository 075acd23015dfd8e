//! Push-based consumer contract for object streams.
//!
//! A reader calls a [`Handler`] synchronously for every section boundary and
//! every finished object. All callbacks default to doing nothing, so a
//! handler overrides only what it needs. Returning [`StopRequested`] from a
//! callback ends the pass early: the reader stops before the next token,
//! makes no further per-object calls and still calls [`Handler::finished`].

use thiserror::Error;

use crate::{ObjectKind, ObjectRef, Point, Relation, Way};

/// Signal returned by a handler to end the pass early.
///
/// Stopping is not a failure; readers report it as a successful pass that
/// did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("handler requested that reading stop")]
pub struct StopRequested;

/// Result type of every handler callback.
pub type HandlerResult = Result<(), StopRequested>;

/// Receiver of section and object events.
///
/// Within one pass every point precedes every way, which precedes every
/// relation. Each kind's run is bracketed by exactly one `before_*`/`after_*`
/// pair, even when the run is empty. Objects are lent for the duration of a
/// single call; copy them to keep them.
///
/// Handlers compose by delegation: a wrapper holds an inner handler and
/// forwards the calls it does not intercept.
///
/// # Examples
/// ```
/// use osmflow_core::{Handler, HandlerResult, Point, StopRequested};
///
/// /// Collects point names and stops once the points are done.
/// #[derive(Default)]
/// struct Names(Vec<String>);
///
/// impl Handler for Names {
///     fn point(&mut self, point: &Point) -> HandlerResult {
///         if let Some(name) = point.meta.tags.get("name") {
///             self.0.push(name.to_owned());
///         }
///         Ok(())
///     }
///
///     fn after_points(&mut self) -> HandlerResult {
///         Err(StopRequested)
///     }
/// }
/// ```
pub trait Handler {
    /// A run of points is about to start.
    fn before_points(&mut self) -> HandlerResult {
        Ok(())
    }

    /// A point has been read.
    fn point(&mut self, point: &Point) -> HandlerResult {
        let _ = point;
        Ok(())
    }

    /// The run of points has ended.
    fn after_points(&mut self) -> HandlerResult {
        Ok(())
    }

    /// A run of ways is about to start.
    fn before_ways(&mut self) -> HandlerResult {
        Ok(())
    }

    /// A way has been read.
    fn way(&mut self, way: &Way) -> HandlerResult {
        let _ = way;
        Ok(())
    }

    /// The run of ways has ended.
    fn after_ways(&mut self) -> HandlerResult {
        Ok(())
    }

    /// A run of relations is about to start.
    fn before_relations(&mut self) -> HandlerResult {
        Ok(())
    }

    /// A relation has been read.
    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        let _ = relation;
        Ok(())
    }

    /// The run of relations has ended.
    fn after_relations(&mut self) -> HandlerResult {
        Ok(())
    }

    /// The pass is over. Called exactly once, whether the stream ended,
    /// a handler stopped it or a fatal error aborted it.
    fn finished(&mut self) {}
}

/// Handler that ignores every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopHandler;

impl Handler for NoopHandler {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn before_points(&mut self) -> HandlerResult {
        (**self).before_points()
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        (**self).point(point)
    }

    fn after_points(&mut self) -> HandlerResult {
        (**self).after_points()
    }

    fn before_ways(&mut self) -> HandlerResult {
        (**self).before_ways()
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        (**self).way(way)
    }

    fn after_ways(&mut self) -> HandlerResult {
        (**self).after_ways()
    }

    fn before_relations(&mut self) -> HandlerResult {
        (**self).before_relations()
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        (**self).relation(relation)
    }

    fn after_relations(&mut self) -> HandlerResult {
        (**self).after_relations()
    }

    fn finished(&mut self) {
        (**self).finished();
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn before_points(&mut self) -> HandlerResult {
        (**self).before_points()
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        (**self).point(point)
    }

    fn after_points(&mut self) -> HandlerResult {
        (**self).after_points()
    }

    fn before_ways(&mut self) -> HandlerResult {
        (**self).before_ways()
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        (**self).way(way)
    }

    fn after_ways(&mut self) -> HandlerResult {
        (**self).after_ways()
    }

    fn before_relations(&mut self) -> HandlerResult {
        (**self).before_relations()
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        (**self).relation(relation)
    }

    fn after_relations(&mut self) -> HandlerResult {
        (**self).after_relations()
    }

    fn finished(&mut self) {
        (**self).finished();
    }
}

/// Call the `before_*` callback for `kind`.
///
/// # Errors
/// Propagates a stop request from the handler.
pub fn before_section<H: Handler + ?Sized>(handler: &mut H, kind: ObjectKind) -> HandlerResult {
    match kind {
        ObjectKind::Point => handler.before_points(),
        ObjectKind::Way => handler.before_ways(),
        ObjectKind::Relation => handler.before_relations(),
    }
}

/// Call the `after_*` callback for `kind`.
///
/// # Errors
/// Propagates a stop request from the handler.
pub fn after_section<H: Handler + ?Sized>(handler: &mut H, kind: ObjectKind) -> HandlerResult {
    match kind {
        ObjectKind::Point => handler.after_points(),
        ObjectKind::Way => handler.after_ways(),
        ObjectKind::Relation => handler.after_relations(),
    }
}

/// Call the per-object callback matching `object`.
///
/// # Errors
/// Propagates a stop request from the handler.
pub fn deliver<H: Handler + ?Sized>(handler: &mut H, object: ObjectRef<'_>) -> HandlerResult {
    match object {
        ObjectRef::Point(point) => handler.point(point),
        ObjectRef::Way(way) => handler.way(way),
        ObjectRef::Relation(relation) => handler.relation(relation),
    }
}
