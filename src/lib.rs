//! Facade crate for the osmflow streaming reader.
//!
//! This crate re-exports the domain model from `osmflow-core` and the
//! readers, pull-mode enumerator and stock handlers from `osmflow-input`.

#![forbid(unsafe_code)]

pub use osmflow_core::{
    Bounds, Handler, HandlerResult, MAX_ROLE_LENGTH, Member, NoopHandler, Object, ObjectKind,
    ObjectMeta, ObjectRef, OsmObject, Point, Position, Relation, StopRequested, Tag, TagList, Way,
};

pub use osmflow_input::{
    DebugHandler, Enumerator, EnumeratorError, EnumeratorState, FileFormat, ProgressHandler,
    ReadError, ReadOptions, ReadOutcome, Reader, Summary, SummaryHandler, TagPolicy, open_path,
    read, read_path,
};

#[cfg(feature = "test-support")]
pub use osmflow_core::test_support;
