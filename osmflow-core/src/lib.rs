//! Domain model for streamed OpenStreetMap data.
//!
//! Responsibilities:
//! - Define points, ways, relations and their shared attributes.
//! - Define the [`Handler`] contract readers push objects into.
//! - Provide fixed-precision positions and bounding boxes.
//!
//! Boundaries:
//! - No I/O and no format knowledge (live in `osmflow-input`).
//!
//! Invariants:
//! - Member roles never exceed [`MAX_ROLE_LENGTH`] bytes.
//! - Finished objects always carry an identifier.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod bounds;
mod builder;
mod error;
mod handler;
mod object;
mod position;
mod tags;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use bounds::Bounds;
pub use builder::ObjectBuilder;
pub use error::ModelError;
pub use handler::{
    Handler, HandlerResult, NoopHandler, StopRequested, after_section, before_section, deliver,
};
pub use object::{
    MAX_ROLE_LENGTH, Member, Object, ObjectKind, ObjectMeta, ObjectRef, OsmObject, Point,
    Relation, Way,
};
pub use position::{COORDINATE_PRECISION, Position};
pub use tags::{Tag, TagList};
