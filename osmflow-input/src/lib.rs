//! Streaming readers for OpenStreetMap data.
//!
//! Responsibilities:
//! - Parse the XML (`.osm`, `.osc`) and protocol buffer (`.osm.pbf`)
//!   encodings and push objects into an [`osmflow_core::Handler`].
//! - Bracket every run of one kind with a `before_*`/`after_*` pair. Sorted
//!   streams see points, then ways, then relations; change files that
//!   return to an earlier kind reopen its section.
//! - Offer a pull-mode [`Enumerator`] that hands over one object at a time.
//! - Report read progress and accumulate declared bounds.
//!
//! Boundaries:
//! - Decompression and network transport belong to the byte source.
//! - Domain types live in `osmflow-core`; this crate only fills them.
//!
//! Invariants:
//! - `finished` is called exactly once per pass, whatever the outcome.
//! - Errors abort the pass; nothing is retried.
//! - Only one side of an [`Enumerator`] runs at any time.

mod enumerator;
mod error;
mod format;
mod handlers;
mod options;
mod pass;
mod pbf;
mod reader;
mod source;
mod xml;

pub use enumerator::{Enumerator, EnumeratorError, EnumeratorState};
pub use error::ReadError;
pub use format::FileFormat;
pub use handlers::{DEFAULT_REPORT_INTERVAL, DebugHandler, ProgressHandler, Summary, SummaryHandler};
pub use options::{DEFAULT_BUFFER_CAPACITY, ReadOptions, TagPolicy};
pub use reader::{ReadOutcome, Reader, open_path, read, read_path};
pub use source::{Location, ProgressObserver, TrackingReader};
