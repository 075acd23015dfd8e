//! Stock handlers.
//!
//! Each of these is useful on its own and doubles as an example of handler
//! composition: [`ProgressHandler`] wraps another handler and forwards every
//! call to it.

mod debug;
mod progress;
mod summary;

pub use debug::DebugHandler;
pub use progress::{DEFAULT_REPORT_INTERVAL, ProgressHandler};
pub use summary::{Summary, SummaryHandler};
