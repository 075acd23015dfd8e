//! Section bracketing and termination shared by both encodings.
//!
//! A [`Pass`] sits between a format reader and the handler. It turns the
//! kind of each incoming object into `before_*`/`after_*` calls and fills
//! in empty brackets for kinds the stream skips. Every maximal run of one
//! kind gets its own bracket, so a change file that returns to points after
//! its ways reopens the point section. When the reader is done it closes
//! the remaining sections and calls `finished` exactly once.

use std::io;

use log::debug;
use osmflow_core::{
    Handler, ObjectKind, ObjectRef, StopRequested, after_section, before_section, deliver,
};

use crate::ReadError;

/// Why a reader left its token loop early.
#[derive(Debug)]
pub(crate) enum Interrupt {
    /// The handler asked to stop.
    Stop,
    /// A fatal error.
    Fail(ReadError),
}

impl From<StopRequested> for Interrupt {
    fn from(_: StopRequested) -> Self {
        Self::Stop
    }
}

impl From<ReadError> for Interrupt {
    fn from(error: ReadError) -> Self {
        Self::Fail(error)
    }
}

impl From<io::Error> for Interrupt {
    fn from(source: io::Error) -> Self {
        Self::Fail(ReadError::Io { source })
    }
}

/// Handler wrapper enforcing section order for one pass.
pub(crate) struct Pass<'h, H: ?Sized> {
    handler: &'h mut H,
    /// Section whose `before_*` ran but whose `after_*` has not.
    open: Option<ObjectKind>,
    /// Highest section reached, open or closed.
    reached: Option<ObjectKind>,
}

impl<'h, H: Handler + ?Sized> Pass<'h, H> {
    pub(crate) fn new(handler: &'h mut H) -> Self {
        debug!("starting read pass");
        Self {
            handler,
            open: None,
            reached: None,
        }
    }

    /// Make `kind` the current section.
    ///
    /// A kind at or below the highest section reached reopens its section
    /// without filling any empty brackets.
    pub(crate) fn enter(&mut self, kind: ObjectKind) -> Result<(), Interrupt> {
        if self.open == Some(kind) {
            return Ok(());
        }
        self.close()?;
        if self.reached < Some(kind) {
            self.skip_until(Some(kind))?;
            debug!("entering {kind} section");
            self.reached = Some(kind);
        } else {
            debug!("reopening {kind} section");
        }
        self.open = Some(kind);
        before_section(&mut *self.handler, kind)?;
        Ok(())
    }

    /// Hand a finished object to the handler.
    pub(crate) fn deliver(&mut self, object: ObjectRef<'_>) -> Result<(), Interrupt> {
        deliver(&mut *self.handler, object)?;
        Ok(())
    }

    /// End the pass and report whether the stream was read to the end.
    pub(crate) fn conclude(mut self, result: Result<(), Interrupt>) -> Result<bool, ReadError> {
        let result = result.and_then(|()| {
            self.close()?;
            self.skip_until(None)?;
            Ok(())
        });
        let outcome = match result {
            Ok(()) => {
                debug!("read pass complete");
                Ok(true)
            }
            Err(Interrupt::Stop) => {
                debug!("handler stopped the pass");
                // A second stop request while closing changes nothing.
                let _ = self.close();
                Ok(false)
            }
            Err(Interrupt::Fail(error)) => {
                debug!("read pass failed: {error}");
                Err(error)
            }
        };
        self.handler.finished();
        outcome
    }

    fn close(&mut self) -> Result<(), StopRequested> {
        match self.open.take() {
            Some(kind) => after_section(&mut *self.handler, kind),
            None => Ok(()),
        }
    }

    /// Emit empty brackets for every kind after the latest section and
    /// before `limit`, or up to the last kind when `limit` is `None`.
    fn skip_until(&mut self, limit: Option<ObjectKind>) -> Result<(), StopRequested> {
        for kind in ObjectKind::ALL {
            if Some(kind) <= self.reached || limit.is_some_and(|limit| kind >= limit) {
                continue;
            }
            self.reached = Some(kind);
            self.open = Some(kind);
            before_section(&mut *self.handler, kind)?;
            self.close()?;
        }
        Ok(())
    }
}
