//! Pull-mode adapter over the push readers.
//!
//! The reader runs on a dedicated worker thread. Both directions use
//! zero-capacity channels, so every send blocks until the other side
//! receives it and only one side runs at a time. The worker hands over each
//! finished object and then waits for the consumer to resume or stop it.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use camino::Utf8Path;
use log::{debug, warn};
use osmflow_core::{Handler, HandlerResult, Object, ObjectRef, Point, Relation, StopRequested, Way};
use thiserror::Error;

use crate::{ReadError, ReadOptions, ReadOutcome, Reader, open_path};

/// Errors surfaced by [`Enumerator`].
#[derive(Debug, Error)]
pub enum EnumeratorError {
    /// A pass is already in progress.
    #[error("enumerator is already running")]
    AlreadyRunning,
    /// No pass is in progress.
    #[error("enumerator is not running")]
    NotRunning,
    /// The pass failed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The worker thread could not be started.
    #[error("failed to spawn the parser thread")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
    /// The worker ended without reporting an outcome, usually after a panic
    /// inside a handler.
    #[error("parser thread exited without finishing the pass")]
    Disconnected,
}

/// Lifecycle of an [`Enumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorState {
    /// No pass in progress. A new pass may be started.
    Idle,
    /// A pass is suspended on an object.
    Running,
}

enum Command {
    Resume,
    Stop,
}

enum Handoff {
    Object(Object),
    Finished(Result<ReadOutcome, ReadError>),
}

struct Worker {
    commands: SyncSender<Command>,
    handoffs: Receiver<Handoff>,
    thread: JoinHandle<()>,
}

/// Steps through a stream one object at a time.
///
/// # Examples
/// ```
/// use osmflow_core::{NoopHandler, OsmObject};
/// use osmflow_input::{Enumerator, FileFormat, ReadOptions, Reader};
///
/// let document = r#"<osm><node id="1"/><way id="2"/></osm>"#;
/// let reader = Reader::new(document.as_bytes(), FileFormat::Xml, ReadOptions::default());
/// let mut objects = Enumerator::new();
/// objects.start(reader, NoopHandler)?;
/// let ids = objects
///     .map(|object| object.map(|object| object.id()))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(ids, [1, 2]);
/// # Ok::<(), osmflow_input::EnumeratorError>(())
/// ```
#[derive(Default)]
pub struct Enumerator {
    worker: Option<Worker>,
    current: Option<Object>,
    /// Whether `current` has not yet been returned by `next`.
    pending: bool,
    outcome: Option<ReadOutcome>,
}

impl Enumerator {
    /// Create an idle enumerator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EnumeratorState {
        if self.worker.is_some() {
            EnumeratorState::Running
        } else {
            EnumeratorState::Idle
        }
    }

    /// Whether no pass is in progress.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.worker.is_none()
    }

    /// Outcome of the last pass that ended without an error.
    #[must_use]
    pub const fn outcome(&self) -> Option<&ReadOutcome> {
        self.outcome.as_ref()
    }

    /// Start a pass over `reader` and run it up to the first object.
    ///
    /// `handler` sees every callback before the object is handed over, and
    /// its `finished` runs on the worker thread when the pass ends.
    ///
    /// # Errors
    /// Returns [`EnumeratorError::AlreadyRunning`] when a pass is in
    /// progress, and any failure raised before the first object.
    pub fn start<R, H>(&mut self, reader: Reader<R>, handler: H) -> Result<(), EnumeratorError>
    where
        R: Read + Send + 'static,
        H: Handler + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(EnumeratorError::AlreadyRunning);
        }
        let (commands, command_rx) = mpsc::sync_channel(0);
        let (handoff_tx, handoffs) = mpsc::sync_channel(0);
        let thread = thread::Builder::new()
            .name("osmflow-parser".to_owned())
            .spawn(move || {
                let mut yielding = Yielding {
                    inner: handler,
                    handoffs: &handoff_tx,
                    commands: &command_rx,
                };
                let result = reader.read(&mut yielding);
                if handoff_tx.send(Handoff::Finished(result)).is_err() {
                    debug!("consumer left before the pass finished");
                }
            })
            .map_err(|source| EnumeratorError::Spawn { source })?;

        self.worker = Some(Worker {
            commands,
            handoffs,
            thread,
        });
        self.current = None;
        self.pending = false;
        self.outcome = None;
        self.receive().map(|_| ())
    }

    /// Open `path` and start a pass over it.
    ///
    /// # Errors
    /// See [`open_path`] and [`Enumerator::start`].
    pub fn start_path<H>(
        &mut self,
        path: &Utf8Path,
        options: ReadOptions,
        handler: H,
    ) -> Result<(), EnumeratorError>
    where
        H: Handler + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(EnumeratorError::AlreadyRunning);
        }
        self.start(open_path(path, options)?, handler)
    }

    /// The object the pass is suspended on.
    ///
    /// The borrow ends at the next [`advance`](Self::advance) or
    /// [`stop`](Self::stop); clone the object to keep it longer.
    #[must_use]
    pub const fn current(&self) -> Option<&Object> {
        self.current.as_ref()
    }

    /// Resume the pass until the next object or the end of the stream.
    ///
    /// Returns `true` when a new object is available through
    /// [`current`](Self::current) and `false` once the pass has finished.
    ///
    /// # Errors
    /// Returns [`EnumeratorError::NotRunning`] when idle, and the failure
    /// that aborted the pass otherwise.
    pub fn advance(&mut self) -> Result<bool, EnumeratorError> {
        let Some(worker) = &self.worker else {
            return Err(EnumeratorError::NotRunning);
        };
        if worker.commands.send(Command::Resume).is_err() {
            self.join();
            return Err(EnumeratorError::Disconnected);
        }
        self.receive()
    }

    /// Cancel the pass and wait for the worker to finish it.
    ///
    /// The handler's `finished` has run when this returns. Stopping an idle
    /// enumerator does nothing.
    ///
    /// # Errors
    /// Returns [`EnumeratorError::Disconnected`] when the worker is gone.
    pub fn stop(&mut self) -> Result<(), EnumeratorError> {
        let Some(worker) = &self.worker else {
            return Ok(());
        };
        if worker.commands.send(Command::Stop).is_err() {
            self.join();
            return Err(EnumeratorError::Disconnected);
        }
        while self.receive()? {
            debug!("discarding object handed over after stop");
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<bool, EnumeratorError> {
        let Some(worker) = &self.worker else {
            return Err(EnumeratorError::NotRunning);
        };
        let handoff = worker.handoffs.recv();
        self.current = None;
        self.pending = false;
        match handoff {
            Ok(Handoff::Object(object)) => {
                self.current = Some(object);
                self.pending = true;
                Ok(true)
            }
            Ok(Handoff::Finished(result)) => {
                self.join();
                self.outcome = Some(result?);
                Ok(false)
            }
            Err(_) => {
                self.join();
                Err(EnumeratorError::Disconnected)
            }
        }
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            drop(worker.commands);
            if worker.thread.join().is_err() {
                warn!("parser thread panicked");
            }
        }
    }
}

impl Iterator for Enumerator {
    type Item = Result<Object, EnumeratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.pending {
            if self.worker.is_none() {
                return None;
            }
            match self.advance() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(error) => return Some(Err(error)),
            }
        }
        self.pending = false;
        self.current.clone().map(Ok)
    }
}

impl Drop for Enumerator {
    fn drop(&mut self) {
        if let Err(error) = self.stop() {
            warn!("failed to stop enumerator: {error}");
        }
    }
}

impl std::fmt::Debug for Enumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("state", &self.state())
            .field("current", &self.current)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Worker-side handler that suspends after each object.
struct Yielding<'a, H> {
    inner: H,
    handoffs: &'a SyncSender<Handoff>,
    commands: &'a Receiver<Command>,
}

impl<H> Yielding<'_, H> {
    fn hand_off(&self, object: ObjectRef<'_>) -> HandlerResult {
        self.handoffs
            .send(Handoff::Object(object.to_object()))
            .map_err(|_| StopRequested)?;
        match self.commands.recv() {
            Ok(Command::Resume) => Ok(()),
            Ok(Command::Stop) | Err(_) => Err(StopRequested),
        }
    }
}

impl<H: Handler> Handler for Yielding<'_, H> {
    fn before_points(&mut self) -> HandlerResult {
        self.inner.before_points()
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        self.inner.point(point)?;
        self.hand_off(ObjectRef::Point(point))
    }

    fn after_points(&mut self) -> HandlerResult {
        self.inner.after_points()
    }

    fn before_ways(&mut self) -> HandlerResult {
        self.inner.before_ways()
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        self.inner.way(way)?;
        self.hand_off(ObjectRef::Way(way))
    }

    fn after_ways(&mut self) -> HandlerResult {
        self.inner.after_ways()
    }

    fn before_relations(&mut self) -> HandlerResult {
        self.inner.before_relations()
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        self.inner.relation(relation)?;
        self.hand_off(ObjectRef::Relation(relation))
    }

    fn after_relations(&mut self) -> HandlerResult {
        self.inner.after_relations()
    }

    fn finished(&mut self) {
        self.inner.finished();
    }
}
