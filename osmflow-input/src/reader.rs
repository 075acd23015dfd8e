//! Push-mode entry points.

use std::io::Read;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use osmflow_core::{Bounds, Handler};

use crate::{FileFormat, ReadError, ReadOptions, TrackingReader, pbf, xml};

/// Result of a pass that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Union of every `bounds` declaration in the stream.
    pub bounds: Bounds,
    /// Bytes pulled from the source.
    pub bytes_read: u64,
    /// `false` when a handler stopped the pass early.
    pub completed: bool,
}

/// A byte source paired with its encoding and options.
///
/// A reader performs exactly one pass; [`Reader::read`] consumes it.
///
/// # Examples
/// ```
/// use osmflow_core::NoopHandler;
/// use osmflow_input::{FileFormat, ReadOptions, Reader};
///
/// let document = r#"<osm><node id="1" lon="7.0" lat="52.0"/></osm>"#;
/// let outcome = Reader::new(document.as_bytes(), FileFormat::Xml, ReadOptions::default())
///     .read(&mut NoopHandler)?;
/// assert!(outcome.completed);
/// assert_eq!(outcome.bytes_read, document.len() as u64);
/// # Ok::<(), osmflow_input::ReadError>(())
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    source: TrackingReader<R>,
    format: FileFormat,
    options: ReadOptions,
}

impl<R: Read> Reader<R> {
    /// Prepare a pass over `source`.
    pub fn new(source: R, format: FileFormat, options: ReadOptions) -> Self {
        Self {
            source: TrackingReader::new(source, options.buffer_capacity),
            format,
            options,
        }
    }

    /// Report the cumulative number of bytes read after each read from the
    /// source.
    #[must_use]
    pub fn on_progress<F>(mut self, observer: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.source.set_observer(Box::new(observer));
        self
    }

    /// Encoding this reader expects.
    #[must_use]
    pub const fn format(&self) -> FileFormat {
        self.format
    }
}

impl<R: Read + Send> Reader<R> {
    /// Run the pass, pushing every object into `handler`.
    ///
    /// `handler.finished()` is called exactly once, whatever the outcome.
    ///
    /// # Errors
    /// Returns the [`ReadError`] that aborted the pass. Stopping from a
    /// handler is not an error and yields `completed == false`.
    pub fn read<H: Handler + ?Sized>(mut self, handler: &mut H) -> Result<ReadOutcome, ReadError> {
        match self.format {
            FileFormat::Xml => xml::read(&mut self.source, handler, self.options.tag_policy),
            FileFormat::Pbf => pbf::read(&mut self.source, handler),
        }
    }
}

/// Read `source` in one pass.
///
/// # Errors
/// See [`Reader::read`].
pub fn read<R, H>(
    source: R,
    format: FileFormat,
    handler: &mut H,
    options: &ReadOptions,
) -> Result<ReadOutcome, ReadError>
where
    R: Read + Send,
    H: Handler + ?Sized,
{
    Reader::new(source, format, *options).read(handler)
}

/// Open the file at `path`, inferring its encoding from the name.
///
/// # Errors
/// Returns [`ReadError::UnknownFormat`] for unrecognised suffixes and
/// [`ReadError::Open`] when the file cannot be opened.
pub fn open_path(path: &Utf8Path, options: ReadOptions) -> Result<Reader<fs_utf8::File>, ReadError> {
    let format = FileFormat::from_path(path).ok_or_else(|| ReadError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        ReadError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Reader::new(file, format, options))
}

/// Read the file at `path` in one pass.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use osmflow_input::{ReadOptions, SummaryHandler, read_path};
///
/// let mut summary = SummaryHandler::default();
/// read_path(Utf8Path::new("berlin.osm.pbf"), &mut summary, &ReadOptions::default())?;
/// println!("{} points", summary.summary().points);
/// # Ok::<(), osmflow_input::ReadError>(())
/// ```
///
/// # Errors
/// See [`open_path`] and [`Reader::read`].
pub fn read_path<H: Handler + ?Sized>(
    path: &Utf8Path,
    handler: &mut H,
    options: &ReadOptions,
) -> Result<ReadOutcome, ReadError> {
    open_path(path, *options)?.read(handler)
}
