//! Buffered byte source with progress and position tracking.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};

/// Callback receiving the cumulative number of bytes read from the source.
pub type ProgressObserver = Box<dyn FnMut(u64) + Send>;

/// One-based line and column of the last consumed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number, starting at one.
    pub line: u64,
    /// Column in bytes, starting at one.
    pub column: u64,
}

/// Counts bytes pulled from the underlying source and reports them.
struct Counted<R> {
    inner: R,
    total: u64,
    observer: Option<ProgressObserver>,
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.total += read as u64;
        if let Some(observer) = self.observer.as_mut() {
            observer(self.total);
        }
        Ok(read)
    }
}

/// Sequential reader that tracks how far a pass has progressed.
///
/// Two counters are kept: bytes pulled from the source, reported to the
/// progress observer after every low-level read, and bytes handed to the
/// parser, from which the line and column of errors are derived.
///
/// # Examples
/// ```
/// use std::io::Read;
/// use osmflow_input::TrackingReader;
///
/// let mut reader = TrackingReader::new("ab\ncd".as_bytes(), 16);
/// let mut text = String::new();
/// reader.read_to_string(&mut text)?;
/// assert_eq!(reader.bytes_read(), 5);
/// assert_eq!(reader.location().line, 2);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct TrackingReader<R> {
    inner: BufReader<Counted<R>>,
    consumed: u64,
    line: u64,
    line_start: u64,
}

impl<R: Read> TrackingReader<R> {
    /// Wrap `source` in a buffer of `capacity` bytes.
    pub fn new(source: R, capacity: usize) -> Self {
        let counted = Counted {
            inner: source,
            total: 0,
            observer: None,
        };
        Self {
            inner: BufReader::with_capacity(capacity.max(1), counted),
            consumed: 0,
            line: 1,
            line_start: 0,
        }
    }
}

impl<R> TrackingReader<R> {
    /// Report cumulative bytes read to `observer` after each read.
    pub fn set_observer(&mut self, observer: ProgressObserver) {
        self.inner.get_mut().observer = Some(observer);
    }

    /// Bytes pulled from the underlying source so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.inner.get_ref().total
    }

    /// Bytes handed to the consumer so far.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.consumed
    }

    /// Line and column just past the last consumed byte.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.consumed - self.line_start + 1,
        }
    }
}

impl<R: Read> Read for TrackingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

impl<R: Read> BufRead for TrackingReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        let buffered = self.inner.buffer();
        let amount = amount.min(buffered.len());
        for (offset, byte) in buffered[..amount].iter().enumerate() {
            if *byte == b'\n' {
                self.line += 1;
                self.line_start = self.consumed + offset as u64 + 1;
            }
        }
        self.consumed += amount as u64;
        self.inner.consume(amount);
    }
}

impl<R> fmt::Debug for TrackingReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingReader")
            .field("bytes_read", &self.bytes_read())
            .field("position", &self.consumed)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}
