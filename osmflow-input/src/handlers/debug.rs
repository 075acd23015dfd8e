use std::io::{self, Write};

use log::error;
use osmflow_core::{Handler, HandlerResult, ObjectMeta, Point, Relation, StopRequested, Way};

/// Handler that writes a line of text for every callback.
///
/// A write failure stops the pass; the error is kept for
/// [`DebugHandler::take_error`].
///
/// # Examples
/// ```
/// use osmflow_input::{DebugHandler, FileFormat, ReadOptions, read};
///
/// let document = r#"<osm><node id="1" lon="7" lat="52"/></osm>"#;
/// let mut dump = DebugHandler::new(Vec::new());
/// read(document.as_bytes(), FileFormat::Xml, &mut dump, &ReadOptions::default())?;
/// let text = String::from_utf8(dump.into_inner()).expect("dump is UTF-8");
/// assert!(text.contains("point 1 at (7.0000000, 52.0000000)"));
/// # Ok::<(), osmflow_input::ReadError>(())
/// ```
#[derive(Debug)]
pub struct DebugHandler<W> {
    sink: W,
    error: Option<io::Error>,
}

impl<W: Write> DebugHandler<W> {
    /// Write to `sink`.
    pub const fn new(sink: W) -> Self {
        Self { sink, error: None }
    }

    /// The write error that stopped the pass, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) -> HandlerResult {
        if self.error.is_some() {
            return Err(StopRequested);
        }
        self.sink
            .write_fmt(line)
            .and_then(|()| self.sink.write_all(b"\n"))
            .map_err(|err| {
                error!("Debug output failed: {err}");
                self.error = Some(err);
                StopRequested
            })
    }

    fn emit_meta(&mut self, meta: &ObjectMeta) -> HandlerResult {
        if !meta.visible {
            self.emit(format_args!("  deleted"))?;
        }
        if meta.version > 0 {
            self.emit(format_args!(
                "  version {} changeset {} by {:?} ({}) at {}",
                meta.version, meta.changeset, meta.user, meta.uid, meta.timestamp
            ))?;
        }
        for (key, value) in meta.tags.iter() {
            self.emit(format_args!("  tag {key}={value}"))?;
        }
        for (name, value) in &meta.attributes {
            self.emit(format_args!("  attribute {name}={value}"))?;
        }
        Ok(())
    }
}

impl<W: Write> Handler for DebugHandler<W> {
    fn before_points(&mut self) -> HandlerResult {
        self.emit(format_args!("before points"))
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        match point.position {
            Some(position) => self.emit(format_args!(
                "point {} at ({:.7}, {:.7})",
                point.meta.id,
                position.lon(),
                position.lat()
            ))?,
            None => self.emit(format_args!("point {}", point.meta.id))?,
        }
        self.emit_meta(&point.meta)
    }

    fn after_points(&mut self) -> HandlerResult {
        self.emit(format_args!("after points"))
    }

    fn before_ways(&mut self) -> HandlerResult {
        self.emit(format_args!("before ways"))
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        self.emit(format_args!("way {} nodes {:?}", way.meta.id, way.nodes))?;
        self.emit_meta(&way.meta)
    }

    fn after_ways(&mut self) -> HandlerResult {
        self.emit(format_args!("after ways"))
    }

    fn before_relations(&mut self) -> HandlerResult {
        self.emit(format_args!("before relations"))
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        self.emit(format_args!("relation {}", relation.meta.id))?;
        for member in &relation.members {
            self.emit(format_args!(
                "  member {} {} {:?}",
                member.kind, member.reference, member.role
            ))?;
        }
        self.emit_meta(&relation.meta)
    }

    fn after_relations(&mut self) -> HandlerResult {
        self.emit(format_args!("after relations"))
    }

    fn finished(&mut self) {
        if self.emit(format_args!("finished")).is_ok() {
            if let Err(err) = self.sink.flush() {
                error!("Debug output failed to flush: {err}");
                self.error = Some(err);
            }
        }
    }
}
