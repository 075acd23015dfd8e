//! Reader for the XML encoding (`.osm` and `.osc`).
//!
//! Elements are consumed one event at a time. Object containers (`node`,
//! `way`, `relation`) open a builder slot, their children fill it and the
//! closing tag hands the finished object to the pass. `delete` wrappers
//! mark everything inside them as invisible; `create`, `modify` and the
//! document roots are transparent.

mod values;

use std::io::{self, Read};
use std::sync::Arc;

use log::{debug, warn};
use osmflow_core::{Bounds, Handler, ObjectBuilder, ObjectKind, ObjectMeta, Position};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::pass::{Interrupt, Pass};
use crate::{Location, ReadError, ReadOutcome, TagPolicy, TrackingReader};

/// Read one XML document from `source`, pushing objects into `handler`.
pub(crate) fn read<R, H>(
    source: &mut TrackingReader<R>,
    handler: &mut H,
    tag_policy: TagPolicy,
) -> Result<ReadOutcome, ReadError>
where
    R: Read,
    H: Handler + ?Sized,
{
    let mut parser = XmlParser {
        pass: Pass::new(handler),
        builder: ObjectBuilder::new(),
        bounds: Bounds::new(),
        deleting: 0,
        tag_policy,
    };
    let mut reader = Reader::from_reader(&mut *source);
    reader.trim_text(true);
    let result = parser.run(&mut reader);

    let XmlParser { pass, bounds, .. } = parser;
    let completed = pass.conclude(result)?;
    Ok(ReadOutcome {
        bounds,
        bytes_read: source.bytes_read(),
        completed,
    })
}

struct XmlParser<'h, H: ?Sized> {
    pass: Pass<'h, H>,
    builder: ObjectBuilder,
    bounds: Bounds,
    /// Depth of nested `delete` wrappers around the current position.
    deleting: u32,
    tag_policy: TagPolicy,
}

impl<H: Handler + ?Sized> XmlParser<'_, H> {
    fn run<R: Read>(
        &mut self,
        reader: &mut Reader<&mut TrackingReader<R>>,
    ) -> Result<(), Interrupt> {
        let mut buf = Vec::new();
        let mut depth = 0_usize;
        let mut seen_root = false;
        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|error| from_xml(error, reader.get_ref().location()))?;
            let at = reader.get_ref().location();
            match event {
                Event::Start(element) => {
                    depth += 1;
                    seen_root = true;
                    self.start(&element, at)?;
                }
                Event::Empty(element) => {
                    seen_root = true;
                    self.start(&element, at)?;
                    self.end(element.name().as_ref(), at)?;
                }
                Event::End(element) => {
                    depth = depth.saturating_sub(1);
                    self.end(element.name().as_ref(), at)?;
                }
                Event::Eof => {
                    if !seen_root {
                        return Err(syntax(at, "document has no root element").into());
                    }
                    if depth > 0 {
                        return Err(syntax(at, "unexpected end of input inside an element").into());
                    }
                    return Ok(());
                }
                _ => {}
            }
            buf.clear();
        }
    }

    fn start(&mut self, element: &BytesStart<'_>, at: Location) -> Result<(), Interrupt> {
        match element.name().as_ref() {
            b"node" => self.begin(ObjectKind::Point, element, at),
            b"way" => self.begin(ObjectKind::Way, element, at),
            b"relation" => self.begin(ObjectKind::Relation, element, at),
            b"tag" => self.tag(element, at),
            b"nd" => self.node_ref(element, at),
            b"member" => self.member(element, at),
            b"bounds" => self.bounds(element, at),
            b"delete" => {
                self.deleting += 1;
                Ok(())
            }
            b"osm" | b"osmChange" | b"create" | b"modify" => Ok(()),
            other => {
                debug!(
                    "ignoring <{}> at line {}",
                    String::from_utf8_lossy(other),
                    at.line
                );
                Ok(())
            }
        }
    }

    fn end(&mut self, name: &[u8], at: Location) -> Result<(), Interrupt> {
        match name {
            b"node" | b"way" | b"relation" => {
                let finished = self
                    .builder
                    .try_finish()
                    .map_err(|error| ReadError::from_model(error, 0, at))?;
                if let Some(object) = finished {
                    self.pass.deliver(object)?;
                }
                Ok(())
            }
            b"delete" => {
                self.deleting = self.deleting.saturating_sub(1);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn begin(
        &mut self,
        kind: ObjectKind,
        element: &BytesStart<'_>,
        at: Location,
    ) -> Result<(), Interrupt> {
        if let Some(open) = self.builder.kind() {
            return Err(syntax(at, format!("<{kind}> nested inside <{open}>")).into());
        }
        self.pass.enter(kind)?;
        self.builder.begin(kind, true);

        let mut lon = None;
        let mut lat = None;
        let builder = &mut self.builder;
        each_attribute(element, at, |name, value| {
            match name {
                "id" => builder.set_id(values::number(name, value, at)?),
                "lon" if kind == ObjectKind::Point => {
                    lon = Some(values::coordinate(name, value, at)?);
                }
                "lat" if kind == ObjectKind::Point => {
                    lat = Some(values::coordinate(name, value, at)?);
                }
                _ => {
                    if let Some(meta) = builder.meta_mut() {
                        apply_attribute(meta, name, value, at)?;
                    }
                }
            }
            Ok(())
        })?;

        if self.deleting > 0 {
            if let Some(meta) = self.builder.meta_mut() {
                meta.visible = false;
            }
        }
        if let Some(point) = self.builder.point_mut() {
            match (lon, lat) {
                (Some(lon), Some(lat)) => point.position = Some(Position::from_degrees(lon, lat)),
                (None, None) => {}
                _ => warn!(
                    "point {} at line {} has only one coordinate",
                    point.meta.id, at.line
                ),
            }
        }
        Ok(())
    }

    fn tag(&mut self, element: &BytesStart<'_>, at: Location) -> Result<(), Interrupt> {
        let Some(meta) = self.builder.meta_mut() else {
            debug!("ignoring <tag> outside an object at line {}", at.line);
            return Ok(());
        };
        let mut key = None;
        let mut value = None;
        each_attribute(element, at, |name, text| {
            match name {
                "k" => key = Some(text.to_owned()),
                "v" => value = Some(text.to_owned()),
                _ => {}
            }
            Ok(())
        })?;
        match (key, value) {
            (Some(key), Some(value)) => meta.tags.add(key, value),
            (key, value) => match self.tag_policy {
                TagPolicy::Strict => {
                    return Err(ReadError::MalformedTag {
                        line: at.line,
                        column: at.column,
                    }
                    .into());
                }
                TagPolicy::Lenient => {
                    warn!(
                        "tag on object {} at line {} is missing its key or value",
                        meta.id, at.line
                    );
                    meta.tags
                        .add(key.unwrap_or_default(), value.unwrap_or_default());
                }
            },
        }
        Ok(())
    }

    fn node_ref(&mut self, element: &BytesStart<'_>, at: Location) -> Result<(), Interrupt> {
        let Some(way) = self.builder.way_mut() else {
            warn!("ignoring <nd> outside a way at line {}", at.line);
            return Ok(());
        };
        let mut reference = None;
        each_attribute(element, at, |name, value| {
            if name == "ref" {
                reference = Some(values::number::<i64>(name, value, at)?);
            }
            Ok(())
        })?;
        match reference {
            Some(reference) => way.add_node(reference),
            None => warn!("way {} has an <nd> without ref at line {}", way.meta.id, at.line),
        }
        Ok(())
    }

    fn member(&mut self, element: &BytesStart<'_>, at: Location) -> Result<(), Interrupt> {
        let Some(relation) = self.builder.relation_mut() else {
            warn!("ignoring <member> outside a relation at line {}", at.line);
            return Ok(());
        };
        let id = relation.meta.id;
        let mut type_name = None;
        let mut reference = None;
        let mut role = String::new();
        each_attribute(element, at, |name, value| {
            match name {
                "type" => type_name = Some(value.to_owned()),
                "ref" => reference = Some(values::number::<i64>(name, value, at)?),
                "role" => value.clone_into(&mut role),
                _ => {}
            }
            Ok(())
        })?;

        let malformed = |detail: String| ReadError::MalformedMember {
            id,
            line: at.line,
            column: at.column,
            detail,
        };
        let kind = match type_name.as_deref() {
            None => return Err(malformed("missing type".to_owned()).into()),
            Some(name) => ObjectKind::from_name(name)
                .ok_or_else(|| malformed(format!("unknown type {name:?}")))?,
        };
        let reference = reference.ok_or_else(|| malformed("missing ref".to_owned()))?;
        relation
            .add_member(kind, reference, &role)
            .map_err(|error| ReadError::from_model(error, id, at))?;
        Ok(())
    }

    fn bounds(&mut self, element: &BytesStart<'_>, at: Location) -> Result<(), Interrupt> {
        let mut corners: [Option<f64>; 4] = [None; 4];
        each_attribute(element, at, |name, value| {
            let slot = match name {
                "minlon" => 0,
                "minlat" => 1,
                "maxlon" => 2,
                "maxlat" => 3,
                _ => return Ok(()),
            };
            corners[slot] = Some(values::coordinate(name, value, at)?);
            Ok(())
        })?;
        if let [Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)] = corners {
            self.bounds
                .extend(Position::from_degrees(min_lon, min_lat))
                .extend(Position::from_degrees(max_lon, max_lat));
        } else {
            warn!("ignoring incomplete <bounds> at line {}", at.line);
        }
        Ok(())
    }
}

/// Store a shared attribute, keeping unrecognised names verbatim.
fn apply_attribute(
    meta: &mut ObjectMeta,
    name: &str,
    value: &str,
    at: Location,
) -> Result<(), ReadError> {
    match name {
        "version" => meta.version = values::number(name, value, at)?,
        "visible" => meta.visible = values::boolean(name, value, at)?,
        "timestamp" => meta.timestamp = values::timestamp(name, value, at)?,
        "uid" => meta.uid = values::number(name, value, at)?,
        "changeset" => meta.changeset = values::number(name, value, at)?,
        "user" => value.clone_into(&mut meta.user),
        _ => meta.attributes.push((name.to_owned(), value.to_owned())),
    }
    Ok(())
}

/// Decode every attribute of `element` and pass it to `visit`.
fn each_attribute<F>(element: &BytesStart<'_>, at: Location, mut visit: F) -> Result<(), Interrupt>
where
    F: FnMut(&str, &str) -> Result<(), Interrupt>,
{
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|error| syntax(at, error.to_string()))?;
        let name = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|error| syntax(at, error.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|error| syntax(at, error.to_string()))?;
        visit(name, &value)?;
    }
    Ok(())
}

fn syntax(at: Location, message: impl Into<String>) -> ReadError {
    ReadError::Syntax {
        line: at.line,
        column: at.column,
        message: message.into(),
    }
}

fn from_xml(error: quick_xml::Error, at: Location) -> ReadError {
    match error {
        quick_xml::Error::Io(source) => ReadError::Io {
            source: Arc::try_unwrap(source)
                .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string())),
        },
        other => syntax(at, other.to_string()),
    }
}

#[cfg(test)]
mod tests;
