//! Reader for the protocol buffer encoding (`.osm.pbf`).
//!
//! Blobs are decoded sequentially on the calling thread so that handler
//! calls keep file order. Header bounding boxes feed the bounds accumulator;
//! data blocks are replayed element by element through the builder slot.

use std::io::Read;

use log::debug;
use osmflow_core::{Bounds, Handler, ObjectBuilder, ObjectKind, ObjectMeta, Position};
use osmpbf::{BlobDecode, BlobReader, DenseNode, Element, Info, RelMemberType};

use crate::pass::{Interrupt, Pass};
use crate::{Location, ReadError, ReadOutcome, TrackingReader};

/// Binary blocks carry no line structure.
const NO_LOCATION: Location = Location { line: 0, column: 0 };

/// Read every blob from `source`, pushing objects into `handler`.
pub(crate) fn read<R, H>(
    source: &mut TrackingReader<R>,
    handler: &mut H,
) -> Result<ReadOutcome, ReadError>
where
    R: Read + Send,
    H: Handler + ?Sized,
{
    let mut pass = Pass::new(handler);
    let mut builder = ObjectBuilder::new();
    let mut bounds = Bounds::new();
    let result = run(&mut *source, &mut pass, &mut builder, &mut bounds);
    let completed = pass.conclude(result)?;
    Ok(ReadOutcome {
        bounds,
        bytes_read: source.bytes_read(),
        completed,
    })
}

fn run<R, H>(
    source: &mut TrackingReader<R>,
    pass: &mut Pass<'_, H>,
    builder: &mut ObjectBuilder,
    bounds: &mut Bounds,
) -> Result<(), Interrupt>
where
    R: Read + Send,
    H: Handler + ?Sized,
{
    for blob in BlobReader::new(source) {
        let blob = blob.map_err(decode)?;
        match blob.decode().map_err(decode)? {
            BlobDecode::OsmHeader(header) => {
                if let Some(bbox) = header.bbox() {
                    bounds
                        .extend(Position::from_degrees(bbox.left, bbox.bottom))
                        .extend(Position::from_degrees(bbox.right, bbox.top));
                }
            }
            BlobDecode::OsmData(block) => {
                for element in block.elements() {
                    replay(element, pass, builder)?;
                }
            }
            BlobDecode::Unknown(kind) => debug!("skipping blob of unknown type {kind}"),
        }
    }
    Ok(())
}

/// Rebuild one element in the builder slot and deliver it.
fn replay<H: Handler + ?Sized>(
    element: Element<'_>,
    pass: &mut Pass<'_, H>,
    builder: &mut ObjectBuilder,
) -> Result<(), Interrupt> {
    let kind = match element {
        Element::Node(_) | Element::DenseNode(_) => ObjectKind::Point,
        Element::Way(_) => ObjectKind::Way,
        Element::Relation(_) => ObjectKind::Relation,
    };
    pass.enter(kind)?;
    builder.begin(kind, true);

    match element {
        Element::Node(node) => {
            builder.set_id(node.id());
            if let Some(point) = builder.point_mut() {
                point.position = Some(Position::from_degrees(node.lon(), node.lat()));
                copy_tags(&mut point.meta, node.tags());
                copy_info(&mut point.meta, &node.info())?;
            }
        }
        Element::DenseNode(node) => {
            builder.set_id(node.id());
            if let Some(point) = builder.point_mut() {
                point.position = Some(Position::from_degrees(node.lon(), node.lat()));
                copy_tags(&mut point.meta, node.tags());
                copy_dense_info(&mut point.meta, &node)?;
            }
        }
        Element::Way(way) => {
            builder.set_id(way.id());
            if let Some(target) = builder.way_mut() {
                target.nodes.extend(way.refs());
                copy_tags(&mut target.meta, way.tags());
                copy_info(&mut target.meta, &way.info())?;
            }
        }
        Element::Relation(relation) => {
            let id = relation.id();
            builder.set_id(id);
            if let Some(target) = builder.relation_mut() {
                for member in relation.members() {
                    let role = member.role().map_err(decode)?;
                    target
                        .add_member(member_kind(&member.member_type), member.member_id, role)
                        .map_err(|error| ReadError::from_model(error, id, NO_LOCATION))?;
                }
                copy_tags(&mut target.meta, relation.tags());
                copy_info(&mut target.meta, &relation.info())?;
            }
        }
    }

    let finished = builder
        .try_finish()
        .map_err(|error| ReadError::from_model(error, 0, NO_LOCATION))?;
    if let Some(object) = finished {
        pass.deliver(object)?;
    }
    Ok(())
}

fn member_kind(member_type: &RelMemberType) -> ObjectKind {
    match member_type {
        RelMemberType::Node => ObjectKind::Point,
        RelMemberType::Way => ObjectKind::Way,
        RelMemberType::Relation => ObjectKind::Relation,
    }
}

fn copy_tags<'a>(meta: &mut ObjectMeta, tags: impl Iterator<Item = (&'a str, &'a str)>) {
    for (key, value) in tags {
        meta.tags.add(key, value);
    }
}

fn copy_info(meta: &mut ObjectMeta, info: &Info<'_>) -> Result<(), ReadError> {
    meta.version = info
        .version()
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or_default();
    meta.timestamp = info
        .milli_timestamp()
        .map_or(0, |millis| millis.div_euclid(1000));
    meta.changeset = info.changeset().unwrap_or_default();
    meta.uid = info
        .uid()
        .and_then(|uid| u32::try_from(uid).ok())
        .unwrap_or_default();
    if let Some(user) = info.user() {
        user.map_err(decode)?.clone_into(&mut meta.user);
    }
    meta.visible = !info.deleted();
    Ok(())
}

fn copy_dense_info(meta: &mut ObjectMeta, node: &DenseNode<'_>) -> Result<(), ReadError> {
    let Some(info) = node.info() else {
        return Ok(());
    };
    meta.version = u32::try_from(info.version()).unwrap_or_default();
    meta.timestamp = info.milli_timestamp().div_euclid(1000);
    meta.changeset = info.changeset();
    meta.uid = u32::try_from(info.uid()).unwrap_or_default();
    info.user().map_err(decode)?.clone_into(&mut meta.user);
    meta.visible = !info.deleted();
    Ok(())
}

fn decode(source: osmpbf::Error) -> ReadError {
    ReadError::Decode { source }
}
