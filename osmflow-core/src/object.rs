//! Points, ways and relations.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::{ModelError, Position, TagList};

/// Longest accepted relation member role, in bytes.
pub const MAX_ROLE_LENGTH: usize = 255;

/// The three object kinds, ordered the way they appear in a sorted stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ObjectKind {
    /// A point (`node` in the exchange formats).
    Point,
    /// An ordered list of point references.
    Way,
    /// A list of typed members with roles.
    Relation,
}

impl ObjectKind {
    /// All kinds in stream order.
    pub const ALL: [Self; 3] = [Self::Point, Self::Way, Self::Relation];

    /// Name used for the kind in the exchange formats.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    /// Parse the exchange-format name of a kind.
    ///
    /// # Examples
    /// ```
    /// use osmflow_core::ObjectKind;
    ///
    /// assert_eq!(ObjectKind::from_name("way"), Some(ObjectKind::Way));
    /// assert_eq!(ObjectKind::from_name("area"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "node" => Some(Self::Point),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every object kind.
///
/// Everything except the identifier is optional and defaults to zero or
/// empty; `visible` defaults to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectMeta {
    /// Object identifier. Negative values are legal for unsaved objects.
    pub id: i64,
    /// Object version.
    pub version: u32,
    /// `false` marks a logically deleted object.
    pub visible: bool,
    /// Identifier of the last editing user.
    pub uid: u32,
    /// Name of the last editing user.
    pub user: String,
    /// Edit time in seconds since the Unix epoch, `0` when unknown.
    pub timestamp: i64,
    /// Changeset of the last edit.
    pub changeset: i64,
    /// Tags in file order.
    pub tags: TagList,
    /// Attributes the reader did not recognise, kept verbatim.
    pub attributes: Vec<(String, String)>,
}

impl Default for ObjectMeta {
    fn default() -> Self {
        Self {
            id: 0,
            version: 0,
            visible: true,
            uid: 0,
            user: String::new(),
            timestamp: 0,
            changeset: 0,
            tags: TagList::new(),
            attributes: Vec::new(),
        }
    }
}

impl ObjectMeta {
    /// The edit time as a UTC date, if one was recorded.
    #[must_use]
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Look up an attribute kept verbatim.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Restore defaults while keeping allocations.
    pub fn reset(&mut self) {
        self.id = 0;
        self.version = 0;
        self.visible = true;
        self.uid = 0;
        self.user.clear();
        self.timestamp = 0;
        self.changeset = 0;
        self.tags.clear();
        self.attributes.clear();
    }
}

/// Accessors common to points, ways and relations.
pub trait OsmObject {
    /// Kind of the object.
    fn kind(&self) -> ObjectKind;

    /// Shared attributes.
    fn meta(&self) -> &ObjectMeta;

    /// Object identifier.
    fn id(&self) -> i64 {
        self.meta().id
    }

    /// Object tags.
    fn tags(&self) -> &TagList {
        &self.meta().tags
    }
}

/// A single location with tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Shared attributes.
    pub meta: ObjectMeta,
    /// Location; absent for deleted points in change streams.
    pub position: Option<Position>,
}

impl Point {
    /// Create a visible point with the given identifier.
    #[must_use]
    pub fn new(id: i64, position: Position) -> Self {
        Self {
            meta: ObjectMeta {
                id,
                ..ObjectMeta::default()
            },
            position: Some(position),
        }
    }

    /// Restore defaults while keeping allocations.
    pub fn reset(&mut self) {
        self.meta.reset();
        self.position = None;
    }
}

/// An ordered sequence of point references.
///
/// Order is geometry order; repeated and self references are legal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    /// Shared attributes.
    pub meta: ObjectMeta,
    /// Referenced point identifiers.
    pub nodes: Vec<i64>,
}

impl Way {
    /// Create a visible way with the given identifier and no nodes.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            meta: ObjectMeta {
                id,
                ..ObjectMeta::default()
            },
            nodes: Vec::new(),
        }
    }

    /// Append a point reference.
    pub fn add_node(&mut self, reference: i64) {
        self.nodes.push(reference);
    }

    /// Whether the first and last references are the same point.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => self.nodes.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Restore defaults while keeping allocations.
    pub fn reset(&mut self) {
        self.meta.reset();
        self.nodes.clear();
    }
}

/// A relation's reference to another object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Kind of the referenced object.
    pub kind: ObjectKind,
    /// Identifier of the referenced object.
    pub reference: i64,
    /// Role label, at most [`MAX_ROLE_LENGTH`] bytes.
    pub role: String,
}

/// A list of typed members with roles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// Shared attributes.
    pub meta: ObjectMeta,
    /// Members in file order.
    pub members: Vec<Member>,
}

impl Relation {
    /// Create a visible relation with the given identifier and no members.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            meta: ObjectMeta {
                id,
                ..ObjectMeta::default()
            },
            members: Vec::new(),
        }
    }

    /// Append a member.
    ///
    /// # Errors
    /// Returns [`ModelError::RoleTooLong`] when `role` is longer than
    /// [`MAX_ROLE_LENGTH`] bytes; the relation is left unchanged.
    ///
    /// # Examples
    /// ```
    /// use osmflow_core::{ObjectKind, Relation};
    ///
    /// let mut relation = Relation::new(3);
    /// relation.add_member(ObjectKind::Way, 2, "outer")?;
    /// assert!(relation.add_member(ObjectKind::Way, 4, &"x".repeat(256)).is_err());
    /// assert_eq!(relation.members.len(), 1);
    /// # Ok::<(), osmflow_core::ModelError>(())
    /// ```
    pub fn add_member(
        &mut self,
        kind: ObjectKind,
        reference: i64,
        role: &str,
    ) -> Result<(), ModelError> {
        if role.len() > MAX_ROLE_LENGTH {
            return Err(ModelError::RoleTooLong {
                length: role.len(),
                max: MAX_ROLE_LENGTH,
            });
        }
        self.members.push(Member {
            kind,
            reference,
            role: role.to_owned(),
        });
        Ok(())
    }

    /// Restore defaults while keeping allocations.
    pub fn reset(&mut self) {
        self.meta.reset();
        self.members.clear();
    }
}

macro_rules! impl_osm_object {
    ($type:ty, $kind:expr) => {
        impl OsmObject for $type {
            fn kind(&self) -> ObjectKind {
                $kind
            }

            fn meta(&self) -> &ObjectMeta {
                &self.meta
            }
        }
    };
}

impl_osm_object!(Point, ObjectKind::Point);
impl_osm_object!(Way, ObjectKind::Way);
impl_osm_object!(Relation, ObjectKind::Relation);

/// An owned object of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Object {
    /// A point.
    Point(Point),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
}

impl OsmObject for Object {
    fn kind(&self) -> ObjectKind {
        match self {
            Self::Point(_) => ObjectKind::Point,
            Self::Way(_) => ObjectKind::Way,
            Self::Relation(_) => ObjectKind::Relation,
        }
    }

    fn meta(&self) -> &ObjectMeta {
        match self {
            Self::Point(point) => &point.meta,
            Self::Way(way) => &way.meta,
            Self::Relation(relation) => &relation.meta,
        }
    }
}

/// A borrowed object of any kind, valid for one handler call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef<'a> {
    /// A point.
    Point(&'a Point),
    /// A way.
    Way(&'a Way),
    /// A relation.
    Relation(&'a Relation),
}

impl ObjectRef<'_> {
    /// Copy the object out of the borrow.
    #[must_use]
    pub fn to_object(self) -> Object {
        match self {
            ObjectRef::Point(point) => Object::Point(point.clone()),
            ObjectRef::Way(way) => Object::Way(way.clone()),
            ObjectRef::Relation(relation) => Object::Relation(relation.clone()),
        }
    }
}

impl OsmObject for ObjectRef<'_> {
    fn kind(&self) -> ObjectKind {
        match self {
            ObjectRef::Point(_) => ObjectKind::Point,
            ObjectRef::Way(_) => ObjectKind::Way,
            ObjectRef::Relation(_) => ObjectKind::Relation,
        }
    }

    fn meta(&self) -> &ObjectMeta {
        match self {
            ObjectRef::Point(point) => &point.meta,
            ObjectRef::Way(way) => &way.meta,
            ObjectRef::Relation(relation) => &relation.meta,
        }
    }
}
