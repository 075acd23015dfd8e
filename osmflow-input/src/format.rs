//! Encodings and their file name conventions.

use std::fmt;

use camino::Utf8Path;

/// Encoding of an object stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FileFormat {
    /// XML documents and change files (`.osm`, `.osc`).
    Xml,
    /// Protocol buffer blocks (`.osm.pbf`, `.pbf`).
    Pbf,
}

impl FileFormat {
    /// Infer the encoding from the file name suffix.
    ///
    /// Compressed suffixes such as `.osm.bz2` are not recognised; the
    /// readers expect an uncompressed byte stream.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use osmflow_input::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_path(Utf8Path::new("city.osm.pbf")), Some(FileFormat::Pbf));
    /// assert_eq!(FileFormat::from_path(Utf8Path::new("diff.osc")), Some(FileFormat::Xml));
    /// assert_eq!(FileFormat::from_path(Utf8Path::new("city.osm.bz2")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()?.to_ascii_lowercase().as_str() {
            "osm" | "osc" | "xml" => Some(Self::Xml),
            "pbf" => Some(Self::Pbf),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Pbf => "pbf",
        })
    }
}
