//! In-memory model handle

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::reader;

/// Class name of the version object every OpenStudio model carries
pub const VERSION_CLASS: &str = "OS:Version";

/// Object identifier written as `{uuid}` in the first field of every object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Parse a handle from a raw field value. Returns `None` when the value is
    /// not wrapped in braces.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.len() > 2 && value.starts_with('{') && value.ends_with('}') {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Raw value as written in the file (trimmed)
    pub value: String,
    /// Field name taken from the trailing `!-` comment, when present
    pub name: Option<String>,
}

impl Field {
    pub fn new(value: impl Into<String>, name: Option<String>) -> Self {
        Self {
            value: value.into(),
            name,
        }
    }

    /// `true` when the value is blank
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A model object: class name, handle, and ordered fields.
///
/// The handle is also the first entry of [`ModelObject::fields`].
#[derive(Debug, Clone)]
pub struct ModelObject {
    class: String,
    handle: Handle,
    fields: Vec<Field>,
    line: usize,
}

impl ModelObject {
    pub(crate) fn new(class: String, handle: Handle, fields: Vec<Field>, line: usize) -> Self {
        Self {
            class,
            handle,
            fields,
            line,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Line of the class name in the source file (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Value of the field at `index`, `None` when absent or blank.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Value of the first field with the given name, `None` when absent or blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Object name: the `Name` field when labelled, otherwise the second field
    /// (the `Name` position for every named OpenStudio class).
    pub fn name(&self) -> Option<&str> {
        if self.fields.iter().any(|f| f.name.is_some()) {
            self.field("Name")
        } else {
            self.value(1).filter(|v| Handle::parse(v).is_none())
        }
    }
}

/// Loaded OpenStudio model.
///
/// # Example
///
/// ```rust,ignore
/// use osm_model::Model;
///
/// let model = Model::from_file("office.osm")?;
/// for space in model.objects_of_class("OS:Space") {
///     println!("{}", space.name().unwrap_or("<unnamed>"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    objects: Vec<ModelObject>,
    by_handle: HashMap<Handle, usize>,
    by_class: HashMap<String, Vec<usize>>,
}

impl Model {
    /// Load a model from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Load a model from raw file content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::Encoding {
            offset: e.valid_up_to(),
        })?;
        Self::from_text(text)
    }

    /// Load a model from OSM text.
    pub fn from_text(text: &str) -> Result<Self> {
        let objects = reader::read_objects(text)?;
        if objects.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut by_handle = HashMap::with_capacity(objects.len());
        let mut by_class: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, object) in objects.iter().enumerate() {
            if by_handle.insert(object.handle.clone(), idx).is_some() {
                return Err(Error::DuplicateHandle {
                    handle: object.handle.to_string(),
                    line: object.line,
                });
            }
            by_class.entry(object.class.clone()).or_default().push(idx);
        }

        if !by_class.contains_key(VERSION_CLASS) {
            return Err(Error::MissingVersion);
        }

        Ok(Self {
            objects,
            by_handle,
            by_class,
        })
    }

    /// All objects in file order.
    pub fn objects(&self) -> &[ModelObject] {
        &self.objects
    }

    /// Objects of one class in file order.
    pub fn objects_of_class<'a>(
        &'a self,
        class: &str,
    ) -> impl Iterator<Item = &'a ModelObject> + 'a {
        self.by_class
            .get(class)
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&idx| &self.objects[idx])
    }

    pub fn object(&self, handle: &Handle) -> Option<&ModelObject> {
        self.by_handle.get(handle).map(|&idx| &self.objects[idx])
    }

    /// Resolve a raw field value holding a handle to the referenced object.
    pub fn resolve(&self, value: &str) -> Option<&ModelObject> {
        Handle::parse(value).and_then(|h| self.object(&h))
    }

    /// Version identifier from the `OS:Version` object.
    pub fn version(&self) -> Option<&str> {
        self.objects_of_class(VERSION_CLASS)
            .next()
            .and_then(|v| v.field("Version Identifier").or_else(|| v.value(1)))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SMALL: &str = "\
OS:Version,
  {00000000-0000-0000-0000-000000000001}, !- Handle
  3.4.0;                                  !- Version Identifier

OS:ThermalZone,
  {00000000-0000-0000-0000-000000000002}, !- Handle
  Zone 1;                                 !- Name

OS:Space,
  {00000000-0000-0000-0000-000000000003}, !- Handle
  Office,                                 !- Name
  {00000000-0000-0000-0000-000000000002}; !- Thermal Zone Name
";

    #[test]
    fn indexes_objects_by_class_and_handle() {
        let model: Model = SMALL.parse().unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.version(), Some("3.4.0"));

        let space = model.objects_of_class("OS:Space").next().unwrap();
        assert_eq!(space.name(), Some("Office"));

        let zone = model.resolve(space.field("Thermal Zone Name").unwrap()).unwrap();
        assert_eq!(zone.class(), "OS:ThermalZone");
        assert_eq!(zone.name(), Some("Zone 1"));
    }

    #[test]
    fn unknown_class_yields_no_objects() {
        let model: Model = SMALL.parse().unwrap();
        assert_eq!(model.objects_of_class("OS:Surface").count(), 0);
    }

    #[test]
    fn name_falls_back_to_second_field_without_comments() {
        let text = "OS:Version,{v},3.4.0;\nOS:Space,{s},Lobby;\n";
        let model: Model = text.parse().unwrap();
        let space = model.objects_of_class("OS:Space").next().unwrap();
        assert_eq!(space.name(), Some("Lobby"));
        assert_eq!(model.version(), Some("3.4.0"));
    }

    #[test]
    fn rejects_model_without_version() {
        let text = "OS:Space,\n  {s}, !- Handle\n  Lobby; !- Name\n";
        assert!(matches!(text.parse::<Model>(), Err(Error::MissingVersion)));
    }

    #[test]
    fn rejects_duplicate_handles() {
        let text = "OS:Version,{v},3.4.0;\nOS:Space,{v},Lobby;\n";
        assert!(matches!(
            text.parse::<Model>(),
            Err(Error::DuplicateHandle { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_and_binary_content() {
        assert!(matches!(Model::from_bytes(b"   \n"), Err(Error::EmptyModel)));
        assert!(matches!(
            Model::from_bytes(&[0x4f, 0x53, 0xff, 0xfe]),
            Err(Error::Encoding { offset: 2 })
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();
        let model = Model::from_file(file.path()).unwrap();
        assert_eq!(model.objects().len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Model::from_file(dir.path().join("absent.osm")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn handle_parse_requires_braces() {
        assert!(Handle::parse("{abc}").is_some());
        assert!(Handle::parse("abc").is_none());
        assert!(Handle::parse("{}").is_none());
    }
}
