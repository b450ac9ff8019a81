//! Object-type selection: which tables a request asks for.

use osm_toolkit::ObjectType;
use thiserror::Error;

use crate::config::{ConfigError, ExtractionSettings};

/// Query parameter carrying requested object types.
pub const OBJECT_TYPES_PARAM: &str = "object_types";

/// Requested names that are not in the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid object type(s) requested: {}. Valid types for this version are: {}",
    .invalid.join(", "),
    .valid.join(", ")
)]
pub struct InvalidObjectTypes {
    pub invalid: Vec<String>,
    pub valid: Vec<String>,
}

/// Validated allow-list and default selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypePolicy {
    allowed: Vec<ObjectType>,
    defaults: Vec<ObjectType>,
}

impl ObjectTypePolicy {
    /// Build the policy from configuration.
    ///
    /// Every configured name must exist in the toolkit catalogue, the
    /// allow-list must not be empty, and the defaults must be a subset of the
    /// allow-list. Absent or empty defaults mean the whole allow-list.
    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self, ConfigError> {
        let allowed = parse_names(&settings.allowed_object_types)?;
        if allowed.is_empty() {
            return Err(ConfigError::Invalid(
                "allowed_object_types must name at least one object type".to_string(),
            ));
        }

        let defaults = match &settings.default_object_types {
            Some(names) if !names.is_empty() => parse_names(names)?,
            _ => allowed.clone(),
        };
        if let Some(outside) = defaults.iter().find(|t| !allowed.contains(t)) {
            return Err(ConfigError::Invalid(format!(
                "default object type '{}' is not in allowed_object_types",
                outside
            )));
        }

        Ok(Self { allowed, defaults })
    }

    pub fn allowed(&self) -> &[ObjectType] {
        &self.allowed
    }

    pub fn defaults(&self) -> &[ObjectType] {
        &self.defaults
    }

    /// Resolve requested names into object types.
    ///
    /// No names selects the defaults. Duplicates collapse to the first
    /// occurrence; request order is kept.
    pub fn select<'a, I>(&self, requested: I) -> Result<Vec<ObjectType>, InvalidObjectTypes>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected = Vec::new();
        let mut invalid: Vec<String> = Vec::new();

        for name in requested {
            match name.parse::<ObjectType>() {
                Ok(t) if self.allowed.contains(&t) => {
                    if !selected.contains(&t) {
                        selected.push(t);
                    }
                }
                _ => {
                    if !invalid.iter().any(|n| n == name) {
                        invalid.push(name.to_string());
                    }
                }
            }
        }

        if !invalid.is_empty() {
            return Err(InvalidObjectTypes {
                invalid,
                valid: self.allowed.iter().map(|t| t.to_string()).collect(),
            });
        }
        if selected.is_empty() {
            return Ok(self.defaults.clone());
        }
        Ok(selected)
    }
}

fn parse_names(names: &[String]) -> Result<Vec<ObjectType>, ConfigError> {
    let mut types = Vec::with_capacity(names.len());
    for name in names {
        let t = name
            .trim()
            .parse::<ObjectType>()
            .map_err(|_| ConfigError::UnknownObjectType(name.clone()))?;
        if !types.contains(&t) {
            types.push(t);
        }
    }
    Ok(types)
}

/// Object-type names from decoded query pairs.
///
/// Accepts repeated `object_types` keys and comma-separated values; blank
/// entries are dropped.
pub fn requested_object_types(query: &[(String, String)]) -> Vec<&str> {
    query
        .iter()
        .filter(|(key, _)| key == OBJECT_TYPES_PARAM)
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
