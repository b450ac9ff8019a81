//! Catalogue of extractable object types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A category of model objects that can be extracted as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Spaces,
    Surfaces,
    Subsurfaces,
    ThermalZones,
    BuildingStories,
    SpaceTypes,
    Constructions,
    Materials,
}

impl ObjectType {
    /// Every object type, in catalogue order.
    pub const ALL: [ObjectType; 8] = [
        ObjectType::Spaces,
        ObjectType::Surfaces,
        ObjectType::Subsurfaces,
        ObjectType::ThermalZones,
        ObjectType::BuildingStories,
        ObjectType::SpaceTypes,
        ObjectType::Constructions,
        ObjectType::Materials,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Spaces => "spaces",
            ObjectType::Surfaces => "surfaces",
            ObjectType::Subsurfaces => "subsurfaces",
            ObjectType::ThermalZones => "thermal_zones",
            ObjectType::BuildingStories => "building_stories",
            ObjectType::SpaceTypes => "space_types",
            ObjectType::Constructions => "constructions",
            ObjectType::Materials => "materials",
        }
    }

    /// Model class whose objects make up the table.
    pub fn class(self) -> &'static str {
        match self {
            ObjectType::Spaces => "OS:Space",
            ObjectType::Surfaces => "OS:Surface",
            ObjectType::Subsurfaces => "OS:SubSurface",
            ObjectType::ThermalZones => "OS:ThermalZone",
            ObjectType::BuildingStories => "OS:BuildingStory",
            ObjectType::SpaceTypes => "OS:SpaceType",
            ObjectType::Constructions => "OS:Construction",
            ObjectType::Materials => "OS:Material",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownObjectType(s.to_string()))
    }
}
