//! Raw catalog records as published by the ship and pilot sources.
use serde::{Deserialize, Serialize};

use crate::error::{MetaError, Result};
use crate::numbers::lenient_int;

/// One entry of the ship catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawShip {
    pub name: String,
    /// Every faction this ship may fly for; loaned ships list several.
    #[serde(default)]
    pub faction: Vec<String>,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub agility: i32,
    #[serde(default)]
    pub hull: i32,
    #[serde(default)]
    pub shields: i32,
    #[serde(default)]
    pub actions: Vec<String>,
    /// Speed rows by bearing columns; each cell is a difficulty code.
    #[serde(default)]
    pub maneuvers: Vec<Vec<i32>>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub xws: String,
}

/// One entry of the pilot catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawPilot {
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    /// Ship display name, not its short code.
    pub ship: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub skill: i32,
    #[serde(default, deserialize_with = "lenient_int")]
    pub points: i32,
    #[serde(default)]
    pub slots: Vec<String>,
    pub faction: String,
    #[serde(default)]
    pub xws: String,
}

impl RawShip {
    /// Parse the ship catalog from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::MalformedCatalog`] if the JSON does not describe
    /// a list of ships.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).map_err(|source| MetaError::MalformedCatalog {
            what: "ship",
            source,
        })
    }
}

impl RawPilot {
    /// Parse the pilot catalog from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::MalformedCatalog`] if the JSON does not describe
    /// a list of pilots.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).map_err(|source| MetaError::MalformedCatalog {
            what: "pilot",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbers::NUMERIC_SENTINEL;

    #[test]
    fn ship_catalog_parses_and_ignores_unknown_fields() {
        let json = r#"[
            {
                "name": "X-Wing",
                "faction": ["Rebel Alliance"],
                "attack": 3,
                "agility": 2,
                "hull": 3,
                "shields": 2,
                "actions": ["Focus", "Target Lock"],
                "maneuvers": [[0, 0, 0], [0, 2, 2]],
                "size": "small",
                "xws": "xwing",
                "id": 0
            }
        ]"#;
        let ships = RawShip::list_from_json(json).unwrap();
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0].xws, "xwing");
        assert_eq!(ships[0].maneuvers[1][2], 2);
    }

    #[test]
    fn pilot_catalog_coerces_variable_costs() {
        let json = r#"[
            {
                "name": "Nashtah Pup Pilot",
                "unique": true,
                "ship": "Z-95 Headhunter",
                "skill": "?",
                "points": "*",
                "slots": [],
                "faction": "Scum and Villainy",
                "xws": "nashtahpuppilot"
            }
        ]"#;
        let pilots = RawPilot::list_from_json(json).unwrap();
        assert_eq!(pilots[0].skill, NUMERIC_SENTINEL);
        assert_eq!(pilots[0].points, NUMERIC_SENTINEL);
        assert!(pilots[0].unique);
    }

    #[test]
    fn structural_errors_are_reported_per_catalog() {
        let err = RawPilot::list_from_json("{\"name\": 1}").unwrap_err();
        assert!(matches!(err, MetaError::MalformedCatalog { what: "pilot", .. }));
    }
}
