//! Literal exception tables reconciling the three data sources.
//!
//! Each entry exists because one source spells something differently from
//! another. These are not transliteration rules: a new disagreement between
//! the sources needs a new row here, and anything not listed passes through
//! the normalizer unchanged.

use crate::data::RawShip;
use crate::normalize::Faction;

// Factions -----------------------------------------------------------------

/// Every lower-cased faction spelling accepted from any source.
pub const FACTION_SYNONYMS: &[(&str, Faction)] = &[
    ("rebel", Faction::Rebel),
    ("rebel alliance", Faction::Rebel),
    ("resistance", Faction::Rebel),
    ("imperial", Faction::Imperial),
    ("galactic empire", Faction::Imperial),
    ("first order", Faction::Imperial),
    ("scum", Faction::Scum),
    ("scum and villainy", Faction::Scum),
];

// Ships --------------------------------------------------------------------

/// Substring rewrites applied to every lower-cased ship token.
pub const SHIP_SUBSTRING_REWRITES: &[(&str, &str)] = &[("adv.", "advanced")];

/// Whole-token rewrites applied after the substring pass.
pub const SHIP_TOKEN_REWRITES: &[(&str, &str)] = &[("yt2400freighter", "yt2400")];

// Pilots -------------------------------------------------------------------

/// A pilot token rewrite; `ship` replaces the ship token as well when the
/// tournament source folds a ship variant into the pilot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PilotRewrite {
    pub token: &'static str,
    pub pilot: &'static str,
    pub ship: Option<&'static str>,
}

pub const PILOT_REWRITES: &[PilotRewrite] = &[
    PilotRewrite {
        token: "ltlorrir",
        pilot: "lieutenantlorrir",
        ship: None,
    },
    PilotRewrite {
        token: "blackeightsqpilot",
        pilot: "blackeightsquadronpilot",
        ship: None,
    },
    PilotRewrite {
        token: "sabinewren-swx56",
        pilot: "sabinewren",
        ship: None,
    },
    PilotRewrite {
        token: "outerrimsmuggler",
        pilot: "outerrimsmuggler",
        ship: Some("yt1300outerrimsmuggler"),
    },
];

/// Pilots whose catalog ship reference is replaced before lookup, keyed by
/// pilot short code.
pub const PILOT_SHIP_OVERRIDES: &[(&str, &str)] =
    &[("outerrimsmuggler", "YT-1300 (Outer Rim Smuggler)")];

/// Ships that the ship catalog lacks but pilots and reports refer to.
#[must_use]
pub fn supplemental_ships() -> Vec<RawShip> {
    vec![RawShip {
        name: "YT-1300 (Outer Rim Smuggler)".to_string(),
        faction: vec!["Rebel Alliance".to_string()],
        attack: 2,
        agility: 1,
        hull: 6,
        shields: 4,
        actions: vec!["Focus".to_string(), "Target Lock".to_string()],
        maneuvers: vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![1, 2, 2, 2, 1, 0],
            vec![1, 1, 2, 1, 1, 0],
            vec![0, 1, 1, 1, 0, 3],
            vec![0, 0, 1, 0, 0, 3],
        ],
        size: "large".to_string(),
        xws: "yt1300outerrimsmuggler".to_string(),
    }]
}

// Display ------------------------------------------------------------------

/// Shared pilot names disambiguated by faction rather than by ship.
pub const CROSS_FACTION_CLASHES: &[&str] = &["Chewbacca", "Poe Dameron", "Han Solo"];

// Pilot report -------------------------------------------------------------

/// Ship sizes left out of the per-pilot report.
pub const REPORT_EXCLUDED_SIZES: &[&str] = &["huge"];

/// Pilot short codes left out of the per-pilot report.
pub const REPORT_EXCLUDED_PILOTS: &[&str] = &["nashtahpuppilot"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_have_unique_keys() {
        let factions: HashSet<_> = FACTION_SYNONYMS.iter().map(|(k, _)| *k).collect();
        assert_eq!(factions.len(), FACTION_SYNONYMS.len());
        let pilots: HashSet<_> = PILOT_REWRITES.iter().map(|r| r.token).collect();
        assert_eq!(pilots.len(), PILOT_REWRITES.len());
    }

    #[test]
    fn table_keys_are_lowercase() {
        for (key, _) in FACTION_SYNONYMS {
            assert_eq!(*key, key.to_lowercase());
        }
        for rewrite in PILOT_REWRITES {
            assert_eq!(rewrite.token, rewrite.token.to_lowercase());
        }
    }

    #[test]
    fn supplemental_smuggler_matches_override_target() {
        let ships = supplemental_ships();
        let (_, target) = PILOT_SHIP_OVERRIDES[0];
        assert!(ships.iter().any(|s| s.name == target));
        let rewrite = PILOT_REWRITES
            .iter()
            .find(|r| r.token == "outerrimsmuggler")
            .unwrap();
        assert_eq!(rewrite.ship, Some(ships[0].xws.as_str()));
    }
}
