//! Canonical identifiers shared by the ship catalog, the pilot catalog and
//! tournament reports.
//!
//! Ship codes look like `rebel/xwing`; pilot codes extend them with the
//! pilot token, e.g. `rebel/xwing/lukeskywalker`.
use serde::{Deserialize, Serialize};

use crate::error::{MetaError, Result};
use crate::exceptions::{
    FACTION_SYNONYMS, PILOT_REWRITES, SHIP_SUBSTRING_REWRITES, SHIP_TOKEN_REWRITES,
};

/// Cross-source identifier for a ship or pilot.
pub type CanonicalCode = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Rebel,
    Imperial,
    Scum,
}

impl Faction {
    pub const ALL: [Self; 3] = [Self::Rebel, Self::Imperial, Self::Scum];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rebel => "rebel",
            Self::Imperial => "imperial",
            Self::Scum => "scum",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map any known faction spelling onto one of the three canonical factions.
///
/// # Errors
///
/// Returns [`MetaError::UnrecognizedFaction`] for anything outside the
/// synonym table.
pub fn canonical_faction(raw: &str) -> Result<Faction> {
    let lowered = raw.to_lowercase();
    FACTION_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lowered)
        .map(|(_, faction)| *faction)
        .ok_or(MetaError::UnrecognizedFaction { faction: lowered })
}

fn ship_token(ship: &str) -> String {
    let mut token = ship.to_lowercase();
    for (from, to) in SHIP_SUBSTRING_REWRITES {
        token = token.replace(from, to);
    }
    if let Some((_, to)) = SHIP_TOKEN_REWRITES.iter().find(|(from, _)| *from == token) {
        token = (*to).to_string();
    }
    token
}

/// Canonical code for a ship fielded by `faction`.
///
/// `ship` may be either a short code (`tiadvanced`) or a display name
/// (`TIE Adv. Prototype`); the two spellings produce distinct codes.
///
/// # Errors
///
/// Returns [`MetaError::UnrecognizedFaction`] when the faction is unknown.
pub fn canonical_ship(faction: &str, ship: &str) -> Result<CanonicalCode> {
    let faction = canonical_faction(faction)?;
    Ok(format!("{faction}/{}", ship_token(ship)))
}

/// Canonical code for a pilot flying `ship` for `faction`.
///
/// # Errors
///
/// Returns [`MetaError::UnrecognizedFaction`] when the faction is unknown.
pub fn canonical_pilot(faction: &str, ship: &str, pilot: &str) -> Result<CanonicalCode> {
    let mut pilot_token = pilot.to_lowercase();
    let mut ship = ship;
    if let Some(rewrite) = PILOT_REWRITES.iter().find(|r| r.token == pilot_token) {
        pilot_token = rewrite.pilot.to_string();
        if let Some(replacement) = rewrite.ship {
            ship = replacement;
        }
    }
    let ship_code = canonical_ship(faction, ship)?;
    Ok(format!("{ship_code}/{pilot_token}"))
}
