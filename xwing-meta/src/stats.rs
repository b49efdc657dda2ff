//! Summary statistics for a single fielded list.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PilotId};
use crate::error::{MetaError, Result};
use crate::exceptions::CROSS_FACTION_CLASHES;
use crate::resolver::ResolvedList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    /// # Errors
    ///
    /// Returns [`MetaError::UnrecognizedSize`] for anything but `small` or
    /// `large`.
    pub fn parse(ship: &str, size: &str) -> Result<Self> {
        match size {
            "small" => Ok(Self::Small),
            "large" => Ok(Self::Large),
            other => Err(MetaError::UnrecognizedSize {
                ship: ship.to_string(),
                size: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListStats {
    pub sum_points: i32,
    pub num_ships: u32,
    pub num_uniques: u32,
    pub num_large: u32,
    pub num_small: u32,
    pub sum_skill: i32,
    pub sum_attack: i32,
    pub sum_agility: i32,
    pub sum_hull: i32,
    pub sum_shields: i32,
    /// Pilot labels in fielding order, comma separated.
    pub text: String,
}

/// Summarize a resolved list.
///
/// Variable-cost pilots contribute their sentinel value to the point and
/// skill sums, as the catalog records them.
///
/// # Errors
///
/// Returns [`MetaError::UnrecognizedSize`] when a ship is neither small nor
/// large.
pub fn summarize(list: &ResolvedList, catalog: &Catalog) -> Result<ListStats> {
    let mut stats = ListStats::default();
    let mut labels = Vec::with_capacity(list.pilots.len());

    for fielded in &list.pilots {
        let pilot = catalog.pilot(fielded.pilot);
        let ship = catalog.ship(pilot.ship);

        stats.sum_points += pilot.points;
        stats.sum_skill += pilot.skill;
        stats.sum_attack += ship.attack;
        stats.sum_agility += ship.agility;
        stats.sum_hull += ship.hull;
        stats.sum_shields += ship.shields;
        stats.num_ships += 1;
        if pilot.unique {
            stats.num_uniques += 1;
        }
        match SizeClass::parse(&ship.name, &ship.size)? {
            SizeClass::Small => stats.num_small += 1,
            SizeClass::Large => stats.num_large += 1,
        }

        labels.push(pilot_label(catalog, fielded.pilot));
    }

    stats.text = labels.join(", ");
    Ok(stats)
}

/// Display label for a pilot, disambiguated when its name is shared.
#[must_use]
pub fn pilot_label(catalog: &Catalog, id: PilotId) -> String {
    let pilot = catalog.pilot(id);
    if !catalog.is_ambiguous_name(&pilot.name) {
        return pilot.name.clone();
    }
    if CROSS_FACTION_CLASHES.contains(&pilot.name.as_str()) {
        format!("{} ({})", pilot.name, pilot.faction_label)
    } else {
        format!("{} ({})", pilot.name, pilot.ship_name)
    }
}
