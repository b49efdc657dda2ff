//! Reconciled ship and pilot catalog.
//!
//! The catalog is built once per run from the raw ship and pilot sources and
//! is read-only afterwards. Pilots refer to their ship through a [`ShipId`]
//! index rather than a pointer, and everything else (tournament resolution,
//! usage, list statistics) refers to pilots through a [`PilotId`].
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::data::{RawPilot, RawShip};
use crate::error::{MetaError, Result};
use crate::exceptions::{
    PILOT_SHIP_OVERRIDES, REPORT_EXCLUDED_PILOTS, REPORT_EXCLUDED_SIZES, supplemental_ships,
};
use crate::normalize::{CanonicalCode, Faction, canonical_faction, canonical_pilot, canonical_ship};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PilotId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ship {
    pub name: String,
    pub factions: BTreeSet<Faction>,
    pub attack: i32,
    pub agility: i32,
    pub hull: i32,
    pub shields: i32,
    pub actions: Vec<String>,
    pub maneuvers: Vec<Vec<i32>>,
    pub size: String,
    pub xws: String,
}

impl Ship {
    /// Difficulty code of the maneuver at `speed` and `bearing`, or `None`
    /// when the dial does not offer it.
    #[must_use]
    pub fn maneuver(&self, speed: usize, bearing: usize) -> Option<i32> {
        self.maneuvers
            .get(speed)
            .and_then(|row| row.get(bearing))
            .copied()
            .filter(|difficulty| *difficulty >= 0)
    }

    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name, self.xws)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pilot {
    pub name: String,
    pub unique: bool,
    /// Ship display name as the pilot source spells it, after overrides.
    pub ship_name: String,
    pub skill: i32,
    pub points: i32,
    pub slots: Vec<String>,
    /// Faction as the pilot source spells it (`Rebel Alliance`).
    pub faction_label: String,
    pub faction: Faction,
    pub xws: String,
    pub ship: ShipId,
    pub code: CanonicalCode,
}

impl Pilot {
    fn describe(&self) -> String {
        format!("{} ({}, {})", self.name, self.xws, self.ship_name)
    }
}

/// Immutable lookup structures over every ship and pilot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ships: Vec<Ship>,
    pilots: Vec<Pilot>,
    ship_by_code: HashMap<CanonicalCode, ShipId>,
    ship_by_display_code: HashMap<CanonicalCode, ShipId>,
    pilot_by_code: HashMap<CanonicalCode, PilotId>,
    pilots_by_display_name: BTreeMap<String, Vec<PilotId>>,
}

impl Catalog {
    /// Reconcile the raw ship and pilot sources.
    ///
    /// # Errors
    ///
    /// Fails on an unknown faction, on two records normalizing to the same
    /// canonical code, or on a pilot whose ship cannot be found.
    pub fn build(raw_ships: Vec<RawShip>, raw_pilots: Vec<RawPilot>) -> Result<Self> {
        let mut catalog = Self::default();
        for raw in raw_ships.into_iter().chain(supplemental_ships()) {
            catalog.insert_ship(raw)?;
        }
        for raw in raw_pilots {
            catalog.insert_pilot(raw)?;
        }
        log::info!(
            "catalog built: {} ships, {} pilots",
            catalog.ships.len(),
            catalog.pilots.len()
        );
        Ok(catalog)
    }

    fn insert_ship(&mut self, raw: RawShip) -> Result<()> {
        let factions = raw
            .faction
            .iter()
            .map(|f| canonical_faction(f))
            .collect::<Result<BTreeSet<_>>>()?;
        let id = ShipId(self.ships.len());
        let ship = Ship {
            name: raw.name,
            factions,
            attack: raw.attack,
            agility: raw.agility,
            hull: raw.hull,
            shields: raw.shields,
            actions: raw.actions,
            maneuvers: raw.maneuvers,
            size: raw.size,
            xws: raw.xws,
        };

        for faction in &ship.factions {
            let code = canonical_ship(faction.as_str(), &ship.xws)?;
            Self::claim_ship_code(&self.ships, &mut self.ship_by_code, code, id, &ship)?;
            let display = canonical_ship(faction.as_str(), &ship.name)?;
            Self::claim_ship_code(
                &self.ships,
                &mut self.ship_by_display_code,
                display,
                id,
                &ship,
            )?;
        }
        self.ships.push(ship);
        Ok(())
    }

    fn claim_ship_code(
        ships: &[Ship],
        map: &mut HashMap<CanonicalCode, ShipId>,
        code: CanonicalCode,
        id: ShipId,
        ship: &Ship,
    ) -> Result<()> {
        if let Some(existing) = map.get(&code) {
            return Err(MetaError::DuplicateShip {
                code,
                existing: ships[existing.0].describe(),
                new: ship.describe(),
            });
        }
        map.insert(code, id);
        Ok(())
    }

    fn insert_pilot(&mut self, raw: RawPilot) -> Result<()> {
        let faction = canonical_faction(&raw.faction)?;
        let ship_name = PILOT_SHIP_OVERRIDES
            .iter()
            .find(|(xws, _)| *xws == raw.xws)
            .map_or(raw.ship, |(xws, ship)| {
                log::debug!("pilot {xws} re-pointed at {ship}");
                (*ship).to_string()
            });

        let display_code = canonical_ship(&raw.faction, &ship_name)?;
        let ship_id = *self.ship_by_display_code.get(&display_code).ok_or_else(|| {
            MetaError::PilotWithoutShip {
                pilot: raw.name.clone(),
                pilot_xws: raw.xws.clone(),
                ship_code: display_code.clone(),
            }
        })?;

        let code = canonical_pilot(&raw.faction, &self.ships[ship_id.0].xws, &raw.xws)?;
        let pilot = Pilot {
            name: raw.name,
            unique: raw.unique,
            ship_name,
            skill: raw.skill,
            points: raw.points,
            slots: raw.slots,
            faction_label: raw.faction,
            faction,
            xws: raw.xws,
            ship: ship_id,
            code,
        };
        if let Some(existing) = self.pilot_by_code.get(&pilot.code) {
            return Err(MetaError::DuplicatePilot {
                code: pilot.code.clone(),
                existing: self.pilots[existing.0].describe(),
                new: pilot.describe(),
            });
        }

        let id = PilotId(self.pilots.len());
        self.pilot_by_code.insert(pilot.code.clone(), id);
        self.pilots_by_display_name
            .entry(pilot.name.clone())
            .or_default()
            .push(id);
        self.pilots.push(pilot);
        Ok(())
    }

    #[must_use]
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    #[must_use]
    pub fn pilots(&self) -> &[Pilot] {
        &self.pilots
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this catalog.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> &Ship {
        &self.ships[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this catalog.
    #[must_use]
    pub fn pilot(&self, id: PilotId) -> &Pilot {
        &self.pilots[id.0]
    }

    /// The ship a pilot flies.
    #[must_use]
    pub fn ship_of(&self, pilot: PilotId) -> &Ship {
        self.ship(self.pilot(pilot).ship)
    }

    /// Look up a ship by its short-code based canonical code.
    #[must_use]
    pub fn ship_by_code(&self, code: &str) -> Option<ShipId> {
        self.ship_by_code.get(code).copied()
    }

    /// Look up a ship by its display-name based canonical code.
    #[must_use]
    pub fn ship_by_display_code(&self, code: &str) -> Option<ShipId> {
        self.ship_by_display_code.get(code).copied()
    }

    #[must_use]
    pub fn pilot_by_code(&self, code: &str) -> Option<PilotId> {
        self.pilot_by_code.get(code).copied()
    }

    /// All pilots sharing a display name, in catalog order.
    #[must_use]
    pub fn pilots_named(&self, name: &str) -> &[PilotId] {
        self.pilots_by_display_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether more than one catalog pilot carries this display name.
    #[must_use]
    pub fn is_ambiguous_name(&self, name: &str) -> bool {
        self.pilots_named(name).len() > 1
    }

    /// Display names shared by two or more pilots, ordered by name.
    pub fn duplicate_names(&self) -> impl Iterator<Item = (&str, &[PilotId])> {
        self.pilots_by_display_name
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    /// Pilots that belong in the per-pilot usage report, in catalog order.
    pub fn reportable_pilots(&self) -> impl Iterator<Item = PilotId> + '_ {
        self.pilots.iter().enumerate().filter_map(|(idx, pilot)| {
            let size = self.ship(pilot.ship).size.as_str();
            let excluded = REPORT_EXCLUDED_SIZES.contains(&size)
                || REPORT_EXCLUDED_PILOTS.contains(&pilot.xws.as_str());
            (!excluded).then_some(PilotId(idx))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_ship(name: &str, xws: &str, factions: &[&str], size: &str) -> RawShip {
        RawShip {
            name: name.to_string(),
            faction: factions.iter().map(ToString::to_string).collect(),
            attack: 3,
            agility: 2,
            hull: 3,
            shields: 2,
            actions: vec!["Focus".to_string()],
            maneuvers: vec![vec![-1, 0, -1], vec![1, 2, 1]],
            size: size.to_string(),
            xws: xws.to_string(),
        }
    }

    fn raw_pilot(name: &str, xws: &str, ship: &str, faction: &str) -> RawPilot {
        RawPilot {
            name: name.to_string(),
            unique: true,
            ship: ship.to_string(),
            skill: 5,
            points: 20,
            slots: vec!["Elite".to_string()],
            faction: faction.to_string(),
            xws: xws.to_string(),
        }
    }

    #[test]
    fn builds_both_ship_maps_per_faction() {
        let ships = vec![raw_ship(
            "YT-1300",
            "yt1300",
            &["Rebel Alliance", "Resistance", "Scum and Villainy"],
            "large",
        )];
        let catalog = Catalog::build(ships, Vec::new()).unwrap();
        let id = catalog.ship_by_code("rebel/yt1300").unwrap();
        assert_eq!(catalog.ship_by_code("scum/yt1300"), Some(id));
        assert_eq!(catalog.ship_by_display_code("rebel/yt-1300"), Some(id));
        assert_eq!(catalog.ship_by_display_code("scum/yt-1300"), Some(id));
        assert_eq!(catalog.ship(id).factions.len(), 2);
        assert!(catalog.ship_by_code("imperial/yt1300").is_none());
    }

    #[test]
    fn supplemental_ship_is_always_present() {
        let catalog = Catalog::build(Vec::new(), Vec::new()).unwrap();
        assert!(catalog.ship_by_code("rebel/yt1300outerrimsmuggler").is_some());
        assert!(
            catalog
                .ship_by_display_code("rebel/yt-1300 (outer rim smuggler)")
                .is_some()
        );
    }

    #[test]
    fn duplicate_ship_codes_are_fatal() {
        let ships = vec![
            raw_ship("X-Wing", "xwing", &["Rebel Alliance"], "small"),
            raw_ship("X-Wing Mk2", "XWing", &["Rebel Alliance"], "small"),
        ];
        let err = Catalog::build(ships, Vec::new()).unwrap_err();
        match err {
            MetaError::DuplicateShip {
                code,
                existing,
                new,
            } => {
                assert_eq!(code, "rebel/xwing");
                assert!(existing.contains("X-Wing (xwing)"));
                assert!(new.contains("X-Wing Mk2"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_display_codes_are_fatal() {
        let ships = vec![
            raw_ship("Firespray-31", "firespray31", &["Scum and Villainy"], "large"),
            raw_ship("FIRESPRAY-31", "firespray31b", &["Scum"], "large"),
        ];
        assert!(matches!(
            Catalog::build(ships, Vec::new()),
            Err(MetaError::DuplicateShip { .. })
        ));
    }

    #[test]
    fn duplicate_pilot_codes_are_fatal() {
        let ships = vec![raw_ship("X-Wing", "xwing", &["Rebel Alliance"], "small")];
        let pilots = vec![
            raw_pilot("Luke Skywalker", "lukeskywalker", "X-Wing", "Rebel Alliance"),
            raw_pilot("Luke Skywalker", "LukeSkywalker", "X-Wing", "Rebel Alliance"),
        ];
        let err = Catalog::build(ships, pilots).unwrap_err();
        assert!(matches!(
            err,
            MetaError::DuplicatePilot { ref code, .. } if code == "rebel/xwing/lukeskywalker"
        ));
    }

    #[test]
    fn pilot_without_ship_is_fatal() {
        let pilots = vec![raw_pilot(
            "Wedge Antilles",
            "wedgeantilles",
            "X-Wing",
            "Rebel Alliance",
        )];
        assert!(matches!(
            Catalog::build(Vec::new(), pilots),
            Err(MetaError::PilotWithoutShip { .. })
        ));
    }

    #[test]
    fn unknown_ship_faction_is_fatal() {
        let ships = vec![raw_ship("Fang Fighter", "fang", &["Mandalorian"], "small")];
        assert!(matches!(
            Catalog::build(ships, Vec::new()),
            Err(MetaError::UnrecognizedFaction { .. })
        ));
    }

    #[test]
    fn pilots_link_back_to_ships_and_share_names() {
        let ships = vec![
            raw_ship(
                "YT-1300",
                "yt1300",
                &["Rebel Alliance", "Scum and Villainy"],
                "large",
            ),
            raw_ship("T-70 X-Wing", "t70xwing", &["Resistance"], "small"),
        ];
        let pilots = vec![
            raw_pilot("Han Solo", "hansolo", "YT-1300", "Rebel Alliance"),
            raw_pilot("Han Solo", "hansolo", "YT-1300", "Scum and Villainy"),
            raw_pilot("Poe Dameron", "poedameron", "T-70 X-Wing", "Resistance"),
        ];
        let catalog = Catalog::build(ships, pilots).unwrap();
        let rebel = catalog.pilot_by_code("rebel/yt1300/hansolo").unwrap();
        let scum = catalog.pilot_by_code("scum/yt1300/hansolo").unwrap();
        assert_ne!(rebel, scum);
        assert_eq!(catalog.ship_of(rebel).xws, "yt1300");
        assert!(catalog.is_ambiguous_name("Han Solo"));
        assert!(!catalog.is_ambiguous_name("Poe Dameron"));
        let dupes: Vec<_> = catalog.duplicate_names().map(|(name, _)| name).collect();
        assert_eq!(dupes, vec!["Han Solo"]);
    }

    #[test]
    fn smuggler_pilot_is_re_pointed() {
        let ships = vec![raw_ship("YT-1300", "yt1300", &["Rebel Alliance"], "large")];
        let pilots = vec![raw_pilot(
            "Outer Rim Smuggler",
            "outerrimsmuggler",
            "YT-1300",
            "Rebel Alliance",
        )];
        let catalog = Catalog::build(ships, pilots).unwrap();
        let id = catalog
            .pilot_by_code("rebel/yt1300outerrimsmuggler/outerrimsmuggler")
            .unwrap();
        assert_eq!(catalog.pilot(id).ship_name, "YT-1300 (Outer Rim Smuggler)");
        assert_eq!(catalog.ship_of(id).shields, 4);
    }

    #[test]
    fn report_filter_skips_huge_ships_and_listed_pilots() {
        let ships = vec![
            raw_ship(
                "CR90 Corvette (Fore)",
                "cr90corvettefore",
                &["Rebel Alliance"],
                "huge",
            ),
            raw_ship("Z-95 Headhunter", "z95headhunter", &["Scum and Villainy"], "small"),
        ];
        let pilots = vec![
            raw_pilot(
                "CR90 Corvette (Fore)",
                "cr90corvettefore",
                "CR90 Corvette (Fore)",
                "Rebel Alliance",
            ),
            raw_pilot(
                "Nashtah Pup Pilot",
                "nashtahpuppilot",
                "Z-95 Headhunter",
                "Scum and Villainy",
            ),
            raw_pilot(
                "Binayre Pirate",
                "binayrepirate",
                "Z-95 Headhunter",
                "Scum and Villainy",
            ),
        ];
        let catalog = Catalog::build(ships, pilots).unwrap();
        let names: Vec<_> = catalog
            .reportable_pilots()
            .map(|id| catalog.pilot(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["Binayre Pirate"]);
    }

    #[test]
    fn maneuver_lookup_hides_unavailable_cells() {
        let catalog = Catalog::build(
            vec![raw_ship("X-Wing", "xwing", &["Rebel Alliance"], "small")],
            Vec::new(),
        )
        .unwrap();
        let ship = catalog.ship(catalog.ship_by_code("rebel/xwing").unwrap());
        assert_eq!(ship.maneuver(0, 0), None);
        assert_eq!(ship.maneuver(0, 1), Some(0));
        assert_eq!(ship.maneuver(1, 1), Some(2));
        assert_eq!(ship.maneuver(9, 0), None);
        assert!(ship.has_action("Focus"));
        assert!(!ship.has_action("Cloak"));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn foreign_pilot_id_panics() {
        let catalog = Catalog::build(
            vec![raw_ship("X-Wing", "xwing", &["Rebel Alliance"], "small")],
            Vec::new(),
        )
        .unwrap();
        let _ = catalog.pilot(PilotId(7));
    }
}
