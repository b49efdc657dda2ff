//! Per-pilot usage counters split by tournament tier and recency.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PilotId};
use crate::error::{MetaError, Result};

/// Competitive level of a tournament, taken from the report's scope label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    WorldChampionship,
    Nationals,
    Regional,
    StoreChampionship,
    Vassal,
    Other,
}

impl Tier {
    /// Classify a scope label, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::UnrecognizedTier`] for labels outside the fixed
    /// set; they are never folded into [`Tier::Other`].
    pub fn from_scope(scope: &str) -> Result<Self> {
        match scope.to_lowercase().as_str() {
            "world championship" => Ok(Self::WorldChampionship),
            "nationals" => Ok(Self::Nationals),
            "regional" => Ok(Self::Regional),
            "store championship" => Ok(Self::StoreChampionship),
            "vassal play" => Ok(Self::Vassal),
            "other" => Ok(Self::Other),
            _ => Err(MetaError::UnrecognizedTier {
                scope: scope.to_string(),
            }),
        }
    }
}

/// Usage counters. `total` always equals the sum of the tier fields because
/// [`Usage::increment`] is the only way to change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    total: u32,
    worlds: u32,
    nationals: u32,
    regionals: u32,
    stores: u32,
    vassals: u32,
    other: u32,
}

impl Usage {
    pub fn increment(&mut self, tier: Tier) {
        let slot = match tier {
            Tier::WorldChampionship => &mut self.worlds,
            Tier::Nationals => &mut self.nationals,
            Tier::Regional => &mut self.regionals,
            Tier::StoreChampionship => &mut self.stores,
            Tier::Vassal => &mut self.vassals,
            Tier::Other => &mut self.other,
        };
        *slot += 1;
        self.total += 1;
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn tier(&self, tier: Tier) -> u32 {
        match tier {
            Tier::WorldChampionship => self.worlds,
            Tier::Nationals => self.nationals,
            Tier::Regional => self.regionals,
            Tier::StoreChampionship => self.stores,
            Tier::Vassal => self.vassals,
            Tier::Other => self.other,
        }
    }

    /// Tier counts in report column order: worlds, nationals, regionals,
    /// stores, vassals, other.
    #[must_use]
    pub const fn tiers(&self) -> [u32; 6] {
        [
            self.worlds,
            self.nationals,
            self.regionals,
            self.stores,
            self.vassals,
            self.other,
        ]
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.tiers().iter().sum::<u32>() == self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PilotUsage {
    pub all_time: Usage,
    pub recent: Usage,
}

/// Destination for usage increments produced by tournament resolution.
pub trait UsageSink {
    /// Count one fielded instance of `pilot` at a `tier` tournament.
    fn record(&mut self, pilot: PilotId, tier: Tier, recent: bool);
}

/// Usage counters for every pilot in a catalog, indexed by [`PilotId`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageBook {
    pilots: Vec<PilotUsage>,
}

impl UsageBook {
    #[must_use]
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            pilots: vec![PilotUsage::default(); catalog.pilots().len()],
        }
    }

    #[must_use]
    pub fn get(&self, pilot: PilotId) -> PilotUsage {
        self.pilots.get(pilot.0).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PilotId, &PilotUsage)> {
        self.pilots
            .iter()
            .enumerate()
            .map(|(idx, usage)| (PilotId(idx), usage))
    }
}

impl UsageSink for UsageBook {
    fn record(&mut self, pilot: PilotId, tier: Tier, recent: bool) {
        if pilot.0 >= self.pilots.len() {
            self.pilots.resize(pilot.0 + 1, PilotUsage::default());
        }
        let entry = &mut self.pilots[pilot.0];
        entry.all_time.increment(tier);
        if recent {
            entry.recent.increment(tier);
        }
    }
}

/// Totals of tabulated tournaments, lists and pilot instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataCounts {
    pub tournaments: u32,
    pub list_instances: u32,
    pub pilot_instances: u32,
}
