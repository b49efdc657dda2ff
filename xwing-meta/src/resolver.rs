//! Tournament resolution: ties every fielded pilot in a report to a catalog
//! pilot and feeds the usage counters.
//!
//! A report is resolved in two phases. Every pilot reference is looked up
//! first; only when all of them resolve are usage increments applied and
//! list instances emitted, so a failing report never leaves partial counts
//! behind.
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{Catalog, PilotId};
use crate::config::RunConfig;
use crate::error::{MetaError, Result};
use crate::normalize::canonical_pilot;
use crate::numbers::len_to_i64;
use crate::tournament::{List, PilotInstance, Tournament};
use crate::usage::{Tier, UsageSink};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fielded pilot tied to its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPilot {
    pub pilot: PilotId,
    pub pilot_ref: String,
    pub ship_ref: String,
    pub upgrades: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedList {
    /// Faction as the report spells it.
    pub faction: String,
    pub pilots: Vec<ResolvedPilot>,
}

/// One fielded list together with the event it was fielded at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListInstance {
    pub event_name: String,
    pub event_country: String,
    pub event_state: String,
    pub event_scope: String,
    pub event_date: String,
    pub event_players: i64,
    pub event_rank: i64,
    pub list: ResolvedList,
}

/// Recoverable oddities found while resolving a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    NoPlayers,
    MissingPlayerCount { listed: i64 },
    UnderReportedPlayers { declared: i64, listed: i64 },
    NonStandardFormat { format: String },
    UnparsableDate { date: String },
    EmptyList { rank: i64 },
    NoLists,
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlayers => write!(f, "tournament has no players"),
            Self::MissingPlayerCount { listed } => {
                write!(f, "no player count declared, using {listed} listed players")
            }
            Self::UnderReportedPlayers { declared, listed } => write!(
                f,
                "under-reported player count: declared {declared}, listed {listed}"
            ),
            Self::NonStandardFormat { format } => {
                write!(f, "not a standard tournament (format {format:?})")
            }
            Self::UnparsableDate { date } => write!(f, "could not parse tournament date {date:?}"),
            Self::EmptyList { rank } => write!(f, "player ranked {rank} has a list but no pilots"),
            Self::NoLists => write!(f, "no lists reported"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// At least one list was resolved and counted.
    Tabulated,
    /// Nothing to count: no players or no fielded lists.
    Empty,
    /// Deliberately ignored, e.g. a non-standard format.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentOutcome {
    pub report: String,
    pub status: ReportStatus,
    pub recent: bool,
    /// Participant count after correcting under-reporting.
    pub player_count: i64,
    pub pilot_instances: u32,
    pub lists: Vec<ListInstance>,
    pub warnings: Vec<ReportWarning>,
}

impl TournamentOutcome {
    fn new(report: &str) -> Self {
        Self {
            report: report.to_string(),
            status: ReportStatus::Empty,
            recent: false,
            player_count: 0,
            pilot_instances: 0,
            lists: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: ReportWarning) {
        log::warn!("{}: {warning}", self.report);
        self.warnings.push(warning);
    }
}

/// Resolves reports against one catalog with fixed format and recency rules.
#[derive(Debug, Clone)]
pub struct TournamentResolver<'a> {
    catalog: &'a Catalog,
    standard_format: String,
    recent_since: NaiveDate,
}

impl<'a> TournamentResolver<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, config: &RunConfig) -> Self {
        Self {
            catalog,
            standard_format: config.standard_format.to_lowercase(),
            recent_since: config.recent_since(),
        }
    }

    #[must_use]
    pub const fn recent_since(&self) -> NaiveDate {
        self.recent_since
    }

    /// Parse and resolve a report file's contents.
    ///
    /// # Errors
    ///
    /// See [`TournamentResolver::resolve`]; additionally returns
    /// [`MetaError::MalformedReport`] when the JSON cannot be parsed.
    pub fn resolve_json(
        &self,
        report: &str,
        json: &str,
        sink: &mut dyn UsageSink,
    ) -> Result<TournamentOutcome> {
        let tournament = Tournament::from_json(report, json)?;
        self.resolve(report, &tournament, sink)
    }

    /// Resolve one tournament, recording usage into `sink`.
    ///
    /// # Errors
    ///
    /// Fails when a fielded pilot cannot be found in the catalog, when a
    /// list's faction is unknown, or when the tournament's scope is not a
    /// recognized tier. Nothing is recorded into `sink` on failure.
    pub fn resolve(
        &self,
        report: &str,
        tournament: &Tournament,
        sink: &mut dyn UsageSink,
    ) -> Result<TournamentOutcome> {
        let mut outcome = TournamentOutcome::new(report);

        if tournament.players.is_empty() {
            outcome.warn(ReportWarning::NoPlayers);
            return Ok(outcome);
        }

        let listed = len_to_i64(tournament.players.len());
        outcome.player_count = tournament.participant_count;
        if outcome.player_count < listed {
            let warning = if outcome.player_count == 0 {
                ReportWarning::MissingPlayerCount { listed }
            } else {
                ReportWarning::UnderReportedPlayers {
                    declared: outcome.player_count,
                    listed,
                }
            };
            outcome.warn(warning);
            outcome.player_count = listed;
        }

        if tournament.format.to_lowercase() != self.standard_format {
            outcome.status = ReportStatus::Skipped;
            outcome.warn(ReportWarning::NonStandardFormat {
                format: tournament.format.clone(),
            });
            return Ok(outcome);
        }

        outcome.recent = match NaiveDate::parse_from_str(&tournament.date, DATE_FORMAT) {
            Ok(date) => date >= self.recent_since,
            Err(_) => {
                outcome.warn(ReportWarning::UnparsableDate {
                    date: tournament.date.clone(),
                });
                false
            }
        };
        if outcome.recent {
            log::debug!("{report}: recent event ({})", tournament.date);
        }

        let mut resolved = Vec::new();
        for (player, list) in tournament.players_with_lists() {
            if list.pilots.is_empty() {
                outcome.warn(ReportWarning::EmptyList {
                    rank: player.rank.swiss,
                });
                continue;
            }
            resolved.push((player.rank.swiss, self.resolve_list(report, list)?));
        }

        if resolved.is_empty() {
            outcome.warn(ReportWarning::NoLists);
            return Ok(outcome);
        }

        let tier = Tier::from_scope(&tournament.scope)?;
        for (rank, list) in resolved {
            for fielded in &list.pilots {
                sink.record(fielded.pilot, tier, outcome.recent);
                outcome.pilot_instances += 1;
            }
            outcome.lists.push(ListInstance {
                event_name: tournament.name.clone(),
                event_country: tournament.venue.country.clone(),
                event_state: tournament.venue.state.clone(),
                event_scope: tournament.scope.clone(),
                event_date: tournament.date.clone(),
                event_players: outcome.player_count,
                event_rank: rank,
                list,
            });
        }
        outcome.status = ReportStatus::Tabulated;
        Ok(outcome)
    }

    fn resolve_list(&self, report: &str, list: &List) -> Result<ResolvedList> {
        let pilots = list
            .pilots
            .iter()
            .map(|instance| self.resolve_pilot(report, &list.faction, instance))
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedList {
            faction: list.faction.clone(),
            pilots,
        })
    }

    fn resolve_pilot(
        &self,
        report: &str,
        faction: &str,
        instance: &PilotInstance,
    ) -> Result<ResolvedPilot> {
        let code = canonical_pilot(faction, &instance.ship, &instance.pilot)?;
        let pilot = self
            .catalog
            .pilot_by_code(&code)
            .ok_or_else(|| MetaError::UnknownPilot {
                report: report.to_string(),
                code,
                faction: faction.to_string(),
                ship: instance.ship.clone(),
                pilot: instance.pilot.clone(),
            })?;
        Ok(ResolvedPilot {
            pilot,
            pilot_ref: instance.pilot.clone(),
            ship_ref: instance.ship.clone(),
            upgrades: instance.upgrades.clone(),
        })
    }
}
