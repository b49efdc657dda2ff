//! X-Wing Metagame Engine
//!
//! Reconciles the ship catalog, the pilot catalog and a corpus of tournament
//! reports into one model keyed by canonical codes, then derives per-pilot
//! usage and per-list statistics. This crate performs no I/O; callers supply
//! the raw sources through [`SourceLoader`].

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod exceptions;
pub mod normalize;
pub mod numbers;
pub mod resolver;
pub mod stats;
pub mod tournament;
pub mod usage;

// Re-export commonly used types
pub use catalog::{Catalog, Pilot, PilotId, Ship, ShipId};
pub use config::{ConfigError, MalformedReportPolicy, RunConfig};
pub use data::{RawPilot, RawShip};
pub use error::MetaError;
pub use normalize::{CanonicalCode, Faction, canonical_faction, canonical_pilot, canonical_ship};
pub use numbers::{NUMERIC_SENTINEL, parse_int_or_sentinel};
pub use resolver::{
    ListInstance, ReportStatus, ReportWarning, ResolvedList, ResolvedPilot, TournamentOutcome,
    TournamentResolver,
};
pub use stats::{ListStats, SizeClass, pilot_label, summarize};
pub use tournament::Tournament;
pub use usage::{DataCounts, PilotUsage, Tier, Usage, UsageBook, UsageSink};

use serde::Serialize;
use thiserror::Error;

/// Trait for abstracting access to the raw sources.
/// Platform-specific implementations should provide this
pub trait SourceLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw ship catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the ship catalog cannot be read.
    fn load_ships(&self) -> Result<Vec<RawShip>, Self::Error>;

    /// Load the raw pilot catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the pilot catalog cannot be read.
    fn load_pilots(&self) -> Result<Vec<RawPilot>, Self::Error>;

    /// Names of every tournament report, in processing order
    ///
    /// # Errors
    ///
    /// Returns an error if the reports cannot be enumerated.
    fn report_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Raw contents of one tournament report
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be read.
    fn load_report(&self, name: &str) -> Result<String, Self::Error>;
}

/// Failures of a full run: either the sources could not be read or the data
/// could not be reconciled.
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error("source unavailable: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A report that was left out because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedReport {
    pub report: String,
    pub reason: String,
}

/// Tournament-level accumulation for one run over one catalog.
///
/// Reports are ingested one at a time; list instances and counters only
/// ever grow.
#[derive(Debug)]
pub struct MetaRun<'a> {
    resolver: TournamentResolver<'a>,
    policy: MalformedReportPolicy,
    usage: UsageBook,
    lists: Vec<ListInstance>,
    all_time: DataCounts,
    recent: DataCounts,
    skipped: Vec<SkippedReport>,
}

impl<'a> MetaRun<'a> {
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(catalog: &'a Catalog, config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            resolver: TournamentResolver::new(catalog, config),
            policy: config.on_malformed_report,
            usage: UsageBook::for_catalog(catalog),
            lists: Vec::new(),
            all_time: DataCounts::default(),
            recent: DataCounts::default(),
            skipped: Vec::new(),
        })
    }

    /// Parse, resolve and accumulate one report.
    ///
    /// Returns `None` when the report was malformed and the policy is
    /// [`MalformedReportPolicy::Skip`].
    ///
    /// # Errors
    ///
    /// Propagates every fatal [`MetaError`], and malformed reports under
    /// [`MalformedReportPolicy::Abort`].
    pub fn ingest_json(
        &mut self,
        report: &str,
        json: &str,
    ) -> Result<Option<ReportStatus>, MetaError> {
        let tournament = match Tournament::from_json(report, json) {
            Ok(tournament) => tournament,
            Err(err) if self.policy == MalformedReportPolicy::Skip => {
                log::error!("skipping report: {err}");
                self.skipped.push(SkippedReport {
                    report: report.to_string(),
                    reason: err.to_string(),
                });
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        self.ingest(report, &tournament).map(Some)
    }

    /// Resolve and accumulate one parsed report.
    ///
    /// # Errors
    ///
    /// Propagates every fatal [`MetaError`] from resolution.
    pub fn ingest(
        &mut self,
        report: &str,
        tournament: &Tournament,
    ) -> Result<ReportStatus, MetaError> {
        let outcome = self.resolver.resolve(report, tournament, &mut self.usage)?;
        if outcome.status == ReportStatus::Tabulated {
            let lists = u32::try_from(outcome.lists.len()).unwrap_or(u32::MAX);
            Self::count(&mut self.all_time, lists, outcome.pilot_instances);
            if outcome.recent {
                Self::count(&mut self.recent, lists, outcome.pilot_instances);
            }
        }
        self.lists.extend(outcome.lists);
        Ok(outcome.status)
    }

    fn count(counts: &mut DataCounts, lists: u32, pilot_instances: u32) {
        counts.tournaments += 1;
        counts.list_instances += lists;
        counts.pilot_instances += pilot_instances;
    }

    #[must_use]
    pub const fn all_time(&self) -> DataCounts {
        self.all_time
    }

    #[must_use]
    pub const fn recent(&self) -> DataCounts {
        self.recent
    }

    #[must_use]
    pub const fn usage(&self) -> &UsageBook {
        &self.usage
    }

    #[must_use]
    pub fn lists(&self) -> &[ListInstance] {
        &self.lists
    }

    #[must_use]
    pub fn finish(self) -> RunTotals {
        RunTotals {
            usage: self.usage,
            lists: self.lists,
            all_time: self.all_time,
            recent: self.recent,
            skipped: self.skipped,
        }
    }
}

/// Everything accumulated from the tournament corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub usage: UsageBook,
    pub lists: Vec<ListInstance>,
    pub all_time: DataCounts,
    pub recent: DataCounts,
    pub skipped: Vec<SkippedReport>,
}

/// The reconciled catalog plus everything derived from the reports.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub catalog: Catalog,
    pub totals: RunTotals,
}

impl RunOutput {
    /// Statistics for every list instance, in ingestion order.
    ///
    /// # Errors
    ///
    /// Fails on the first list containing a ship of unrecognized size.
    pub fn list_stats(&self) -> Result<Vec<(&ListInstance, ListStats)>, MetaError> {
        self.totals
            .lists
            .iter()
            .map(|instance| Ok((instance, summarize(&instance.list, &self.catalog)?)))
            .collect()
    }
}

/// Main engine driving a full run over a [`SourceLoader`].
pub struct MetaEngine<L>
where
    L: SourceLoader,
{
    loader: L,
    config: RunConfig,
}

impl<L> MetaEngine<L>
where
    L: SourceLoader,
{
    /// Create a new engine with the provided loader and configuration
    pub const fn new(loader: L, config: RunConfig) -> Self {
        Self { loader, config }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Build the catalog from the loader's ship and pilot sources.
    ///
    /// # Errors
    ///
    /// Returns an error if either source cannot be loaded or reconciled.
    pub fn build_catalog(&self) -> Result<Catalog, RunError<L::Error>> {
        let ships = self.loader.load_ships().map_err(RunError::Source)?;
        let pilots = self.loader.load_pilots().map_err(RunError::Source)?;
        Ok(Catalog::build(ships, pilots)?)
    }

    /// Run the whole pipeline: catalog, then every report in loader order.
    ///
    /// # Errors
    ///
    /// Returns the first source, configuration or reconciliation failure.
    pub fn run(&self) -> Result<RunOutput, RunError<L::Error>> {
        let catalog = self.build_catalog()?;
        let names = self.loader.report_names().map_err(RunError::Source)?;
        let totals = {
            let mut run = MetaRun::new(&catalog, &self.config)?;
            for name in &names {
                let json = self.loader.load_report(name).map_err(RunError::Source)?;
                run.ingest_json(name, &json)?;
            }
            run.finish()
        };
        log::info!(
            "processed {} reports: {} tournaments, {} lists, {} pilot instances",
            names.len(),
            totals.all_time.tournaments,
            totals.all_time.list_instances,
            totals.all_time.pilot_instances
        );
        Ok(RunOutput { catalog, totals })
    }
}
