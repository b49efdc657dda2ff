//! Error taxonomy for catalog reconciliation.
//!
//! Every variant here is a data defect: the exception tables are out of date
//! relative to one of the sources, and continuing would misattribute
//! statistics. Recoverable conditions are reported as
//! [`crate::ReportWarning`] instead.
use thiserror::Error;

/// Fatal reconciliation failures.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("unrecognized faction {faction:?}")]
    UnrecognizedFaction { faction: String },
    #[error("unrecognized tournament scope {scope:?}")]
    UnrecognizedTier { scope: String },
    #[error("unrecognized ship size {size:?} for {ship}")]
    UnrecognizedSize { ship: String, size: String },
    #[error("duplicate ship code {code}: {existing} already registered, {new} collides")]
    DuplicateShip {
        code: String,
        existing: String,
        new: String,
    },
    #[error("duplicate pilot code {code}: {existing} already registered, {new} collides")]
    DuplicatePilot {
        code: String,
        existing: String,
        new: String,
    },
    #[error("pilot {pilot} ({pilot_xws}) references unknown ship {ship_code}")]
    PilotWithoutShip {
        pilot: String,
        pilot_xws: String,
        ship_code: String,
    },
    #[error("{report}: unknown pilot {code} (faction {faction:?}, ship {ship:?}, pilot {pilot:?})")]
    UnknownPilot {
        report: String,
        code: String,
        faction: String,
        ship: String,
        pilot: String,
    },
    #[error("{report}: malformed report at line {line}, column {column}: {source}")]
    MalformedReport {
        report: String,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {what} catalog: {source}")]
    MalformedCatalog {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl MetaError {
    /// Wrap a report parse failure with its position in the source text.
    #[must_use]
    pub fn malformed_report(report: &str, source: serde_json::Error) -> Self {
        Self::MalformedReport {
            report: report.to_string(),
            line: source.line(),
            column: source.column(),
            source,
        }
    }

    /// Whether this error came from parsing a single report rather than from
    /// reconciling its contents.
    #[must_use]
    pub const fn is_malformed_report(&self) -> bool {
        matches!(self, Self::MalformedReport { .. })
    }
}

pub type Result<T, E = MetaError> = std::result::Result<T, E>;
