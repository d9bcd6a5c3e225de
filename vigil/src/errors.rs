//! Typed error taxonomy for the scanning engine.
//!
//! Per-unit failures never abort a whole scan; they are recorded as notes on
//! the report. Registry and configuration failures are fatal and surface
//! before any unit is processed.

use thiserror::Error;

/// Errors produced by the engine and its collaborators.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A rule definition could not be compiled into the registry.
    ///
    /// Fatal: registry load is aborted on the first malformed rule.
    #[error("invalid rule `{rule_id}`: {reason}")]
    RuleDefinition {
        /// Identifier of the offending rule.
        rule_id: String,
        /// What was wrong with the definition.
        reason: String,
    },

    /// An unrecognized report format name was requested.
    ///
    /// Fatal to the render call only.
    #[error("unsupported report format `{0}` (expected `json` or `text`)")]
    UnsupportedFormat(String),

    /// A collaborator failed to supply content for a named unit.
    ///
    /// The unit is skipped with an `error: unreadable` note; the scan
    /// continues.
    #[error("unit `{unit_id}` could not be read: {reason}")]
    UnitRead {
        /// Identifier of the unit that could not be read.
        unit_id: String,
        /// Underlying read failure.
        reason: String,
    },

    /// The report could not be encoded into the requested format.
    #[error("failed to encode report: {0}")]
    ReportEncoding(#[from] serde_json::Error),

    /// A configuration file entry could not be compiled.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing a rendered report to its destination failed.
    #[error("failed to write report: {0}")]
    ReportWrite(#[from] std::io::Error),
}
