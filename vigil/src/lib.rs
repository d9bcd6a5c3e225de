//! Vigil: pattern-based detection of hardcoded secrets and vulnerable code
//! patterns in source trees.
//!
//! The pipeline is registry -> scanner -> matchers -> aggregator -> report:
//! a [`registry::Registry`] compiles the rule catalog once, the
//! [`engine::Engine`] fans unit scanning out across workers, and the
//! aggregator merges per-unit candidate hits into scored, deduplicated
//! findings. Reports render as stable JSON or styled text.
//!
//! The library is the single implementation behind every front-end; binaries
//! delegate to [`entry_point::run_with_args`].

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod entry_point;
pub mod errors;
pub mod matchers;
pub mod output;
pub mod registry;
pub mod report;
pub mod source;
pub mod utils;
