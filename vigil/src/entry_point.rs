//! Shared entry point for every binary front-end.

mod paths;
mod run;

pub use run::{run_with_args, run_with_args_to};
