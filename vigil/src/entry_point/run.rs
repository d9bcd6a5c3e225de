use crate::aggregate::ScanReport;
use crate::cli::Cli;
use crate::config::Config;
use crate::engine::{CancelToken, Engine, ScanOptions};
use crate::errors::ScanError;
use crate::registry::{Registry, Severity};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Runs the scanner with the given arguments using stdout as the writer.
///
/// # Errors
///
/// Returns an error only if writing to stdout fails; scan and configuration
/// failures are reported on stderr and mapped to exit code 2.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run Vigil with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["vigil".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(2);
                }
            }
        }
    };

    match execute(&cli, writer) {
        Ok(code) => Ok(code),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            Ok(2)
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn execute<W: std::io::Write>(cli: &Cli, writer: &mut W) -> Result<i32> {
    let scan_paths: Vec<PathBuf> = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    let config = Config::load_from_path(&scan_paths[0])?;

    let registry = Registry::load(config.rule_definitions())?;

    if cli.list_rules {
        crate::output::print_rule_list(writer, &registry)?;
        return Ok(0);
    }

    let fail_level_name = cli
        .fail_level
        .as_deref()
        .or(config.scan.fail_level.as_deref())
        .unwrap_or("info");
    let fail_level = Severity::parse(fail_level_name).ok_or_else(|| {
        ScanError::Config(format!("unknown fail level `{fail_level_name}`"))
    })?;

    let format = cli
        .format
        .as_deref()
        .or(config.scan.format.as_deref())
        .unwrap_or("text")
        .to_owned();
    // Reject unknown formats before any unit is read.
    if format != "text" && format != "json" {
        return Err(ScanError::UnsupportedFormat(format).into());
    }

    let mut exclude = config.scan.exclude.clone();
    exclude.extend(cli.exclude.iter().cloned());

    if cli.verbose {
        eprintln!("[VERBOSE] Vigil v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
        if let Some(path) = &config.config_file_path {
            eprintln!("[VERBOSE] Config: {}", path.display());
        }
    }

    let units = super::paths::collect_units(&scan_paths, &exclude, cli.verbose);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    // Repeated registration (in-process test invocations) is not an error
    // worth surfacing.
    let _ = ctrlc::set_handler(move || handler_token.cancel());

    let progress = Arc::new(crate::output::create_progress_bar(units.len() as u64));
    let tick = Arc::clone(&progress);

    let options = ScanOptions {
        jobs: cli.jobs.or(config.scan.jobs).unwrap_or(0),
        deadline: cli
            .deadline_ms
            .or(config.scan.deadline_ms)
            .map(Duration::from_millis),
        cancel,
        on_unit_scanned: Some(Arc::new(move |_unit| tick.inc(1))),
    };

    let engine = Engine::new(registry).with_allow_rules(config.compiled_allow()?);
    let report = engine.scan(&units, &options);
    progress.finish_and_clear();

    match format.as_str() {
        "json" => writeln!(writer, "{}", crate::report::render(&report, "json")?)?,
        _ => crate::output::write_text_report(writer, &report)?,
    }
    writer.flush()?;

    Ok(exit_code(&report, fail_level))
}

fn exit_code(report: &ScanReport, fail_level: Severity) -> i32 {
    i32::from(report.count_at_or_above(fail_level) > 0)
}
