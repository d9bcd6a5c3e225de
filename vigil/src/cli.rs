//! Command line interface definition.

use clap::Parser;
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.vigil.toml):
  Create this file in your project root to set defaults.

  [scan]
  exclude = [\"vendor\", \"build\"]   # Folder names to skip
  jobs = 0                         # Worker threads (0 = all cores)
  fail_level = \"low\"               # Lowest severity that fails the scan
  format = \"text\"                  # Default report format
  deadline_ms = 30000              # Wall-clock budget for the whole scan

  [secrets]
  entropy_threshold = 3.5          # Bits/char for the high-entropy rule
  min_length = 16                  # Shortest literal checked for entropy

  # Custom line-pattern rules
  [[rules]]
  id = \"VGL-U001\"
  category = \"hardcoded-secret\"
  message = \"Internal service token\"
  pattern = \"\\\\bsvc_[a-z0-9]{24}\\\\b\"

  # Silence rules for matching files
  [[allow]]
  units = \"fixtures/**\"            # Omit `rules` to silence everything
  rules = [\"VGL-S200\"]
";

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Vigil - Pattern-based detection of secrets and vulnerable code patterns",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Files or directories to scan. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Report format (`text` or `json`).
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Lowest severity that makes the exit code nonzero
    /// (`info`, `low`, `medium`, `high`, `critical`).
    #[arg(long)]
    pub fail_level: Option<String>,

    /// Worker threads. 0 uses all cores; 1 scans sequentially.
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Wall-clock budget for the whole scan, in milliseconds.
    /// The scan reports partial results when the budget runs out.
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Folder names to exclude from the walk.
    #[arg(long, alias = "exclude-folder")]
    pub exclude: Vec<String>,

    /// List every registered rule and exit.
    #[arg(long)]
    pub list_rules: bool,

    /// Verbose diagnostics on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
