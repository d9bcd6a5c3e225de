use std::fs;
use std::path::Path;

use super::models::Config;
use crate::errors::ScanError;

const CONFIG_FILENAMES: [&str; 2] = [".vigil.toml", "vigil.toml"];

/// Walks up from `path` looking for a configuration file.
///
/// Absence of a file falls back to defaults, but a file that exists and
/// cannot be read or parsed is a fatal error: silently ignoring it would
/// drop the user's custom rules and allow-lists without a diagnostic.
pub(super) fn load_from_path(path: &Path) -> Result<Config, ScanError> {
    let mut current = path.to_path_buf();
    if current.is_file() {
        current.pop();
    }

    loop {
        for filename in CONFIG_FILENAMES {
            let candidate = current.join(filename);
            if !candidate.exists() {
                continue;
            }
            let content = fs::read_to_string(&candidate).map_err(|err| {
                ScanError::Config(format!("cannot read `{}`: {err}", candidate.display()))
            })?;
            let mut config = toml::from_str::<Config>(&content).map_err(|err| {
                ScanError::Config(format!("cannot parse `{}`: {err}", candidate.display()))
            })?;
            config.config_file_path = Some(candidate);
            return Ok(config);
        }

        if !current.pop() {
            break;
        }
    }

    Ok(Config::default())
}
