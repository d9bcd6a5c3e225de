use crate::engine::UnitInput;
use crate::utils::normalize_display_path;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder names never worth scanning, on top of gitignore rules.
const DEFAULT_EXCLUDE_FOLDERS: [&str; 6] =
    [".git", "node_modules", "target", ".venv", "venv", "__pycache__"];

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        DEFAULT_EXCLUDE_FOLDERS.contains(&name.as_ref())
            || exclude.iter().any(|folder| folder == name.as_ref())
    })
}

/// Walks the requested paths into scan units.
///
/// Directories are walked gitignore-aware; explicit file arguments are taken
/// as-is. Files that cannot be read become [`UnitInput::Unreadable`] rather
/// than aborting the walk. The result is sorted by unit id so the batch
/// handed to the engine is deterministic.
pub(super) fn collect_units(paths: &[PathBuf], exclude: &[String], verbose: bool) -> Vec<UnitInput> {
    let mut files: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        let walker = ignore::WalkBuilder::new(path).hidden(true).build();
        for entry in walker.flatten() {
            let candidate = entry.path();
            if !candidate.is_file() || is_excluded(candidate, exclude) {
                continue;
            }
            files.push(candidate.to_path_buf());
        }
    }

    files.sort();
    files.dedup();

    if verbose {
        eprintln!("[VERBOSE] Collected {} unit(s)", files.len());
    }

    files
        .into_iter()
        .map(|path| {
            let id = normalize_display_path(&path);
            match fs::read(&path) {
                Ok(raw) => UnitInput::Content { id, raw },
                Err(err) => UnitInput::Unreadable {
                    id,
                    reason: err.to_string(),
                },
            }
        })
        .collect()
}
