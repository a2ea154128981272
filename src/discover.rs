use anyhow::{bail, Context, Result};
use regex::Regex;

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Matches file names of CSV exports.
pub const DEFAULT_PATTERN: &str = r"(?i)\.csv$";

/// Finds the one input file in `dir` whose name matches `pattern`.
///
/// Only regular files directly inside `dir` are considered. Symbolic links
/// count when they point at a regular file.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read, or if the number of matching
/// files is anything other than one. Several candidates are never resolved
/// by guessing.
pub fn find_input(dir: impl AsRef<Path>, pattern: &Regex) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading directory {}", dir.display()))?;
        if !pattern.is_match(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            // A dangling link is not a candidate.
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e).with_context(|| format!("inspecting {}", path.display())),
        };
        if metadata.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    match candidates.len() {
        0 => bail!(
            "no input file matching {:?} in {}",
            pattern.as_str(),
            dir.display()
        ),
        1 => Ok(candidates.remove(0)),
        n => {
            let names: Vec<_> = candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .collect();
            bail!(
                "found {n} candidate input files in {}: {}",
                dir.display(),
                names.join(", ")
            )
        }
    }
}
