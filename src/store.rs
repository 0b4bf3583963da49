use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::{Dataset, NameDay};

const SOURCE_SUFFIX: &str = "_namedays.json";
const MERGED_FILE: &str = "merged_namedays.json";

pub fn load(path: &Path) -> Result<Dataset> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_slice(&raw).with_context(|| format!("Failed to decode {:?}", path))
}

/// Serialize fully, then write through a temp file so a failed run never
/// leaves a truncated artifact behind.
pub fn save(path: &Path, data: &[NameDay]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let json = serde_json::to_vec(data).context("Failed to encode namedays")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {:?} into place", tmp))?;

    debug!(path = %path.display(), bytes = json.len(), "Saved");
    Ok(())
}

/// Per-source files in `dir`, sorted, excluding a previous merge result.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(SOURCE_SUFFIX) && name != MERGED_FILE && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ── Tests ──
