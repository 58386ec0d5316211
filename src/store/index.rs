//! Global run_id index
//!
//! Deduplication is keyed by `run_id` alone, independent of which year/month
//! partition a record was originally filed under. The index is rebuilt by
//! scanning every partition before a write, so a resubmission that crosses a
//! month boundary still finds its predecessor.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};

/// Index of run_id to every file currently holding that run_id.
///
/// A healthy store has exactly one path per run_id; the vector form lets a
/// write repair any duplicates left behind by earlier crashes.
pub struct RunIndex {
    entries: HashMap<String, Vec<PathBuf>>,
}

impl RunIndex {
    /// Scans the partition hierarchy under `root`.
    ///
    /// Only `{4-digit}/{2-digit}/{run_id}.json` files are indexed. Dotfiles
    /// (in-flight temp files) and foreign files are ignored.
    pub fn scan(root: &Path) -> StoreResult<Self> {
        let mut entries: HashMap<String, Vec<PathBuf>> = HashMap::new();

        if !root.exists() {
            return Ok(Self { entries });
        }

        for year_dir in read_dir_sorted(root)? {
            if !is_partition_dir(&year_dir, 4) {
                continue;
            }
            for month_dir in read_dir_sorted(&year_dir)? {
                if !is_partition_dir(&month_dir, 2) {
                    continue;
                }
                for file in read_dir_sorted(&month_dir)? {
                    if let Some(run_id) = record_run_id(&file) {
                        entries.entry(run_id).or_default().push(file);
                    }
                }
            }
        }

        Ok(Self { entries })
    }

    /// Returns every path currently holding the given run_id.
    pub fn locate(&self, run_id: &str) -> &[PathBuf] {
        self.entries
            .get(run_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of distinct run_ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every indexed record path in deterministic order.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .entries
            .values()
            .flat_map(|paths| paths.iter().cloned())
            .collect();
        paths.sort();
        paths
    }
}

/// Reads a directory and returns its entries sorted by path, so every scan
/// of an unchanged store visits files in the same order.
fn read_dir_sorted(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        StoreError::read_failed(format!("Failed to read directory: {}", dir.display()), e)
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            StoreError::read_failed(
                format!("Failed to read directory entry in: {}", dir.display()),
                e,
            )
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// A partition directory has an all-digit name of the expected width.
fn is_partition_dir(path: &Path, width: usize) -> bool {
    if !path.is_dir() {
        return false;
    }
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.len() == width && name.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Extracts the run_id from a committed record path, or `None` for temp
/// files, directories, and non-JSON files.
fn record_run_id(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') {
        return None;
    }
    let run_id = name.strip_suffix(".json")?;
    if run_id.is_empty() {
        return None;
    }
    Some(run_id.to_string())
}
