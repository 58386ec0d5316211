//! Partitioned result store with atomic commit
//!
//! Layout: `<root>/{year:04}/{month:02}/{run_id}.json`, partition derived
//! from the record's submission timestamp. The storage key is `run_id`
//! alone: before every write the full index is rebuilt and every older file
//! for the same run_id is removed, whichever partition holds it.
//!
//! Writes go to a dot-prefixed temp file in the target partition, are
//! fsynced, and become visible only through the final rename. A reader can
//! observe the old record or the new record, never a torn one.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Datelike};
use serde::Serialize;

use crate::record::{ResultDocument, StorageStatus};

use super::errors::{StoreError, StoreResult};
use super::index::RunIndex;

/// Outcome of one `put`.
#[derive(Debug, Clone, Serialize)]
pub struct StorageOutcome {
    pub status: StorageStatus,
    pub path: PathBuf,
}

/// One record yielded by iteration.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub path: PathBuf,
    pub document: ResultDocument,
}

/// The keyed, partitioned store of validated result documents.
pub struct ResultStore {
    root: PathBuf,
    /// Serializes locate-then-write so two writers for the same run_id
    /// cannot both believe they are first.
    write_lock: Mutex<()>,
}

impl ResultStore {
    /// Opens (creating if needed) a store rooted at the given directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to create store root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derives the (year, month) partition from an ISO-8601 timestamp.
    pub fn partition_for(timestamp: &str) -> StoreResult<(i32, u32)> {
        let parsed = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|e| StoreError::bad_timestamp(timestamp, e.to_string()))?;
        Ok((parsed.year(), parsed.month()))
    }

    /// Writes a document under its identity key.
    ///
    /// Every existing file for the same run_id is removed first, across all
    /// partitions; the new content becomes the sole record. Returns
    /// `duplicate_replaced` when anything was removed, `stored` otherwise.
    ///
    /// # Errors
    ///
    /// `BENCH_STORE_WRITE_FAILED` on any I/O failure. No retry is attempted.
    pub fn put(&self, document: &ResultDocument) -> StoreResult<StorageOutcome> {
        let run_id = document.run_id().to_string();
        let (year, month) = Self::partition_for(document.submitted_timestamp())?;

        let guard = self.write_lock.lock();
        let _guard = match guard {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let index = RunIndex::scan(&self.root)?;
        let mut replaced = false;
        for old_path in index.locate(&run_id) {
            fs::remove_file(old_path).map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to remove superseded record: {}", old_path.display()),
                    e,
                )
            })?;
            replaced = true;
        }

        let partition = self
            .root
            .join(format!("{:04}", year))
            .join(format!("{:02}", month));
        fs::create_dir_all(&partition).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to create partition: {}", partition.display()),
                e,
            )
        })?;

        let status = if replaced {
            StorageStatus::DuplicateReplaced
        } else {
            StorageStatus::Stored
        };

        // The committed file records its actual storage outcome
        let mut to_write = document.clone();
        if let Some(processing) = to_write.result_data.processing.as_mut() {
            processing.storage_status = status;
        }

        let path = partition.join(format!("{}.json", run_id));
        let body = serde_json::to_string_pretty(&to_write).map_err(|e| {
            StoreError::write_failed_no_source(format!(
                "Failed to serialize record '{}': {}",
                run_id, e
            ))
        })?;
        write_atomic(&path, body.as_bytes())?;

        Ok(StorageOutcome { status, path })
    }

    /// Looks up the record for a run_id, if one is stored.
    pub fn get(&self, run_id: &str) -> StoreResult<Option<ResultDocument>> {
        let index = RunIndex::scan(&self.root)?;
        match index.locate(run_id).first() {
            Some(path) => read_record(path).map(|record| Some(record.document)),
            None => Ok(None),
        }
    }

    /// Iterates all committed records in deterministic (path) order.
    ///
    /// Each file is read lazily; an unreadable or malformed file surfaces as
    /// an `Err` item so the caller can skip it and continue. Calling `iter`
    /// again restarts from a fresh scan.
    pub fn iter(&self) -> StoreResult<RecordIter> {
        let index = RunIndex::scan(&self.root)?;
        Ok(RecordIter {
            paths: index.all_paths().into_iter(),
        })
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(RunIndex::scan(&self.root)?.len())
    }

    /// Returns whether the store holds no records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(RunIndex::scan(&self.root)?.is_empty())
    }
}

/// Lazy, finite, restartable iterator over stored records.
pub struct RecordIter {
    paths: std::vec::IntoIter<PathBuf>,
}

impl Iterator for RecordIter {
    type Item = StoreResult<StoredRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| read_record(&path))
    }
}

fn read_record(path: &Path) -> StoreResult<StoredRecord> {
    let content = fs::read_to_string(path).map_err(|e| {
        StoreError::read_failed(format!("Failed to read record: {}", path.display()), e)
    })?;
    let document: ResultDocument = serde_json::from_str(&content).map_err(|e| {
        StoreError::read_failed_no_source(format!(
            "Malformed record {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(StoredRecord {
        path: path.to_path_buf(),
        document,
    })
}

/// Writes bytes to `path` via a dot-prefixed temp file in the same
/// directory, fsyncing before the rename commits the content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = path.parent().ok_or_else(|| {
        StoreError::write_failed_no_source(format!("No parent directory for: {}", path.display()))
    })?;
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        StoreError::write_failed_no_source(format!("Invalid file name: {}", path.display()))
    })?;
    let tmp_path = parent.join(format!(".{}.tmp", file_name));

    let mut file = File::create(&tmp_path).map_err(|e| {
        StoreError::write_failed(
            format!("Failed to create temp file: {}", tmp_path.display()),
            e,
        )
    })?;
    file.write_all(bytes).map_err(|e| {
        StoreError::write_failed(format!("Failed to write: {}", tmp_path.display()), e)
    })?;
    file.sync_all().map_err(|e| {
        StoreError::write_failed(format!("fsync failed: {}", tmp_path.display()), e)
    })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        StoreError::write_failed(
            format!(
                "Failed to commit {} into place as {}",
                tmp_path.display(),
                path.display()
            ),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_document(run_id: &str, submitted: &str) -> ResultDocument {
        serde_json::from_value(json!({
            "schema_version": "3.0",
            "result_data": {
                "run_identity": {
                    "tool_name": "forge",
                    "tool_version": "1.2.0",
                    "run_id": run_id,
                    "run_number": 1,
                    "target_model": "A",
                    "api_style": "REST",
                    "spec_reference": "spec-v1",
                    "workspace_path": "/tmp/ws",
                    "run_environment": "ci"
                },
                "implementations": {
                    "api": {
                        "generation_metrics": {
                            "llm_model": "model-x",
                            "start_timestamp": "2025-01-15T10:00:00Z",
                            "end_timestamp": "2025-01-15T10:42:00Z",
                            "duration_minutes": 42.0,
                            "clarifications_count": 0,
                            "interventions_count": 0,
                            "reruns_count": 0
                        },
                        "acceptance": {
                            "pass_count": 9,
                            "fail_count": 1,
                            "not_run_count": 0,
                            "passrate": 0.9
                        },
                        "artifacts": {
                            "contract_artifact_path": "artifacts/contract.yaml",
                            "run_instructions_path": "artifacts/RUN.md"
                        }
                    }
                },
                "submission": {
                    "submitted_timestamp": submitted,
                    "submitted_by": "alice",
                    "submission_method": "automated"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_partition_layout() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        let outcome = store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();

        assert_eq!(outcome.status, StorageStatus::Stored);
        assert_eq!(outcome.path, tmp.path().join("2025").join("01").join("run-a.json"));
        assert!(outcome.path.exists());
    }

    #[test]
    fn test_partition_month_zero_padded() {
        assert_eq!(
            ResultStore::partition_for("2025-03-05T00:00:00Z").unwrap(),
            (2025, 3)
        );
        assert_eq!(
            ResultStore::partition_for("2024-12-31T23:59:59.999Z").unwrap(),
            (2024, 12)
        );
        assert!(ResultStore::partition_for("not-a-timestamp").is_err());
    }

    #[test]
    fn test_resubmission_same_partition_replaced() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();
        let outcome = store
            .put(&sample_document("run-a", "2025-01-20T11:00:00Z"))
            .unwrap();

        assert_eq!(outcome.status, StorageStatus::DuplicateReplaced);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_resubmission_across_month_boundary_replaced() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();
        let outcome = store
            .put(&sample_document("run-a", "2025-02-02T09:00:00Z"))
            .unwrap();

        assert_eq!(outcome.status, StorageStatus::DuplicateReplaced);
        assert_eq!(outcome.path, tmp.path().join("2025").join("02").join("run-a.json"));
        // The January file is gone; exactly one record remains
        assert!(!tmp.path().join("2025").join("01").join("run-a.json").exists());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_get_returns_latest_content() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        let mut first = sample_document("run-a", "2025-01-15T11:00:00Z");
        first
            .result_data
            .implementations
            .api
            .as_mut()
            .unwrap()
            .acceptance
            .passrate = Some(0.9);
        store.put(&first).unwrap();

        let mut second = sample_document("run-a", "2025-02-01T11:00:00Z");
        second
            .result_data
            .implementations
            .api
            .as_mut()
            .unwrap()
            .acceptance
            .passrate = Some(0.5);
        store.put(&second).unwrap();

        let stored = store.get("run-a").unwrap().unwrap();
        let acceptance = &stored.result_data.implementations.api.unwrap().acceptance;
        assert_eq!(acceptance.passrate, Some(0.5));

        assert!(store.get("run-missing").unwrap().is_none());
    }

    #[test]
    fn test_iter_is_deterministic_and_restartable() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        store
            .put(&sample_document("run-b", "2025-02-15T11:00:00Z"))
            .unwrap();
        store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();
        store
            .put(&sample_document("run-c", "2024-12-15T11:00:00Z"))
            .unwrap();

        let first: Vec<String> = store
            .iter()
            .unwrap()
            .map(|r| r.unwrap().document.run_id().to_string())
            .collect();
        let second: Vec<String> = store
            .iter()
            .unwrap()
            .map(|r| r.unwrap().document.run_id().to_string())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec!["run-c", "run-a", "run-b"]);
    }

    #[test]
    fn test_iter_surfaces_corrupt_file_as_err_item() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();
        fs::write(tmp.path().join("2025/01/run-bad.json"), b"{ torn").unwrap();

        let items: Vec<_> = store.iter().unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items.iter().filter(|i| i.is_ok()).count(), 1);
        assert_eq!(items.iter().filter(|i| i.is_err()).count(), 1);
    }

    #[test]
    fn test_temp_files_invisible_to_readers() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::open(tmp.path()).unwrap();

        store
            .put(&sample_document("run-a", "2025-01-15T11:00:00Z"))
            .unwrap();
        // Simulate a writer that died mid-write
        fs::write(tmp.path().join("2025/01/.run-b.json.tmp"), b"{ partial").unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let items: Vec<_> = store.iter().unwrap().collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_ok());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.json");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        // No temp file left behind
        assert!(!tmp.path().join(".out.json.tmp").exists());
    }
}
