//! Writes the split to `<data_path>/raw/{train,test}.csv`.
//!
//! Each file is written to a hidden sibling (`.train.csv.tmp`,
//! `.test.csv.tmp`) and renamed into place only after both writes succeeded,
//! so a write failure leaves the previous pair untouched. The previous
//! `train.csv` is moved to `.train.csv.bak` while the renames run and is put
//! back if the `test.csv` rename fails. Only a crash between the two renames
//! can leave a fresh `train.csv` beside a stale `test.csv`.
//!
//! Files are created with `File::create`, so their mode follows the process
//! umask. Existing files are overwritten.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;
use crate::split::SplitResult;

pub const RAW_DIR: &str = "raw";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";

/// Final locations of the written files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPaths {
    pub train: PathBuf,
    pub test: PathBuf,
}

/// Persist `split` under `data_path`.
pub fn persist_split(split: &SplitResult, data_path: &Path) -> IngestResult<PersistedPaths> {
    let raw_dir = data_path.join(RAW_DIR);
    fs::create_dir_all(&raw_dir).map_err(|e| IngestError::io(&raw_dir, e))?;

    let paths = PersistedPaths {
        train: raw_dir.join(TRAIN_FILE),
        test: raw_dir.join(TEST_FILE),
    };
    let train_tmp = sibling(&paths.train, "tmp");
    let test_tmp = sibling(&paths.test, "tmp");

    let written = write_csv_file(&split.train, &train_tmp)
        .and_then(|()| write_csv_file(&split.test, &test_tmp));
    if let Err(e) = written {
        discard(&[train_tmp.as_path(), test_tmp.as_path()]);
        return Err(e);
    }

    commit(&train_tmp, &test_tmp, &paths)?;

    info!(
        path = %raw_dir.display(),
        train = split.train.len(),
        test = split.test.len(),
        "train and test data saved"
    );
    Ok(paths)
}

/// Hidden sibling of `target`: `raw/train.csv` -> `raw/.train.csv.<suffix>`.
fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}", name, suffix))
}

fn write_csv_file(records: &RecordSet, path: &Path) -> IngestResult<()> {
    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    records
        .write_csv(&mut writer)
        .map_err(|e| IngestError::io(path, io::Error::other(e)))?;

    let file = writer
        .into_inner()
        .map_err(|e| IngestError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| IngestError::io(path, e))
}

/// Rename both temp files into place, restoring the previous `train.csv` if
/// the second rename fails.
fn commit(train_tmp: &Path, test_tmp: &Path, paths: &PersistedPaths) -> IngestResult<()> {
    let backup = sibling(&paths.train, "bak");
    let had_train = match fs::rename(&paths.train, &backup) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            discard(&[train_tmp, test_tmp]);
            return Err(IngestError::io(&paths.train, e));
        }
    };

    if let Err(e) = fs::rename(train_tmp, &paths.train) {
        restore_train(had_train, &backup, &paths.train);
        discard(&[train_tmp, test_tmp]);
        return Err(IngestError::io(&paths.train, e));
    }

    if let Err(e) = fs::rename(test_tmp, &paths.test) {
        restore_train(had_train, &backup, &paths.train);
        discard(&[test_tmp]);
        return Err(IngestError::io(&paths.test, e));
    }

    if had_train {
        discard(&[backup.as_path()]);
    }
    Ok(())
}

fn restore_train(had_train: bool, backup: &Path, train: &Path) {
    let restored = if had_train {
        fs::rename(backup, train)
    } else {
        match fs::remove_file(train) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    };
    if let Err(e) = restored {
        warn!(path = %train.display(), error = %e, "could not restore previous train file");
    }
}

fn discard(paths: &[&Path]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split() -> SplitResult {
        let columns = vec!["review".to_string(), "sentiment".to_string()];
        SplitResult {
            train: RecordSet::new(
                columns.clone(),
                vec![
                    vec!["good, really".into(), "1".into()],
                    vec!["bad".into(), "0".into()],
                ],
            )
            .unwrap(),
            test: RecordSet::new(columns, vec![vec!["ok".into(), "1".into()]]).unwrap(),
        }
    }

    #[test]
    fn test_writes_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = persist_split(&split(), dir.path()).unwrap();

        assert_eq!(paths.train, dir.path().join("raw").join("train.csv"));
        assert_eq!(
            fs::read_to_string(&paths.train).unwrap(),
            "review,sentiment\n\"good, really\",1\nbad,0\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.test).unwrap(),
            "review,sentiment\nok,1\n"
        );
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        persist_split(&split(), dir.path()).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path().join("raw"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["test.csv", "train.csv"]);
    }

    #[test]
    fn test_second_run_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        persist_split(&split(), dir.path()).unwrap();

        let mut second = split();
        second.test = second.train.clone();
        let paths = persist_split(&second, dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(&paths.test).unwrap(),
            "review,sentiment\n\"good, really\",1\nbad,0\n"
        );
    }

    #[test]
    fn test_raw_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("raw"), "not a directory").unwrap();

        let err = persist_split(&split(), dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    fn write_previous_pair(dir: &Path) {
        let raw = dir.join("raw");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("train.csv"), "OLD TRAIN").unwrap();
        fs::write(raw.join("test.csv"), "OLD TEST").unwrap();
    }

    fn hidden_entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir.join("raw"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with('.'))
            .collect()
    }

    #[test]
    fn test_write_failure_keeps_previous_pair() {
        let dir = tempfile::tempdir().unwrap();
        write_previous_pair(dir.path());
        // A directory where the test temp file should go makes its creation fail.
        fs::create_dir_all(dir.path().join("raw/.test.csv.tmp/blocker")).unwrap();

        let err = persist_split(&split(), dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));

        let raw = dir.path().join("raw");
        assert_eq!(fs::read_to_string(raw.join("train.csv")).unwrap(), "OLD TRAIN");
        assert_eq!(fs::read_to_string(raw.join("test.csv")).unwrap(), "OLD TEST");
        assert!(!raw.join(".train.csv.tmp").exists());
    }

    #[test]
    fn test_test_rename_failure_restores_previous_train() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(raw.join("test.csv/occupied")).unwrap();
        fs::write(raw.join("train.csv"), "OLD TRAIN").unwrap();

        let err = persist_split(&split(), dir.path()).unwrap_err();
        match err {
            IngestError::Io { path, .. } => assert_eq!(path, raw.join("test.csv")),
            other => panic!("expected Io error, got {:?}", other),
        }

        assert_eq!(fs::read_to_string(raw.join("train.csv")).unwrap(), "OLD TRAIN");
        assert!(hidden_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_test_rename_failure_without_previous_train() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(raw.join("test.csv/occupied")).unwrap();

        persist_split(&split(), dir.path()).unwrap_err();

        assert!(!raw.join("train.csv").exists());
        assert!(hidden_entries(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_output_mode_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;

        let dir = tempfile::tempdir().unwrap();
        let paths = persist_split(&split(), dir.path()).unwrap();
        let reference = dir.path().join("raw/reference.csv");
        fs::write(&reference, "x").unwrap();

        assert_eq!(mode(&paths.train), mode(&reference));
        assert_eq!(mode(&paths.test), mode(&reference));

        // A re-run over existing files keeps the same mode.
        let paths = persist_split(&split(), dir.path()).unwrap();
        assert_eq!(mode(&paths.train), mode(&reference));
    }
}
