// CutoffScout - app/loader.rs
//
// Loads the two startup inputs: the cutoff dataset and the branch-code
// lookup. Both are JSON arrays read once and treated as immutable.

use crate::core::catalog::BranchCatalog;
use crate::core::model::{BranchOption, Record};
use crate::platform::fs::read_bounded;
use crate::util::constants;
use crate::util::error::LoadError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a JSON array from `path`, rejecting files with no content at all.
fn read_json_array<T: DeserializeOwned>(path: &Path, max_size: u64) -> Result<Vec<T>, LoadError> {
    let bytes = read_bounded(path, max_size)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the dataset: a JSON array of record objects.
pub fn load_dataset(path: &Path) -> Result<Vec<Record>, LoadError> {
    let records: Vec<Record> = read_json_array(path, constants::MAX_DATASET_FILE_SIZE)?;

    if records.len() > constants::MAX_RECORDS {
        return Err(LoadError::TooManyRecords {
            path: path.to_path_buf(),
            count: records.len(),
            max: constants::MAX_RECORDS,
        });
    }

    tracing::info!(path = %path.display(), records = records.len(), "Loaded dataset");
    Ok(records)
}

/// Load the branch lookup: a JSON array of `{ "value", "label" }` objects.
pub fn load_branch_catalog(path: &Path) -> Result<BranchCatalog, LoadError> {
    let options: Vec<BranchOption> = read_json_array(path, constants::MAX_LOOKUP_FILE_SIZE)?;

    tracing::info!(path = %path.display(), options = options.len(), "Loaded branch lookup");
    Ok(BranchCatalog::new(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Cell;
    use std::fs;

    #[test]
    fn test_load_dataset_keeps_order_and_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colleges.json");
        fs::write(
            &path,
            r#"[
                {"coc": 1, "con": "First", "brc": "CS", "brn": "CSE", "OC": 199},
                {"coc": "2", "con": "Second", "brc": "ME", "brn": "Mech", "BC": null}
            ]"#,
        )
        .unwrap();

        let records = load_dataset(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].college_code, Cell::Number(1.0));
        assert_eq!(records[1].college_code, Cell::Text("2".to_string()));
        assert_eq!(records[1].oc, Cell::Null);
    }

    #[test]
    fn test_load_dataset_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colleges.json");
        fs::write(&path, r#"{"coc": 1}"#).unwrap();
        assert!(matches!(load_dataset(&path), Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colleges.json");
        fs::write(&path, "  \n").unwrap();
        assert!(matches!(load_dataset(&path), Err(LoadError::Empty { .. })));
        assert!(matches!(load_branch_catalog(&path), Err(LoadError::Empty { .. })));

        fs::write(&path, "[]").unwrap();
        assert!(load_dataset(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_branch_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branchCodes.json");
        fs::write(
            &path,
            r#"[{"value": "CS", "label": "CS - Computer Science"},
                {"value": "ME", "label": "ME - Mechanical"}]"#,
        )
        .unwrap();
        let catalog = load_branch_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.options()[1].value, "ME");
    }
}
