// CutoffScout - platform/fs.rs
//
// Size-bounded file reads for the input loader.

use crate::util::error::LoadError;
use std::path::Path;

/// Read a whole file, refusing anything larger than `max_size` bytes.
///
/// The size is checked from metadata before reading so an oversized file is
/// never pulled into memory.
pub fn read_bounded(path: &Path, max_size: u64) -> Result<Vec<u8>, LoadError> {
    let io_err = |e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_size {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read input file");
    Ok(bytes)
}
