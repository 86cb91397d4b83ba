use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::TopKError;

/// Open a dataset file for sequential reading.
///
/// A missing path is reported as [TopKError::SourceNotFound], any other failure to open it,
/// including a directory in place of a file, as [TopKError::SourceUnreadable].
pub fn open_source(path: &Path) -> Result<File, TopKError> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TopKError::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(TopKError::SourceUnreadable { path: path.to_path_buf(), source: e });
        }
    };

    if metadata.is_dir() {
        return Err(TopKError::SourceUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::Other, "is a directory"),
        });
    }

    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TopKError::SourceNotFound(path.to_path_buf()),
        _ => TopKError::SourceUnreadable { path: path.to_path_buf(), source: e },
    })
}
