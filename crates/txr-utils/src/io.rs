use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::TxrIoError;

pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, TxrIoError> {
    fs::read_to_string(path.as_ref()).map_err(|e| TxrIoError {
        source: e,
        path: path.as_ref().to_path_buf(),
    })
}

/// Writes `contents` to a temp file beside `path`, then renames it into
/// place, so a concurrent reader never observes a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), TxrIoError> {
    let wrap = |e: std::io::Error| TxrIoError {
        source: e,
        path: path.to_path_buf(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents).map_err(wrap)?;
    }
    fs::rename(&tmp_path, path).map_err(wrap)
}
