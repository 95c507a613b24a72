pub mod output;
pub mod walker;

pub use output::{JsonWriter, OutputWriter, TerminalWriter};
pub use walker::{find_test_files, TestFile, TestFileWalker};

use crate::errors::Result;
use std::fs;
use std::path::Path;

/// Read a source file as text. Invalid UTF-8 sequences are replaced with
/// U+FFFD so one oddly encoded file does not abort the run.
pub fn read_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!(
                "{} is not valid UTF-8; undecodable bytes were replaced",
                path.display()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
