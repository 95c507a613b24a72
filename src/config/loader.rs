use std::fs;
use std::path::{Path, PathBuf};

use super::TestalignConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".testalign.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a config from TOML source
pub fn parse_config(contents: &str) -> std::result::Result<TestalignConfig, String> {
    toml::from_str::<TestalignConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested config file. Unlike discovery, a missing
/// file is an error here.
pub fn load_config_from(path: &Path) -> Result<TestalignConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::config(path, e.to_string()))?;
    let config = parse_config(&contents).map_err(|message| Error::config(path, message))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Generate a directory and its ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.testalign.toml`.
///
/// A file that exists but fails to parse is an error, not a fallback to
/// defaults.
pub fn load_config(start: &Path) -> Result<TestalignConfig> {
    let found = directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    match found {
        Some(path) => load_config_from(&path),
        None => {
            log::debug!(
                "No {} found after checking {} directories. Using default config.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            Ok(TestalignConfig::default())
        }
    }
}
