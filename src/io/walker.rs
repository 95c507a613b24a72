use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A test file discovered in the e2e directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    /// File name relative to the tests directory
    pub name: String,
    pub path: PathBuf,
}

impl TestFile {
    pub fn read(&self) -> Result<String> {
        super::read_file(&self.path)
    }
}

pub struct TestFileWalker {
    root: PathBuf,
    suffix: String,
}

impl TestFileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            suffix: ".spec.ts".to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Lists matching files directly inside the tests directory, sorted by
    /// name. Subdirectories are not descended into.
    pub fn walk(&self) -> Result<Vec<TestFile>> {
        if !self.root.is_dir() {
            return Err(Error::MissingTestsDir {
                path: self.root.clone(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.should_process(&name) {
                files.push(TestFile {
                    name,
                    path: entry.path().to_path_buf(),
                });
            }
        }

        log::debug!(
            "Found {} test files matching '*{}' in {}",
            files.len(),
            self.suffix,
            self.root.display()
        );
        Ok(files)
    }

    fn should_process(&self, name: &str) -> bool {
        name.ends_with(&self.suffix)
    }
}

pub fn find_test_files(tests_dir: &Path, suffix: &str) -> Result<Vec<TestFile>> {
    TestFileWalker::new(tests_dir.to_path_buf())
        .with_suffix(suffix)
        .walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_filters_by_suffix_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("navigation.spec.ts"), "").unwrap();
        fs::write(dir.path().join("homepage.spec.ts"), "").unwrap();
        fs::write(dir.path().join("helpers.ts"), "").unwrap();
        fs::create_dir(dir.path().join("nested.spec.ts")).unwrap();

        let files = find_test_files(dir.path(), ".spec.ts").unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["homepage.spec.ts", "navigation.spec.ts"]);
    }

    #[test]
    fn test_walk_does_not_descend() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.spec.ts"), "").unwrap();

        let files = find_test_files(dir.path(), ".spec.ts").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("tests/e2e");
        let err = find_test_files(&missing, ".spec.ts").unwrap_err();
        assert!(matches!(err, Error::MissingTestsDir { .. }));
    }
}
