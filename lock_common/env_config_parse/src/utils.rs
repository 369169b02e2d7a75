use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MAX_SEARCH_DEPTH: usize = 4;

/// Locate a config file by name below the current working directory.
pub fn find_file(file_name: &str) -> Result<PathBuf, String> {
    let current_dir = env::current_dir()
        .map_err(|e| format!("Failed to get current directory: {}", e))?;
    find_file_in(&current_dir, file_name)
}

/// Locate `file_name` below `root`, preferring the shallowest match.
pub fn find_file_in(root: &Path, file_name: &str) -> Result<PathBuf, String> {
    let root = root.canonicalize()
        .map_err(|e| format!("Failed to canonicalize path: {}", e))?;

    let found = WalkDir::new(&root)
        .max_depth(MAX_SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() == Path::new(file_name).as_os_str())
        .min_by_key(|entry| entry.depth());

    match found {
        Some(entry) => entry.path().canonicalize()
            .map_err(|e| format!("Failed to canonicalize file path: {}", e)),
        None => Err(format!("File '{}' not found in {}", file_name, root.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_file_in_prefers_shallowest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("logging.yaml"), "loggers: []").unwrap();
        fs::write(dir.path().join("logging.yaml"), "loggers: []").unwrap();

        let found = find_file_in(dir.path(), "logging.yaml").unwrap();
        assert_eq!(found, dir.path().join("logging.yaml").canonicalize().unwrap());
    }

    #[test]
    fn test_find_file_in_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_file_in(dir.path(), "lock.yaml").unwrap_err();
        assert!(err.contains("lock.yaml"));
    }
}
