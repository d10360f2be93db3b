use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Finds route manifests under a path.
///
/// A file path is taken as the single manifest. A directory is walked
/// recursively, skipping `target` and hidden directories (those starting with
/// `.`), and every `.yaml`, `.yml` or `.json` file is collected.
///
/// # Example
///
/// ```no_run
/// use rest_swagger::scanner::ManifestScanner;
/// use std::path::PathBuf;
///
/// let scanner = ManifestScanner::new(PathBuf::from("./routes"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} manifests", result.manifests.len());
/// ```
pub struct ManifestScanner {
    root_path: PathBuf,
}

/// Result of a scan.
pub struct ScanResult {
    /// Manifest paths, sorted
    pub manifests: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl ManifestScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Collects manifest files.
    ///
    /// Inaccessible entries are recorded as warnings and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        let metadata = std::fs::metadata(&self.root_path)
            .with_context(|| format!("Failed to access path: {}", self.root_path.display()))?;

        if metadata.is_file() {
            debug!("Using single manifest: {}", self.root_path.display());
            return Ok(ScanResult {
                manifests: vec![self.root_path.clone()],
                warnings: Vec::new(),
            });
        }

        let mut manifests = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_manifest = path
                        .extension()
                        .and_then(|s| s.to_str())
                        .map_or(false, |ext| MANIFEST_EXTENSIONS.contains(&ext));

                    if path.is_file() && is_manifest {
                        manifests.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        manifests.sort();
        debug!("Found {} manifests under {}", manifests.len(), self.root_path.display());

        Ok(ScanResult {
            manifests,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_collects_manifest_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("a.yaml"), "views: {}").unwrap();
        fs::write(root.join("b.yml"), "views: {}").unwrap();
        fs::write(root.join("c.json"), "{}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let result = ManifestScanner::new(root.to_path_buf()).scan().unwrap();

        let names: Vec<String> = result
            .manifests
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "c.json"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("routes.yaml");
        fs::write(&file, "views: {}").unwrap();

        let result = ManifestScanner::new(file.clone()).scan().unwrap();

        assert_eq!(result.manifests, vec![file]);
    }

    #[test]
    fn test_scan_nested_and_skipped_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("api/v1")).unwrap();
        fs::create_dir(root.join("target")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("api/v1/widgets.yaml"), "views: {}").unwrap();
        fs::write(root.join("target/stale.yaml"), "views: {}").unwrap();
        fs::write(root.join(".git/config.json"), "{}").unwrap();

        let result = ManifestScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.manifests.len(), 1);
        assert!(result.manifests[0].ends_with("api/v1/widgets.yaml"));
    }

    #[test]
    fn test_scan_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(ManifestScanner::new(missing).scan().is_err());
    }
}
