use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Locations of the three raw datasets and the derived artifacts, as
/// declared in `config/datasets.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetManifest {
    /// Primary post archive (comma-delimited).
    pub archive_path: PathBuf,
    /// Where `fetch predictions` downloads the classifier export from.
    pub predictions_url: String,
    /// Image predictions table (tab-delimited), downloaded or pre-staged.
    pub predictions_path: PathBuf,
    /// Per-post metadata (NDJSON), fetched or pre-staged.
    pub metadata_path: PathBuf,
    /// Merged master table written by `wrangle`.
    pub master_path: PathBuf,
    /// Directory for reporter CSV artifacts.
    pub reports_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    datasets: DatasetManifest,
}

/// Reads the dataset manifest from a YAML file and validates it.
///
/// # Errors
///
/// Returns `ConfigError` on an unreadable or unparseable file, or when
/// validation rejects the declared paths.
pub fn load_manifest(path: &Path) -> Result<DatasetManifest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ManifestIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ManifestFile = serde_yaml::from_str(&content)?;

    validate_manifest(&file.datasets)?;

    Ok(file.datasets)
}

fn validate_manifest(manifest: &DatasetManifest) -> Result<(), ConfigError> {
    let named = [
        ("archive_path", &manifest.archive_path),
        ("predictions_path", &manifest.predictions_path),
        ("metadata_path", &manifest.metadata_path),
        ("master_path", &manifest.master_path),
        ("reports_dir", &manifest.reports_dir),
    ];

    for (name, path) in named {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{name} must be non-empty"
            )));
        }
    }

    if !manifest.predictions_url.starts_with("http://")
        && !manifest.predictions_url.starts_with("https://")
    {
        return Err(ConfigError::Validation(format!(
            "predictions_url must be an http(s) URL, got '{}'",
            manifest.predictions_url
        )));
    }

    // The master table is derived output; writing it over an input would
    // destroy a source on the next run.
    for (name, path) in [
        ("archive_path", &manifest.archive_path),
        ("predictions_path", &manifest.predictions_path),
        ("metadata_path", &manifest.metadata_path),
    ] {
        if path == &manifest.master_path {
            return Err(ConfigError::Validation(format!(
                "master_path must be distinct from {name} ('{}')",
                path.display()
            )));
        }
    }

    Ok(())
}
