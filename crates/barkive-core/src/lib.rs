pub mod app_config;
pub mod config;
pub mod manifest;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use manifest::{load_manifest, DatasetManifest};
pub use records::{
    ArchiveRecord, LabelGuess, MergedRecord, MetadataRecord, PredictionRecord, SourceClient,
    ARCHIVE_COLUMNS, METADATA_COLUMNS, PREDICTION_COLUMNS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read manifest file {path}: {source}")]
    ManifestIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest file: {0}")]
    ManifestParse(#[from] serde_yaml::Error),

    #[error("manifest validation failed: {0}")]
    Validation(String),
}
