pub mod client;
pub mod error;
pub mod metadata;
pub mod predictions;
mod retry;

pub use client::{build_http_client, MetadataApiConfig, MetadataClient, DEFAULT_API_BASE_URL};
pub use error::FetchError;
pub use metadata::{fetch_metadata_to_file, FetchReport, PostFailure};
pub use predictions::download_predictions;
