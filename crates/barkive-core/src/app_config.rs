use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub manifest_path: PathBuf,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_concurrency: usize,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_secs: u64,
    pub metadata_api_base_url: Option<String>,
    pub metadata_api_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("manifest_path", &self.manifest_path)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("fetch_max_concurrency", &self.fetch_max_concurrency)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_backoff_base_secs", &self.fetch_backoff_base_secs)
            .field("metadata_api_base_url", &self.metadata_api_base_url)
            .field(
                "metadata_api_token",
                &self.metadata_api_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
