use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Loads the application configuration, applying any `.env` file first
/// via `dotenvy`.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value. No
/// variable is required; everything has a default and the metadata API
/// credentials are optional.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Loads configuration from variables already present in the process,
/// skipping the `.env` lookup. Intended for tests and callers that manage
/// the environment themselves.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parsing and defaulting over an injected lookup, so tests drive it with
/// a plain `HashMap` instead of mutating the real environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("BARKIVE_LOG_LEVEL", "info");
    let manifest_path = PathBuf::from(or_default(
        "BARKIVE_MANIFEST_PATH",
        "./config/datasets.yaml",
    ));

    let fetch_timeout_secs = parse_u64("BARKIVE_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("BARKIVE_FETCH_USER_AGENT", "barkive/0.1 (dataset-wrangling)");
    let fetch_max_concurrency = parse_usize("BARKIVE_FETCH_MAX_CONCURRENCY", "4")?;
    let fetch_max_retries = parse_u32("BARKIVE_FETCH_MAX_RETRIES", "3")?;
    let fetch_backoff_base_secs = parse_u64("BARKIVE_FETCH_BACKOFF_BASE_SECS", "5")?;

    let metadata_api_base_url = lookup("BARKIVE_API_BASE_URL").ok();
    let metadata_api_token = lookup("BARKIVE_API_TOKEN").ok();

    Ok(AppConfig {
        log_level,
        manifest_path,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_concurrency,
        fetch_max_retries,
        fetch_backoff_base_secs,
        metadata_api_base_url,
        metadata_api_token,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.manifest_path, PathBuf::from("./config/datasets.yaml"));
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.fetch_user_agent, "barkive/0.1 (dataset-wrangling)");
        assert_eq!(cfg.fetch_max_concurrency, 4);
        assert_eq!(cfg.fetch_max_retries, 3);
        assert_eq!(cfg.fetch_backoff_base_secs, 5);
        assert!(cfg.metadata_api_base_url.is_none());
        assert!(cfg.metadata_api_token.is_none());
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("BARKIVE_LOG_LEVEL", "debug");
        map.insert("BARKIVE_MANIFEST_PATH", "/etc/barkive/datasets.yaml");
        map.insert("BARKIVE_FETCH_TIMEOUT_SECS", "60");
        map.insert("BARKIVE_FETCH_USER_AGENT", "custom-agent/2.0");
        map.insert("BARKIVE_FETCH_MAX_CONCURRENCY", "8");
        map.insert("BARKIVE_FETCH_MAX_RETRIES", "5");
        map.insert("BARKIVE_FETCH_BACKOFF_BASE_SECS", "1");
        map.insert("BARKIVE_API_BASE_URL", "https://api.barkhub.example.com");
        map.insert("BARKIVE_API_TOKEN", "sekrit");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.manifest_path, PathBuf::from("/etc/barkive/datasets.yaml"));
        assert_eq!(cfg.fetch_timeout_secs, 60);
        assert_eq!(cfg.fetch_user_agent, "custom-agent/2.0");
        assert_eq!(cfg.fetch_max_concurrency, 8);
        assert_eq!(cfg.fetch_max_retries, 5);
        assert_eq!(cfg.fetch_backoff_base_secs, 1);
        assert_eq!(
            cfg.metadata_api_base_url.as_deref(),
            Some("https://api.barkhub.example.com")
        );
        assert_eq!(cfg.metadata_api_token.as_deref(), Some("sekrit"));
    }

    #[test]
    fn build_app_config_fails_with_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("BARKIVE_FETCH_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BARKIVE_FETCH_TIMEOUT_SECS"),
            "expected InvalidEnvVar(BARKIVE_FETCH_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_concurrency() {
        let mut map = HashMap::new();
        map.insert("BARKIVE_FETCH_MAX_CONCURRENCY", "many");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BARKIVE_FETCH_MAX_CONCURRENCY"),
            "expected InvalidEnvVar(BARKIVE_FETCH_MAX_CONCURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_retries() {
        let mut map = HashMap::new();
        map.insert("BARKIVE_FETCH_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BARKIVE_FETCH_MAX_RETRIES"),
            "expected InvalidEnvVar(BARKIVE_FETCH_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_api_token() {
        let mut map = HashMap::new();
        map.insert("BARKIVE_API_TOKEN", "super-secret-token");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("[redacted]"));
    }
}
