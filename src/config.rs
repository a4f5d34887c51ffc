use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the recommendation backend (`PBM_API_URL`).
    pub api_url: String,
    /// Per-request timeout (`PBM_API_TIMEOUT_SECS`).
    pub timeout_secs: u64,
    /// Dataset file loaded at startup instead of the mock data (`PBM_DATASET`).
    pub dataset: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dataset: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank or invalid values fall back to the
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = value("PBM_API_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_url = url.trim_end_matches('/').to_string();
            } else {
                log::warn!("PBM_API_URL={url:?} is not an http(s) URL, using {DEFAULT_API_URL}");
            }
        }

        if let Some(raw) = value("PBM_API_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => log::warn!(
                    "PBM_API_TIMEOUT_SECS={raw:?} is not a positive integer, using {DEFAULT_TIMEOUT_SECS}"
                ),
            }
        }

        config.dataset = value("PBM_DATASET").map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PBM_API_URL", "https://pbm.example.org/"),
            ("PBM_API_TIMEOUT_SECS", "5"),
            ("PBM_DATASET", "data/drugs.csv"),
        ]));
        assert_eq!(config.api_url, "https://pbm.example.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.dataset, Some(PathBuf::from("data/drugs.csv")));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PBM_API_URL", "localhost:5000"),
            ("PBM_API_TIMEOUT_SECS", "0"),
            ("PBM_DATASET", "   "),
        ]));
        assert_eq!(config, AppConfig::default());
    }
}
