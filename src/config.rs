use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const BACKEND_URL_ENV: &str = "LABMENTIX_BACKEND_URL";
const DEFAULT_BACKEND_URL: &str = "http://localhost:5003";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub password_min_len: usize,
    pub name_min_len: usize,
    /// Unset means requests never time out.
    pub request_timeout_secs: Option<u64>,
    /// Rows kept in the local chat history cache.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            password_min_len: 8,
            name_min_len: 2,
            request_timeout_secs: None,
            history_limit: 200,
        }
    }
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "labmentix", "LabmentixGTK")
}

impl Config {
    fn toml_path() -> Option<PathBuf> {
        Some(project_dirs()?.config_dir().join("labmentix.toml"))
    }

    /// Reads the config file, falling back to defaults when it is missing or
    /// malformed, then applies the environment override.
    pub fn load() -> Self {
        let mut config = match Self::toml_path().map(fs::read_to_string) {
            Some(Ok(text)) => Self::from_toml_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring malformed config: {e}");
                Self::default()
            }),
            Some(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = Self::default();
                if let Err(e) = defaults.save() {
                    log::debug!("could not write default config: {e}");
                }
                defaults
            }
            _ => Self::default(),
        };
        config.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
        config
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply_backend_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            log::info!("backend URL overridden by {BACKEND_URL_ENV}");
            self.backend_url = url;
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::toml_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let toml = toml::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            fs::write(path, toml)
        } else {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No config dir"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_toml_str("password_min_len = 12\n").unwrap();
        assert_eq!(cfg.password_min_len, 12);
        assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn timeout_is_optional() {
        let cfg = Config::from_toml_str("request_timeout_secs = 30").unwrap();
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_override_ignores_blank() {
        let mut cfg = Config::default();
        cfg.apply_backend_override(Some("   ".into()));
        assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
        cfg.apply_backend_override(Some("https://api.labmentix.io".into()));
        assert_eq!(cfg.backend_url, "https://api.labmentix.io");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml_str("history_limit = \"lots\"").is_err());
    }
}
