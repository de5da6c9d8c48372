use serde::{Deserialize, Serialize};

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub api: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// Where the recommendation service lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(alias = "baseurl", default = "default_base_url")]
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_base_url() -> String {
    "http://movieplanner-api:8000".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Reads the config file if one was given, then applies the process
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `API_BASE_URL` wins over the config file. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.listen.tlscert, &self.listen.tlskey) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.listen.port, "3000");
        assert!(config.listen.address.is_none());
        assert!(config.appdir.is_none());
        assert_eq!(config.api.base_url, "http://movieplanner-api:8000");
        assert!(config.tls_paths().is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "8080"
  tlscert: /etc/ssl/cert.pem
  tlskey: /etc/ssl/key.pem
appdir: /srv/moodflix/web
api:
  base_url: http://localhost:8000
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.appdir.as_deref(), Some("/srv/moodflix/web"));
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(
            config.tls_paths(),
            Some(("/etc/ssl/cert.pem", "/etc/ssl/key.pem"))
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_yaml("api:\n  base_url: http://localhost:8000\n").unwrap();
        config.apply_env(|key| {
            (key == API_BASE_URL_ENV).then(|| "http://recs.internal:9000".to_string())
        });
        assert_eq!(config.api.base_url, "http://recs.internal:9000");
    }

    #[test]
    fn test_empty_env_is_unset() {
        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.api.base_url, "http://movieplanner-api:8000");

        config.apply_env(|_| None);
        assert_eq!(config.api.base_url, "http://movieplanner-api:8000");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/moodflix.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(..)));
    }

    #[test]
    fn test_malformed_file() {
        let path = std::env::temp_dir().join(format!("moodflix-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "listen: [port: 3000\n").unwrap();

        let err = Config::from_file(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
        assert!(err.to_string().starts_with("Failed to parse config file"));

        std::fs::remove_file(&path).ok();
    }
}
