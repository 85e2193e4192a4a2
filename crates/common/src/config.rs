use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{config_error, Result};

/// Default time zone attached to created calendar events
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Default minimum amount of page content before an ad slot may render
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub google: GoogleConfig,
    pub site: SiteConfig,
    pub calendar: CalendarConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Google OAuth client registration and endpoint overrides.
///
/// Credentials are deliberately optional: a missing value surfaces as a
/// failure of the request that needs it, not at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Overrides the consent page endpoint
    pub auth_url: Option<String>,
    /// Overrides the token exchange endpoint
    pub token_url: Option<String>,
    /// Overrides the Calendar v3 API base URL
    pub calendar_api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL of the site the OAuth callback redirects back to
    pub public_url: Option<String>,
}

impl SiteConfig {
    /// The application start page that receives `auth_success`/`auth_error`
    pub fn start_page(&self) -> String {
        match self.public_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => format!("{}/start", url.trim_end_matches('/')),
            None => "/start".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA time zone written onto created events
    pub time_zone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

/// Settings for the client-side companion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the bridge server
    pub api_url: String,
    /// Where the local stores live; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
    pub min_content_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_string(),
            storage_dir: None,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
        }
    }
}

impl Config {
    /// Loads defaults, then the optional TOML file, then the environment.
    ///
    /// A `.env` file in the working directory is honoured when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML config file; omitted sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("GOOGLE_CLIENT_ID") {
            self.google.client_id = Some(v);
        }
        if let Some(v) = get("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = Some(v);
        }
        if let Some(v) = get("GOOGLE_REDIRECT_URI") {
            self.google.redirect_uri = Some(v);
        }
        if let Some(v) = get("GOOGLE_AUTH_URL") {
            self.google.auth_url = Some(v);
        }
        if let Some(v) = get("GOOGLE_TOKEN_URL") {
            self.google.token_url = Some(v);
        }
        if let Some(v) = get("GOOGLE_CALENDAR_API_BASE") {
            self.google.calendar_api_base = Some(v);
        }
        if let Some(v) = get("PUBLIC_SITE_URL") {
            self.site.public_url = Some(v);
        }
        if let Some(v) = get("GRETA_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("GRETA_PORT") {
            self.server.port = v
                .parse()
                .map_err(|_| config_error(format!("Invalid GRETA_PORT value: {}", v)))?;
        }
        if let Some(v) = get("GRETA_TIME_ZONE") {
            self.calendar.time_zone = v;
        }
        if let Some(v) = get("GRETA_API_URL") {
            self.client.api_url = v;
        }
        if let Some(v) = get("GRETA_STORAGE_DIR") {
            self.client.storage_dir = Some(PathBuf::from(v));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.calendar.time_zone, DEFAULT_TIME_ZONE);
        assert!(config.google.client_id.is_none());
        assert_eq!(config.site.start_page(), "/start");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_REDIRECT_URI", "https://greta.example/api/auth/google/callback"),
            ("PUBLIC_SITE_URL", "https://greta.example/"),
            ("GRETA_PORT", "9090"),
            ("GOOGLE_CLIENT_SECRET", ""),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.google.client_id.as_deref(), Some("client"));
        assert!(config.google.client_secret.is_none());
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.site.start_page(), "https://greta.example/start");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "GRETA_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("GRETA_PORT"));
    }

    #[test]
    fn test_partial_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("greta.toml");
        std::fs::write(
            &path,
            "[calendar]\ntime_zone = \"Europe/Helsinki\"\n\n[server]\nport = 3000\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.calendar.time_zone, "Europe/Helsinki");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
