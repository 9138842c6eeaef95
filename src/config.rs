use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Accepted prefix for inbound document URLs; also the Items API base
    pub host_prefix: String,
    pub api_version: String,
    /// Per-fetch timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub organization: String,
    pub project: String,
    /// Repository names are this prefix joined to the unit name
    pub repository_prefix: String,
    pub manifest_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host_prefix: "https://dev.azure.com/".to_string(),
            api_version: "7.1-preview.1".to_string(),
            timeout_secs: Some(30),
            credential: None,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            organization: "curriculum".to_string(),
            project: "Units".to_string(),
            repository_prefix: "Unit".to_string(),
            manifest_path: "/navigation.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Environment variables with prefix "RELAY_", sections split on "__"
        config = config.add_source(
            config::Environment::with_prefix("RELAY")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Credential for the document host, from config or `AZURE_PAT`
    pub fn credential(&self) -> anyhow::Result<String> {
        if let Some(credential) = &self.upstream.credential {
            return Ok(credential.clone());
        }

        std::env::var("AZURE_PAT").map_err(|_| {
            anyhow::anyhow!("no upstream credential: set AZURE_PAT or RELAY_UPSTREAM__CREDENTIAL")
        })
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.upstream.timeout_secs.map(Duration::from_secs)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
