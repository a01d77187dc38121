use serde::{Deserialize, Serialize};

/// Deployment environment the service runs in
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    /// Seeds an empty store with mock spendings on startup
    Deployment,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_environment")]
    pub environment: Environment,

    #[serde(default = "default_debug_mode")]
    pub debug_mode: bool,

    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound on pooled database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_app_name() -> String {
    "Spendings API".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_debug_mode() -> bool {
    true
}

fn default_database_url() -> String {
    "sqlite://spendings.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_version: default_app_version(),
            environment: default_environment(),
            debug_mode: default_debug_mode(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            host: default_host(),
            port: default_port(),
        }
    }
}
