use serde::Deserialize;

/// Runtime environment, selects log format and defaults
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Server configuration, read from `CATALOG_*` environment variables
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins of the admin UI, comma separated in the environment
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Start from the built-in catalog instead of an empty store
    #[serde(default = "default_seed_on_start")]
    pub seed_on_start: bool,
    /// Largest accepted import body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8080".to_string()]
}

const fn default_seed_on_start() -> bool {
    true
}

const fn default_max_upload_bytes() -> usize {
    // 5 MiB
    5 * 1024 * 1024
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("CATALOG_").from_env()
    }

    /// Address the server listens on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
