use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HarnessConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Base URL of the target central-ledger admin API.
    #[serde(default = "default_target_url")]
    pub target_url: String,
    #[serde(default)]
    pub tls: TlsSettings,
    /// Currency reconciliation before transfer prepare. Never on by default.
    #[serde(default)]
    pub reconcile_currency: bool,
    /// Soft capacity of each pending-work queue; pushes beyond it are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TlsSettings {
    /// Path to a PEM bundle that replaces the platform trust store.
    #[serde(default)]
    pub trust_store: Option<String>,
    /// Accepted for parity with keystore-based deployments; PEM bundles
    /// carry no password, so the value is unused.
    #[serde(default)]
    pub trust_store_password: Option<String>,
    /// Disables certificate and hostname verification. Never the default.
    #[serde(default)]
    pub insecure: bool,
}

fn default_target_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_queue_capacity() -> usize {
    5_000_000
}

impl HarnessConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path))
    }
}
