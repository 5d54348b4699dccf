use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use url::Url;

/// Default sync endpoint, matching the collaborator server's dev address
pub const DEFAULT_SYNC_ENDPOINT: &str = "http://127.0.0.1:5000/update-google-event";

/// Default timeout for sync requests, in seconds
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for the exporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint of the collaborator server that upserts Google Calendar events
    pub sync_endpoint: String,
    /// Timeout for a single sync request, in seconds
    pub sync_timeout_secs: u64,
    /// Directory where exported .ics files are written
    pub export_dir: String,
    /// Path to the rendered schedule fragment loaded at startup
    pub schedule_path: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let sync_endpoint =
            env::var("SYNC_ENDPOINT").unwrap_or_else(|_| String::from(DEFAULT_SYNC_ENDPOINT));

        // Validate the endpoint early so a typo fails at startup, not on first export
        Url::parse(&sync_endpoint)
            .map_err(|e| config_error(&format!("Invalid SYNC_ENDPOINT: {}", e)))?;

        let sync_timeout_secs = match env::var("SYNC_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| env_error("Invalid SYNC_TIMEOUT_SECS format"))?,
            Err(_) => DEFAULT_SYNC_TIMEOUT_SECS,
        };

        let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| String::from("."));
        let schedule_path =
            env::var("SCHEDULE_PATH").unwrap_or_else(|_| String::from("schedule.html"));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("context_menu".to_string(), true);
        components.insert("detail_overlay".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            sync_endpoint,
            sync_timeout_secs,
            export_dir,
            schedule_path,
            components,
        })
    }

    /// Parsed form of the sync endpoint
    pub fn sync_endpoint_url(&self) -> AppResult<Url> {
        Url::parse(&self.sync_endpoint)
            .map_err(|e| config_error(&format!("Invalid sync endpoint: {}", e)))
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> AppResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> AppResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut components = HashMap::new();
        components.insert("context_menu".to_string(), true);
        components.insert("detail_overlay".to_string(), true);

        Self {
            sync_endpoint: DEFAULT_SYNC_ENDPOINT.to_string(),
            sync_timeout_secs: DEFAULT_SYNC_TIMEOUT_SECS,
            export_dir: ".".to_string(),
            schedule_path: "schedule.html".to_string(),
            components,
        }
    }
}
