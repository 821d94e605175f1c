// Deployment configuration for the dashboard client.
// Layered with the 'config' crate: defaults, then config.toml, then APP_* env vars.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_FILE: &str = ".reliability_session.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    // Where the bearer token is persisted between runs
    pub session_file: String,
    // Directory the history CSV export is written to
    pub export_dir: String,
    // Only shown to the user during login
    pub google_client_id: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("session_file", DEFAULT_SESSION_FILE)?
            .set_default("export_dir", ".")?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_API_BASE_URL)
            .add_source(Environment::with_prefix("APP"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: DEFAULT_SESSION_FILE.to_string(),
            export_dir: ".".to_string(),
            google_client_id: None,
        }
    }
}
