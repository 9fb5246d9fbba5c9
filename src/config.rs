use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh_interval_ms: u64,
    pub sort_column: String,
    pub sort_ascending: bool,
    pub process_limit: usize,
    pub terminate_timeout_ms: u64,
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            sort_column: "cpu".into(),
            sort_ascending: false,
            process_limit: 25,
            terminate_timeout_ms: 3000,
            ai: AiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub model: String,
    /// Prefer the GEMINI_API_KEY environment variable over storing this.
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            api_key: None,
            base_url: DEFAULT_GEMINI_URL.into(),
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load from disk, falling back to defaults, then apply environment
    /// overrides.
    pub fn load() -> Self {
        let path = config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create {}: {}", parent.display(), e))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Cannot serialize config: {}", e))?;
        fs::write(&path, data).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
        Ok(path)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL_NAME").filter(|m| !m.is_empty()) {
            self.ai.model = model;
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("sysky")
        .join("config.json")
}
