use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::llm::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::persona::Persona;

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// Default listen address of the endpoint.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default endpoint URL used by the chat page.
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:3000/api/chat-direct";

/// Endpoint server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener
    pub bind_addr: String,
    /// Persona used when the caller sends no system message
    pub persona: Persona,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            persona: Persona::default(),
        }
    }
}

/// LLM configuration for API access.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfigFile {
    /// API base URL
    pub api_base: String,
    /// API key (can also be set via OPENAI_API_KEY env var)
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Max tokens for generation
    pub max_tokens: u32,
    /// Temperature for generation
    pub temperature: f64,
}

impl Default for LlmConfigFile {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Chat page configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the completion endpoint
    pub endpoint_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
        }
    }
}

/// Behavior configuration for the UI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Number of lines to scroll with Page Up/Down
    pub scroll_page_size: usize,
    /// Event polling interval in milliseconds
    pub idle_poll_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_page_size: 10,
            idle_poll_ms: 50,
        }
    }
}

/// Color configuration for the UI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Chat area gradient start color (Purple by default)
    pub chat_gradient_start: Rgb,
    /// Chat area gradient end color (Blue by default)
    pub chat_gradient_end: Rgb,
    /// Input area gradient start color (Green by default)
    pub input_gradient_start: Rgb,
    /// Input area gradient end color (Cyan by default)
    pub input_gradient_end: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            chat_gradient_start: [147, 51, 234],  // Purple
            chat_gradient_end: [59, 130, 246],    // Blue
            input_gradient_start: [16, 185, 129], // Green
            input_gradient_end: [6, 182, 212],    // Cyan
        }
    }
}

impl ColorConfig {
    /// Convert an RGB array to a tuple.
    pub fn to_tuple(rgb: &Rgb) -> (u8, u8, u8) {
        (rgb[0], rgb[1], rgb[2])
    }

    /// Get chat gradient colors as tuples.
    pub fn chat_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.chat_gradient_start),
            Self::to_tuple(&self.chat_gradient_end),
        )
    }

    /// Get input gradient colors as tuples.
    pub fn input_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.input_gradient_start),
            Self::to_tuple(&self.input_gradient_end),
        )
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfigFile,
    pub client: ClientConfig,
    pub behavior: BehaviorConfig,
    pub colors: ColorConfig,
}

impl Config {
    /// Returns the config directory: ~/.config/jpchat
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jpchat"))
    }

    /// Returns the default config file path: ~/.config/jpchat/config.toml
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    ///
    /// A missing file is not an error. A file that fails to parse is logged
    /// and ignored.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_or_default(&path),
            _ => Self::default(),
        }
    }

    /// Load from `path`, logging and falling back to defaults on failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load_from_path(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring unreadable config: {e:#}");
            Self::default()
        })
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to_path(&path)
        } else {
            Err(anyhow::anyhow!("Could not determine config directory"))
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
