mod session;

pub use session::{ChefModel, SessionConfig, WindowSize};

use crate::constants::defaults;
use crate::error::PantryError;
use crate::llm::{CompletionClient, CortexCompletionClient};
use crate::search::{CortexSearchClient, SearchClient};
use crate::warehouse::SqlApiClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub chat: ChatSettings,
    #[serde(default)]
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// e.g. `https://<account>.snowflakecomputing.com`
    pub account_url: String,
    pub database: String,
    pub schema: String,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    /// Name of the environment variable holding the access token.
    pub token_env: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub search_service: Option<String>,
    pub model: String,
    pub context_chunk_count: i64,
    pub chat_memory_length: i64,
    pub use_history: bool,
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub request_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            account_url: String::new(),
            database: defaults::DATABASE.to_string(),
            schema: defaults::SCHEMA.to_string(),
            warehouse: None,
            role: None,
            token_env: defaults::TOKEN_ENV.to_string(),
            token_type: defaults::TOKEN_TYPE.to_string(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            search_service: None,
            model: defaults::DEFAULT_MODEL.to_string(),
            context_chunk_count: i64::from(defaults::CONTEXT_CHUNK_COUNT),
            chat_memory_length: i64::from(defaults::CHAT_MEMORY_LENGTH),
            use_history: true,
            debug_mode: false,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pantry")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(settings) => return settings,
                Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, PantryError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PantryError::config(e.to_string()))
    }

    pub fn save(&self) -> Result<(), PantryError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PantryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PantryError::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy a session's chat settings back so they can be persisted.
    pub fn apply_session(&mut self, config: &SessionConfig) {
        self.chat.search_service = config.selected_search_service.clone();
        self.chat.model = config.model.as_str().to_string();
        self.chat.context_chunk_count = config.context_chunk_count.get() as i64;
        self.chat.chat_memory_length = config.chat_memory_length.get() as i64;
        self.chat.use_history = config.use_history;
        self.chat.debug_mode = config.debug_mode;
        self.network.request_timeout_secs = config.request_timeout.as_secs();
    }

    /// Get the access token from the environment variable named in settings.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.connection.token_env).ok()
    }

    /// Validate the chat section into a [`SessionConfig`]. Out-of-range
    /// counts and unknown models are errors, not clamped.
    pub fn session_config(&self) -> Result<SessionConfig, PantryError> {
        if self.network.request_timeout_secs == 0 {
            return Err(PantryError::config("request_timeout_secs must be positive"));
        }
        Ok(SessionConfig {
            selected_search_service: self.chat.search_service.clone(),
            model: self.chat.model.parse()?,
            context_chunk_count: WindowSize::new(
                self.chat.context_chunk_count,
                "context_chunk_count",
            )?,
            chat_memory_length: WindowSize::new(
                self.chat.chat_memory_length,
                "chat_memory_length",
            )?,
            use_history: self.chat.use_history,
            debug_mode: self.chat.debug_mode,
            request_timeout: Duration::from_secs(self.network.request_timeout_secs),
        })
    }

    /// Build the warehouse client from the connection section.
    pub fn build_warehouse(&self) -> Result<Arc<SqlApiClient>, PantryError> {
        if self.connection.account_url.is_empty() {
            return Err(PantryError::config(format!(
                "connection.account_url is not set in {}",
                Self::config_path().display()
            )));
        }
        let token = self.token().ok_or_else(|| {
            PantryError::config(format!(
                "Environment variable {} is not set",
                self.connection.token_env
            ))
        })?;

        let client = SqlApiClient::new(
            &self.connection.account_url,
            token,
            &self.connection.database,
            &self.connection.schema,
        )?
        .with_token_type(&self.connection.token_type)
        .with_warehouse(self.connection.warehouse.clone())
        .with_role(self.connection.role.clone())
        .with_timeout(self.network.request_timeout_secs)?;

        Ok(Arc::new(client))
    }

    /// Build the search and completion collaborators sharing one warehouse client.
    pub fn build_collaborators(
        &self,
    ) -> Result<(Arc<dyn SearchClient>, Arc<dyn CompletionClient>), PantryError> {
        let warehouse = self.build_warehouse()?;
        let search: Arc<dyn SearchClient> = Arc::new(CortexSearchClient::new(warehouse.clone()));
        let completion: Arc<dyn CompletionClient> = Arc::new(CortexCompletionClient::new(warehouse));
        Ok((search, completion))
    }
}
