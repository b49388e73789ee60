//! Per-session state: history, settings and the service catalog. Sessions
//! share nothing with each other.

mod orchestrator;

pub use orchestrator::{ConversationOrchestrator, TurnEvent, TurnReport, TurnStage};

use crate::config::{ChefModel, SessionConfig, WindowSize};
use crate::context::ChatHistoryStore;
use crate::error::PantryError;
use crate::llm::Message;
use crate::search::{SearchClient, ServiceCatalog};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

pub struct Session {
    id: String,
    history: Mutex<ChatHistoryStore>,
    config: RwLock<SessionConfig>,
    catalog: RwLock<Option<ServiceCatalog>>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            history: Mutex::new(ChatHistoryStore::new()),
            config: RwLock::new(config),
            catalog: RwLock::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Load the service catalog on first use. Later calls are no-ops; use
    /// [`Session::refresh_services`] to reload.
    pub async fn load_services(&self, client: &dyn SearchClient) -> Result<(), PantryError> {
        if self.catalog.read().await.is_some() {
            return Ok(());
        }
        self.refresh_services(client).await
    }

    /// Reload the catalog. A previously selected service that disappeared
    /// stays selected, which keeps chat disabled until the user picks again.
    pub async fn refresh_services(&self, client: &dyn SearchClient) -> Result<(), PantryError> {
        let timeout = self.config.read().await.request_timeout;
        let catalog = ServiceCatalog::load(client, timeout).await?;

        {
            let mut config = self.config.write().await;
            if config.selected_search_service.is_none() {
                config.selected_search_service =
                    catalog.names().first().map(|name| name.to_string());
            }
        }

        tracing::info!(session = %self.id, "Search services: {:?}", catalog.names());
        *self.catalog.write().await = Some(catalog);
        Ok(())
    }

    pub async fn catalog(&self) -> ServiceCatalog {
        self.catalog.read().await.clone().unwrap_or_default()
    }

    pub async fn config(&self) -> SessionConfig {
        self.config.read().await.clone()
    }

    /// `Ok` when the chat input should be enabled.
    pub async fn chat_availability(&self) -> Result<(), PantryError> {
        let catalog = self.catalog.read().await;
        let config = self.config.read().await;
        check_service(&config, catalog.as_ref())
    }

    pub async fn select_service(&self, name: &str) -> Result<(), PantryError> {
        let catalog = self.catalog.read().await;
        let known = catalog.as_ref().is_some_and(|c| c.contains(name));
        if !known {
            return Err(PantryError::config(format!(
                "Unknown search service '{}'",
                name
            )));
        }
        self.config.write().await.selected_search_service = Some(name.to_string());
        Ok(())
    }

    pub async fn set_model(&self, model: ChefModel) {
        self.config.write().await.model = model;
    }

    pub async fn set_context_chunk_count(&self, value: i64) -> Result<(), PantryError> {
        let count = WindowSize::new(value, "context_chunk_count")?;
        self.config.write().await.context_chunk_count = count;
        Ok(())
    }

    pub async fn set_chat_memory_length(&self, value: i64) -> Result<(), PantryError> {
        let length = WindowSize::new(value, "chat_memory_length")?;
        self.config.write().await.chat_memory_length = length;
        Ok(())
    }

    pub async fn set_use_history(&self, enabled: bool) {
        self.config.write().await.use_history = enabled;
    }

    pub async fn set_debug_mode(&self, enabled: bool) {
        self.config.write().await.debug_mode = enabled;
    }

    /// A copy of the chat history. Waits for any in-flight turn to commit, so
    /// a user message is never seen without its reply.
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.messages().to_vec()
    }

    /// Reset the conversation. Rejected while a turn is in flight.
    pub fn clear_history(&self) -> Result<(), PantryError> {
        let mut history = self
            .history
            .try_lock()
            .map_err(|_| PantryError::TurnInProgress)?;
        history.clear();
        tracing::info!(session = %self.id, "Chat history cleared");
        Ok(())
    }

    pub(crate) fn begin_turn(&self) -> Result<MutexGuard<'_, ChatHistoryStore>, PantryError> {
        self.history
            .try_lock()
            .map_err(|_| PantryError::TurnInProgress)
    }
}

pub(crate) fn check_service(
    config: &SessionConfig,
    catalog: Option<&ServiceCatalog>,
) -> Result<(), PantryError> {
    let catalog = match catalog {
        Some(c) if !c.is_empty() => c,
        _ => return Err(PantryError::config("No search services available.")),
    };
    match config.selected_search_service.as_deref() {
        None => Err(PantryError::config("No search service selected.")),
        Some(name) if !catalog.contains(name) => Err(PantryError::config(format!(
            "Search service '{}' is no longer available. Select another one.",
            name
        ))),
        Some(_) => Ok(()),
    }
}
