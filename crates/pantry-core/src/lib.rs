pub mod error;
pub mod constants;
pub mod config;
pub mod llm;
pub mod warehouse;
pub mod search;
pub mod context;
pub mod retrieval;
pub mod session;
mod timeout;

// Re-export key types
pub use error::PantryError;
pub use config::{ChefModel, SessionConfig, Settings, WindowSize};
pub use llm::{CompletionClient, Message, Role};
pub use search::{SearchClient, SearchServiceDescriptor, ServiceCatalog};
pub use context::{render_history, ChatHistoryStore, PromptBuilder, QueryRewriter};
pub use retrieval::{ContextRetriever, Retrieval};
pub use session::{ConversationOrchestrator, Session, TurnEvent, TurnReport, TurnStage};
pub use warehouse::{Row, SqlExecutor, Statement};
