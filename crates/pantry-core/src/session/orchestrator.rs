use crate::context::{ChatHistoryStore, PromptBuilder, QueryRewriter};
use crate::error::PantryError;
use crate::llm::{CompletionClient, Message, Role};
use crate::retrieval::{ContextRetriever, Retrieval};
use crate::search::SearchClient;
use crate::session::{check_service, Session};
use crate::timeout::with_timeout;
use crate::warehouse::sanitize_user_input;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Shown in place of a reply when completion fails. Failure detail goes to
/// [`TurnEvent::Error`] and the log, never into history.
const COMPLETION_FAILED_NOTICE: &str =
    "Sorry, I couldn't cook up a recipe this time. Please try again.";

/// Pipeline stages of one turn, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Recording,
    Rewriting,
    Retrieving,
    Prompting,
    Completing,
    Recorded,
}

/// Events emitted while a turn runs - the interface the front end renders.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// The turn has started external work; show a working indicator.
    Working,
    Stage(TurnStage),
    /// Debug-mode inspection output.
    Debug { label: String, text: String },
    /// The final completion failed; the reply is an error notice.
    Error(String),
    Completed,
}

#[derive(Debug, Clone)]
pub struct TurnReport {
    pub reply: String,
    /// The query sent to retrieval.
    pub query: String,
    pub rewritten: bool,
    pub retrieval_degraded: bool,
    pub completion_failed: bool,
}

/// Drives one turn: record, rewrite, retrieve, prompt, complete, record.
pub struct ConversationOrchestrator {
    search: Arc<dyn SearchClient>,
    rewriter: QueryRewriter,
    retriever: ContextRetriever,
    completion: Arc<dyn CompletionClient>,
}

impl ConversationOrchestrator {
    pub fn new(search: Arc<dyn SearchClient>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            rewriter: QueryRewriter::new(completion.clone()),
            retriever: ContextRetriever::new(search.clone()),
            search,
            completion,
        }
    }

    /// Load the session's search services if it has none yet.
    pub async fn prepare_session(&self, session: &Session) -> Result<(), PantryError> {
        session.load_services(self.search.as_ref()).await
    }

    /// Reload the session's search services.
    pub async fn refresh_services(&self, session: &Session) -> Result<(), PantryError> {
        session.refresh_services(self.search.as_ref()).await
    }

    pub async fn run_turn(
        &self,
        session: &Session,
        user_input: &str,
    ) -> Result<TurnReport, PantryError> {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        self.run_turn_with_events(session, user_input, tx).await
    }

    /// Run one turn, emitting [`TurnEvent`]s through the channel.
    ///
    /// Errors are returned only when the turn is refused before anything is
    /// recorded (another turn in flight, chat disabled, empty input). Once the
    /// user message is recorded the turn always ends with an assistant message.
    pub async fn run_turn_with_events(
        &self,
        session: &Session,
        user_input: &str,
        event_tx: UnboundedSender<TurnEvent>,
    ) -> Result<TurnReport, PantryError> {
        let mut history = session.begin_turn()?;

        let config = session.config().await;
        let catalog = session.catalog().await;
        check_service(&config, Some(&catalog))?;

        if user_input.trim().is_empty() {
            return Err(PantryError::Other("Message is empty".into()));
        }

        // Recording
        let _ = event_tx.send(TurnEvent::Stage(TurnStage::Recording));
        history.append(Message::user(user_input));
        let _ = event_tx.send(TurnEvent::Working);

        let question = sanitize_user_input(user_input);
        let window = if config.use_history {
            sanitized_window(&history, config.chat_memory_length.get())
        } else {
            Vec::new()
        };

        // Rewriting
        let mut rewritten = false;
        let query = if window.is_empty() {
            question.clone()
        } else {
            let _ = event_tx.send(TurnEvent::Stage(TurnStage::Rewriting));
            match with_timeout(
                config.request_timeout,
                "Query rewrite",
                self.rewriter.rewrite(config.model, &window, &question),
            )
            .await
            {
                Ok(optimized) => {
                    rewritten = true;
                    debug_event(&event_tx, config.debug_mode, "Optimized Search Query", &optimized);
                    optimized
                }
                Err(e) => {
                    tracing::warn!("Query rewrite failed, using the question as query: {}", e);
                    debug_event(
                        &event_tx,
                        config.debug_mode,
                        "Query Rewrite Failed",
                        &e.to_string(),
                    );
                    question.clone()
                }
            }
        };

        // Retrieving
        let _ = event_tx.send(TurnEvent::Stage(TurnStage::Retrieving));
        let service = config.selected_search_service.as_deref().unwrap_or_default();
        let retrieval = self
            .retriever
            .retrieve(
                &catalog,
                service,
                &query,
                config.context_chunk_count,
                config.request_timeout,
            )
            .await;
        if let Retrieval::Unavailable(ref reason) = retrieval {
            tracing::warn!("Retrieval unavailable, continuing without context: {}", reason);
            debug_event(&event_tx, config.debug_mode, "Retrieval Unavailable", reason);
        }
        let context = retrieval.format();
        debug_event(&event_tx, config.debug_mode, "Discovered Ingredients", &context);

        // Prompting
        let _ = event_tx.send(TurnEvent::Stage(TurnStage::Prompting));
        let prompt = PromptBuilder::new()
            .with_context(context)
            .with_history(&window)
            .with_request(&question)
            .build();

        // Completing
        let _ = event_tx.send(TurnEvent::Stage(TurnStage::Completing));
        let (reply, completion_failed) = match with_timeout(
            config.request_timeout,
            "Completion",
            self.completion.complete(config.model.as_str(), &prompt),
        )
        .await
        {
            Ok(reply) => (reply, false),
            Err(e) => {
                tracing::warn!("Completion failed: {}", e);
                let _ = event_tx.send(TurnEvent::Error(e.to_string()));
                (COMPLETION_FAILED_NOTICE.to_string(), true)
            }
        };

        // Recorded
        history.append(Message::assistant(reply.clone()));
        drop(history);
        let _ = event_tx.send(TurnEvent::Stage(TurnStage::Recorded));
        let _ = event_tx.send(TurnEvent::Completed);

        Ok(TurnReport {
            reply,
            query,
            rewritten,
            retrieval_degraded: !retrieval.is_available(),
            completion_failed,
        })
    }
}

/// The recent window with user-authored text sanitized like the question.
fn sanitized_window(history: &ChatHistoryStore, n: usize) -> Vec<Message> {
    history
        .recent_window(n)
        .into_iter()
        .map(|m| match m.role() {
            Role::User => Message::user(sanitize_user_input(m.content())),
            Role::Assistant => m,
        })
        .collect()
}

fn debug_event(tx: &UnboundedSender<TurnEvent>, enabled: bool, label: &str, text: &str) {
    if enabled {
        let _ = tx.send(TurnEvent::Debug {
            label: label.to_string(),
            text: text.to_string(),
        });
    }
}

