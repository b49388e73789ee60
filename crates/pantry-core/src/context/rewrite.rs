use crate::config::ChefModel;
use crate::context::builder::{neutralize, push_section, render_history};
use crate::error::PantryError;
use crate::llm::{CompletionClient, Message};
use std::sync::Arc;

const REWRITE_INSTRUCTION: &str = "Analyze this cooking conversation history and current question to create \
an enhanced ingredient search query. Respond only with the improved search query, \
with no explanation or conversational text.";

/// Turns recent history plus a new question into a single search query.
pub struct QueryRewriter {
    completion: Arc<dyn CompletionClient>,
}

impl QueryRewriter {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    pub fn build_prompt(history: &[Message], question: &str) -> String {
        let mut prompt = String::new();
        prompt.push_str("[INST]\n");
        prompt.push_str(REWRITE_INSTRUCTION);
        prompt.push_str("\n\n");
        push_section(&mut prompt, "chat_history", &render_history(history));
        push_section(&mut prompt, "current_question", &neutralize(question));
        prompt.push_str("[/INST]");
        prompt
    }

    /// Returns the model's answer, trimmed, to be used verbatim as the
    /// retrieval query. Callers must not invoke this with an empty history.
    pub async fn rewrite(
        &self,
        model: ChefModel,
        history: &[Message],
        question: &str,
    ) -> Result<String, PantryError> {
        if history.is_empty() {
            return Err(PantryError::Rewrite(
                "rewrite requested without chat history".into(),
            ));
        }

        let prompt = Self::build_prompt(history, question);
        let response = self
            .completion
            .complete(model.as_str(), &prompt)
            .await
            .map_err(|e| PantryError::Rewrite(e.to_string()))?;

        let query = response.trim();
        if query.is_empty() {
            return Err(PantryError::Rewrite("model returned an empty query".into()));
        }

        tracing::debug!("Rewritten search query: {}", query);
        Ok(query.to_string())
    }
}
