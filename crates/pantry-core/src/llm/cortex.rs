use crate::error::PantryError;
use crate::llm::traits::CompletionClient;
use crate::warehouse::{SqlExecutor, Statement};
use serde_json::Value;
use std::sync::Arc;

const COMPLETE_SQL: &str = "SELECT SNOWFLAKE.CORTEX.COMPLETE(?, ?) AS RESPONSE";

/// Completion collaborator backed by the warehouse `COMPLETE` function.
///
/// Model name and prompt travel as bound parameters, never spliced into the
/// statement text.
pub struct CortexCompletionClient {
    warehouse: Arc<dyn SqlExecutor>,
}

impl CortexCompletionClient {
    pub fn new(warehouse: Arc<dyn SqlExecutor>) -> Self {
        Self { warehouse }
    }
}

#[async_trait::async_trait]
impl CompletionClient for CortexCompletionClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, PantryError> {
        let statement = Statement::new(COMPLETE_SQL).bind(model).bind(prompt);

        let rows = self
            .warehouse
            .execute(&statement)
            .await
            .map_err(|e| PantryError::Completion(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| PantryError::Completion("COMPLETE returned no rows".into()))?;

        match row.get_index(0) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(Value::Null) | None => Err(PantryError::Completion(
                "COMPLETE returned an empty response".into(),
            )),
            Some(other) => Ok(other.to_string()),
        }
    }
}
