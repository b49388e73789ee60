use crate::constants::endpoints;
use crate::error::PantryError;
use crate::search::SearchClient;
use crate::warehouse::{validate_identifier, Row, SqlApiClient, SqlExecutor, Statement};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Search collaborator over the managed search REST endpoint. Discovery goes
/// through the warehouse with `SHOW`/`DESC` statements.
pub struct CortexSearchClient {
    api: Arc<SqlApiClient>,
}

impl CortexSearchClient {
    pub fn new(api: Arc<SqlApiClient>) -> Self {
        Self { api }
    }

    fn query_url(&self, service: &str) -> String {
        let path = endpoints::SEARCH_QUERY_PATH
            .replace("{db}", &urlencoding::encode(self.api.current_database()))
            .replace("{schema}", &urlencoding::encode(self.api.current_schema()))
            .replace("{service}", &urlencoding::encode(service));
        format!("{}{}", self.api.base_url(), path)
    }

    fn qualified(&self, name: &str) -> Result<String, PantryError> {
        Ok(format!(
            "{}.{}.{}",
            validate_identifier(self.api.current_database())?,
            validate_identifier(self.api.current_schema())?,
            validate_identifier(name)?
        ))
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    columns: Vec<&'a str>,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Map<String, Value>>,
}

#[async_trait::async_trait]
impl SearchClient for CortexSearchClient {
    async fn search(
        &self,
        service: &str,
        column: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Row>, PantryError> {
        let url = self.query_url(service);
        let body = SearchRequest {
            query,
            columns: vec![column],
            limit,
        };

        let response = self
            .api
            .authorize(self.api.http().post(&url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(PantryError::Retrieval(format!(
                "Search API error ({}): {}",
                status, response_text
            )));
        }

        let parsed: SearchResponse = serde_json::from_str(&response_text)
            .map_err(|e| PantryError::Retrieval(format!("Failed to parse search response: {e}")))?;

        Ok(parsed.results.into_iter().map(Row::from_object).collect())
    }

    async fn list_services(&self) -> Result<Vec<String>, PantryError> {
        let sql = format!(
            "SHOW CORTEX SEARCH SERVICES IN SCHEMA {}.{}",
            validate_identifier(self.api.current_database())?,
            validate_identifier(self.api.current_schema())?
        );
        let rows = self.api.execute(&Statement::new(sql)).await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get_str("name").map(str::to_string))
            .collect())
    }

    async fn describe_service(&self, name: &str) -> Result<Option<String>, PantryError> {
        let sql = format!("DESC CORTEX SEARCH SERVICE {}", self.qualified(name)?);
        let rows = self.api.execute(&Statement::new(sql)).await?;

        Ok(rows
            .first()
            .and_then(|row| row.get_str("search_column"))
            .map(str::to_string))
    }
}
