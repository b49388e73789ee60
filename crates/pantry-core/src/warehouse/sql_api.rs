use crate::constants::endpoints;
use crate::error::PantryError;
use crate::warehouse::{Row, SqlExecutor, Statement};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Executes statements over the warehouse SQL REST API.
pub struct SqlApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    token_type: String,
    database: String,
    schema: String,
    warehouse: Option<String>,
    role: Option<String>,
    timeout_secs: u64,
}

impl SqlApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
    ) -> Result<Self, PantryError> {
        Ok(Self {
            client: Self::build_http(crate::constants::defaults::REQUEST_TIMEOUT_SECS)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            token_type: crate::constants::defaults::TOKEN_TYPE.to_string(),
            database: database.into(),
            schema: schema.into(),
            warehouse: None,
            role: None,
            timeout_secs: crate::constants::defaults::REQUEST_TIMEOUT_SECS,
        })
    }

    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    pub fn with_warehouse(mut self, warehouse: Option<String>) -> Self {
        self.warehouse = warehouse;
        self
    }

    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Result<Self, PantryError> {
        self.client = Self::build_http(secs)?;
        self.timeout_secs = secs;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers shared with the search endpoint, which authenticates the same way.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("X-Snowflake-Authorization-Token-Type", &self.token_type)
            .header("Accept", "application/json")
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn build_http(timeout_secs: u64) -> Result<reqwest::Client, PantryError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Pantry/0.1")
            .build()
            .map_err(PantryError::from)
    }

    fn request_body<'a>(&'a self, statement: &'a Statement) -> StatementRequest<'a> {
        let bindings = statement
            .bindings()
            .iter()
            .enumerate()
            .map(|(i, value)| {
                (
                    (i + 1).to_string(),
                    Binding {
                        kind: "TEXT",
                        value,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();

        StatementRequest {
            statement: statement.sql(),
            timeout: self.timeout_secs,
            database: &self.database,
            schema: &self.schema,
            warehouse: self.warehouse.as_deref(),
            role: self.role.as_deref(),
            bindings: if bindings.is_empty() { None } else { Some(bindings) },
        }
    }
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    database: &'a str,
    schema: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bindings: Option<BTreeMap<String, Binding<'a>>>,
}

#[derive(Debug, Serialize)]
struct Binding<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatementResponse {
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    row_type: Vec<ColumnType>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

impl StatementResponse {
    pub(crate) fn into_rows(self) -> Vec<Row> {
        let columns: Vec<String> = self
            .result_set_meta_data
            .map(|m| m.row_type.into_iter().map(|c| c.name).collect())
            .unwrap_or_default();

        self.data
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect()
    }
}

#[async_trait::async_trait]
impl SqlExecutor for SqlApiClient {
    async fn execute(&self, statement: &Statement) -> Result<Vec<Row>, PantryError> {
        let url = format!("{}{}", self.base_url, endpoints::STATEMENTS_PATH);
        tracing::debug!("Executing statement: {}", statement.sql());

        let response = self
            .authorize(self.client.post(&url))
            .json(&self.request_body(statement))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        // 202 means the statement outlived the synchronous window.
        if status == reqwest::StatusCode::ACCEPTED {
            return Err(PantryError::Warehouse(format!(
                "Statement did not finish within {}s",
                self.timeout_secs
            )));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<StatementResponse>(&response_text)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(response_text);
            return Err(PantryError::Warehouse(format!(
                "SQL API error ({}): {}",
                status, message
            )));
        }

        let parsed: StatementResponse = serde_json::from_str(&response_text)
            .map_err(|e| PantryError::Warehouse(format!("Failed to parse response: {e}")))?;

        Ok(parsed.into_rows())
    }

    fn current_database(&self) -> &str {
        &self.database
    }

    fn current_schema(&self) -> &str {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_numbered_from_one() {
        let client = SqlApiClient::new("https://acct.example.com/", "t", "db", "public").unwrap();
        let statement = Statement::new("SELECT ?, ?").bind("a").bind("b'c");
        let body = serde_json::to_value(client.request_body(&statement)).unwrap();

        assert_eq!(body["statement"], "SELECT ?, ?");
        assert_eq!(body["bindings"]["1"]["type"], "TEXT");
        assert_eq!(body["bindings"]["1"]["value"], "a");
        assert_eq!(body["bindings"]["2"]["value"], "b'c");
        assert!(body.get("warehouse").is_none());
        assert_eq!(client.base_url(), "https://acct.example.com");
    }

    #[test]
    fn response_rows_carry_column_names() {
        let json = r#"{
            "resultSetMetaData": {"rowType": [{"name": "name"}, {"name": "search_column"}]},
            "data": [["recipe", "INSTRUCTIONS"]],
            "message": "Statement executed successfully."
        }"#;
        let rows = serde_json::from_str::<StatementResponse>(json).unwrap().into_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("NAME"), Some("recipe"));
        assert_eq!(rows[0].get_str("search_column"), Some("INSTRUCTIONS"));
    }
}
