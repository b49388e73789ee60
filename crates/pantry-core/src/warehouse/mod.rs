//! The session/database collaborator: executes statements in the active
//! database and schema.

mod quote;
mod sql_api;

pub use quote::{sanitize_user_input, validate_identifier};
pub use sql_api::SqlApiClient;

use crate::error::PantryError;
use serde_json::{Map, Value};

/// A statement with positional (`?`) bindings. Bound values are sent as data
/// and never become part of the statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    bindings: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.bindings.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }
}

/// One result row. Column lookup by name ignores ASCII case, since the
/// warehouse reports `SHOW`/`DESC` columns in lower case and projections in
/// upper case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn from_object(object: Map<String, Value>) -> Self {
        let (columns, values) = object.into_iter().unzip();
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|i| self.values.get(i))
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute one statement and collect every row of its result.
    async fn execute(&self, statement: &Statement) -> Result<Vec<Row>, PantryError>;

    /// The database statements resolve unqualified names against.
    fn current_database(&self) -> &str;

    fn current_schema(&self) -> &str;
}
