//! The search collaborator and the session's catalog of search services.

mod cortex;

pub use cortex::CortexSearchClient;

use crate::error::PantryError;
use crate::timeout::with_timeout;
use crate::warehouse::Row;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One retrievable collection: a named search service and the column its
/// snippets come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchServiceDescriptor {
    pub name: String,
    pub search_column: String,
}

impl SearchServiceDescriptor {
    pub fn new(name: impl Into<String>, search_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_column: search_column.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Query `service` and return up to `limit` rows in relevance order.
    async fn search(
        &self,
        service: &str,
        column: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Row>, PantryError>;

    /// Names of the search services visible in the current schema.
    async fn list_services(&self) -> Result<Vec<String>, PantryError>;

    /// The search column of `name`, or `None` when the service has no description.
    async fn describe_service(&self, name: &str) -> Result<Option<String>, PantryError>;
}

/// The set of search services available to a session. Loaded once and
/// read-only for the duration of a turn.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<SearchServiceDescriptor>,
    skipped: Vec<String>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<SearchServiceDescriptor>) -> Self {
        Self {
            services,
            skipped: Vec::new(),
        }
    }

    /// Discover every service and its search column. A service that cannot be
    /// described is left out and reported through [`ServiceCatalog::skipped`].
    /// Each collaborator call is bounded by `timeout`.
    pub async fn load(client: &dyn SearchClient, timeout: Duration) -> Result<Self, PantryError> {
        let names = with_timeout(timeout, "Listing search services", client.list_services())
            .await
            .map_err(|e| {
                PantryError::config(format!(
                    "An error occurred while loading search services: {e}"
                ))
            })?;

        let mut services = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();

        for name in names {
            let described =
                with_timeout(timeout, "Describing search service", client.describe_service(&name))
                    .await;
            match described {
                Ok(Some(search_column)) => {
                    services.push(SearchServiceDescriptor::new(name, search_column));
                }
                Ok(None) => {
                    tracing::warn!("No results found for search service: {}", name);
                    skipped.push(name);
                }
                Err(e) => {
                    tracing::warn!("Failed to describe search service {}: {}", name, e);
                    skipped.push(name);
                }
            }
        }

        tracing::info!(
            "Loaded {} search service(s), skipped {}",
            services.len(),
            skipped.len()
        );

        Ok(Self { services, skipped })
    }

    pub fn get(&self, name: &str) -> Option<&SearchServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn services(&self) -> &[SearchServiceDescriptor] {
        &self.services
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }
}
