use crate::config::WindowSize;
use crate::search::{SearchClient, ServiceCatalog};
use crate::timeout::with_timeout;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one retrieval. `Found(vec![])` means the search ran and nothing
/// matched; `Unavailable` means it could not run or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    Found(Vec<String>),
    Unavailable(String),
}

impl Retrieval {
    pub fn snippets(&self) -> &[String] {
        match self {
            Retrieval::Found(snippets) => snippets,
            Retrieval::Unavailable(_) => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Retrieval::Found(_))
    }

    /// Prompt-ready text: each snippet labeled with its 1-based position.
    pub fn format(&self) -> String {
        format_context(self.snippets())
    }
}

pub fn format_context(snippets: &[String]) -> String {
    snippets
        .iter()
        .enumerate()
        .map(|(idx, snippet)| format!("Ingredient Context {}: {}", idx + 1, snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetches context snippets for a query from the selected search service.
pub struct ContextRetriever {
    search: Arc<dyn SearchClient>,
}

impl ContextRetriever {
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }

    pub async fn retrieve(
        &self,
        catalog: &ServiceCatalog,
        service: &str,
        query: &str,
        limit: WindowSize,
        timeout: Duration,
    ) -> Retrieval {
        let Some(descriptor) = catalog.get(service) else {
            return Retrieval::Unavailable(format!(
                "search service '{}' is not available",
                service
            ));
        };

        if query.trim().is_empty() {
            return Retrieval::Unavailable("empty search query".into());
        }

        let rows = match with_timeout(
            timeout,
            "Search",
            self.search
                .search(&descriptor.name, &descriptor.search_column, query, limit.get()),
        )
        .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Retrieval from {} failed: {}", descriptor.name, e);
                return Retrieval::Unavailable(e.to_string());
            }
        };

        let total = rows.len();
        let snippets: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get_str(&descriptor.search_column).map(str::to_string))
            .take(limit.get())
            .collect();

        if total > 0 && snippets.is_empty() {
            return Retrieval::Unavailable(format!(
                "search results had no '{}' text column",
                descriptor.search_column
            ));
        }
        if snippets.len() < total.min(limit.get()) {
            tracing::warn!(
                "Dropped {} malformed search row(s) from {}",
                total.min(limit.get()) - snippets.len(),
                descriptor.name
            );
        }

        tracing::debug!("Retrieved {} snippet(s) from {}", snippets.len(), descriptor.name);
        Retrieval::Found(snippets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_labels_from_one() {
        let text = format_context(&["eggs".to_string(), "spinach".to_string()]);
        assert_eq!(text, "Ingredient Context 1: eggs\n\nIngredient Context 2: spinach");
    }

    #[test]
    fn unavailable_formats_empty() {
        let r = Retrieval::Unavailable("down".into());
        assert!(!r.is_available());
        assert_eq!(r.format(), "");
    }
}
