//! Place search as the user types

use shared::{is_valid_search_query, search_major_cities, Language, LocationInfo};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::debounce::Debouncer;
use crate::error::ClientResult;

/// Shorter queries return nothing
pub const MIN_QUERY_CHARS: usize = 2;

/// Candidates requested from the proxy per search
pub const DEFAULT_RESULT_LIMIT: u32 = 5;

#[derive(Clone)]
pub struct LocationSearch {
    api: ApiClient,
    limit: u32,
}

impl LocationSearch {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Candidates for `query`.
    ///
    /// Built-in Korean cities are answered locally; anything else goes to
    /// the proxy. Queries the proxy would reject are not sent.
    pub async fn search(&self, query: &str, language: Language) -> ClientResult<Vec<LocationInfo>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let local = search_major_cities(query);
        if !local.is_empty() {
            tracing::debug!(query, matches = local.len(), "Answered from built-in cities");
            return Ok(local);
        }

        if !is_valid_search_query(query) {
            tracing::debug!(query, "Query rejected before sending");
            return Ok(Vec::new());
        }

        self.api.search_locations(query, self.limit, language).await
    }

    /// Debounced search: push raw input into the returned debouncer and
    /// read settled results from the receiver. Failed searches publish an
    /// empty list.
    pub fn debounced(
        self,
        delay: Duration,
        language: Language,
    ) -> (Debouncer<String>, watch::Receiver<Vec<LocationInfo>>) {
        let (results, rx) = watch::channel(Vec::new());
        let results = Arc::new(results);

        let debouncer = Debouncer::spawn(delay, move |query: String| {
            let search = self.clone();
            let results = results.clone();
            async move {
                let found = match search.search(&query, language).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(query = %query, "Location search failed: {}", e);
                        Vec::new()
                    }
                };
                results.send_replace(found);
            }
        });

        (debouncer, rx)
    }
}
