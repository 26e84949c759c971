use crate::error::{FetchError, Result};
use crate::http::HttpClient;

pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Only the head of the best stories list is resolved to titles.
pub const MAX_STORIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub u64);

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn best_stories(&self) -> String {
        format!("{}/beststories.json", self.base_url)
    }

    pub fn best_stories_pretty(&self) -> String {
        format!("{}/beststories.json?print=pretty", self.base_url)
    }

    pub fn item(&self, id: StoryId) -> String {
        format!("{}/item/{}.json", self.base_url, id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

/// Resolves the first [`MAX_STORIES`] best stories to their titles, in list order.
///
/// Any failing request aborts the whole operation; titles resolved before it are dropped.
pub fn fetch_titles(client: &impl HttpClient, endpoints: &Endpoints) -> Result<Vec<String>> {
    let url = endpoints.best_stories();
    let body = client.get(&url)?;
    let ids: Vec<StoryId> =
        serde_json::from_str(&body).map_err(|source| FetchError::Parse { url, source })?;

    tracing::info!(num_ids = ids.len(), "Got best stories");

    let mut titles = Vec::with_capacity(ids.len().min(MAX_STORIES));
    for id in ids.into_iter().take(MAX_STORIES) {
        let url = endpoints.item(id);
        let body = client.get(&url)?;
        let item: serde_json::Value =
            serde_json::from_str(&body).map_err(|source| FetchError::Parse { url, source })?;

        let title = item_title(&item);
        tracing::debug!(id = id.0, title, "Got story");
        titles.push(title.to_string());
    }

    tracing::info!(num_titles = titles.len(), "Resolved story titles");

    Ok(titles)
}

/// Returns the pretty-printed best stories list exactly as the API sent it.
pub fn fetch_raw_best_stories(client: &impl HttpClient, endpoints: &Endpoints) -> Result<String> {
    let body = client.get(&endpoints.best_stories_pretty())?;
    tracing::info!(num_bytes = body.len(), "Got raw best stories");
    Ok(body)
}

// Deleted items come back as `null`, and jobs or polls may lack a title altogether.
fn item_title(item: &serde_json::Value) -> &str {
    item.get("title")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
}
