use std::fmt;
use std::sync::Arc;

use anyhow::ensure;
use epigraph_core::{ChartCache, GraphError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::ChartCallback;

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("chart could not be rendered: {0}")]
    Render(#[from] GraphError),
    #[error("callback delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
    #[error("callback endpoint answered HTTP {0}")]
    Rejected(reqwest::StatusCode),
}

/// Renders charts off the request path and posts a link to each one.
///
/// Each dispatch is one detached task that owns everything it needs; the
/// only thing it shares with request handlers is the chart cache.
#[derive(Clone)]
pub struct CallbackDispatcher {
    charts: Arc<ChartCache>,
    http: reqwest::Client,
    public_base_url: Url,
}

impl fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("public_base_url", &self.public_base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CallbackDispatcher {
    pub fn new(
        charts: Arc<ChartCache>,
        http: reqwest::Client,
        public_base_url: Url,
    ) -> anyhow::Result<Self> {
        ensure!(
            !public_base_url.cannot_be_a_base(),
            "public base URL {public_base_url} cannot carry a path"
        );
        Ok(Self {
            charts,
            http,
            public_base_url,
        })
    }

    /// `<base>/graph?title=<title>&uuid=<fresh v4>`.
    ///
    /// The token only exists to defeat client-side image caching; the graph
    /// endpoint ignores it.
    pub fn chart_link(&self, title: &str) -> Url {
        let mut link = self.public_base_url.clone();
        if let Ok(mut segments) = link.path_segments_mut() {
            segments.pop_if_empty().push("graph");
        }
        link.set_fragment(None);
        link.query_pairs_mut()
            .clear()
            .append_pair("title", title)
            .append_pair("uuid", &Uuid::new_v4().to_string());
        link
    }

    /// Spawn the render-and-callback task. Failures are logged, never retried.
    pub fn dispatch(&self, title: String, response_url: Url) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.deliver(&title, &response_url).await {
                Ok(()) => info!(title = %title, "chart callback delivered"),
                Err(err) => warn!(
                    title = %title,
                    response_url = %response_url,
                    error = %err,
                    "chart callback dropped"
                ),
            }
        })
    }

    async fn deliver(
        &self,
        title: &str,
        response_url: &Url,
    ) -> Result<(), CallbackError> {
        self.charts.get_or_render(title).await?;

        let link = self.chart_link(title);
        let response = self
            .http
            .post(response_url.clone())
            .json(&ChartCallback::new(&link))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallbackError::Rejected(status));
        }
        Ok(())
    }
}
