use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use super::{Catalog, markup};
use crate::error::{GraphError, Result};
use crate::model::{EpisodeRecord, SeriesMatch};

pub const DEFAULT_CATALOG_URL: &str = "https://www.imdb.com";

// Without this the catalog answers with geo-localized alternate titles.
const LANGUAGE: &str = "en-US,en;q=0.5";
const UA_STRING: &str = concat!("epigraph/", env!("CARGO_PKG_VERSION"));

pub struct ImdbCatalog {
    http: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for ImdbCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImdbCatalog")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ImdbCatalog {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(LANGUAGE));
        headers.insert(USER_AGENT, HeaderValue::from_static(UA_STRING));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| {
                GraphError::upstream(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GraphError::upstream(format!(
                    "catalog base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_html(&self, url: Url, query: &[(&str, &str)]) -> Result<String> {
        debug!(url = %url, "fetching catalog page");
        let response = self.http.get(url.clone()).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "catalog request failed");
            return Err(GraphError::upstream(format!(
                "catalog returned HTTP {status} for {url}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Catalog for ImdbCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SeriesMatch>> {
        let url = self.endpoint(&["find"])?;
        let html = self
            .get_html(url, &[("q", query), ("s", "tt"), ("ttype", "tv")])
            .await?;
        Ok(markup::parse_search_results(&html))
    }

    async fn season_ids(&self, canonical_id: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["title", canonical_id, "episodes"])?;
        let html = self.get_html(url, &[]).await?;
        Ok(markup::parse_season_ids(&html))
    }

    async fn season_episodes(
        &self,
        canonical_id: &str,
        season_id: &str,
    ) -> Result<Vec<EpisodeRecord>> {
        let url = self.endpoint(&["title", canonical_id, "episodes"])?;
        let html = self.get_html(url, &[("season", season_id)]).await?;
        Ok(markup::parse_episode_rows(&html, season_id.parse().ok()))
    }

    async fn top_rated_titles(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["chart", "toptv"])?;
        let html = self.get_html(url, &[]).await?;
        Ok(markup::parse_top_titles(&html))
    }
}
