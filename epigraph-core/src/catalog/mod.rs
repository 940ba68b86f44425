//! Access to the third-party title catalog.
//!
//! [`Catalog`] is the seam between the pipeline's rules and the site's markup.
//! [`ImdbCatalog`] fetches pages with `reqwest` and hands them to the pure
//! parsers in [`markup`]; nothing in this module filters episodes.

mod imdb;
pub mod markup;

pub use imdb::{DEFAULT_CATALOG_URL, ImdbCatalog};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{EpisodeRecord, SeriesMatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// TV series matching `query`, in the order the catalog lists them.
    async fn search(&self, query: &str) -> Result<Vec<SeriesMatch>>;

    /// Season identifiers for a series, in catalog order.
    async fn season_ids(&self, canonical_id: &str) -> Result<Vec<String>>;

    /// Every episode row of one season, unfiltered.
    async fn season_episodes(
        &self,
        canonical_id: &str,
        season_id: &str,
    ) -> Result<Vec<EpisodeRecord>>;

    /// Titles on the first page of the top-rated TV chart.
    async fn top_rated_titles(&self) -> Result<Vec<String>>;
}
