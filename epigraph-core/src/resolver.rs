use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{GraphError, Result};
use crate::model::SeriesMatch;

/// Chat command that asks for a random entry of the top-rated TV chart.
pub const TOP_RATED_COMMAND: &str = "top250";

/// Resolve a free-text title to the first TV series the catalog lists.
///
/// There is no disambiguation: the first eligible hit wins.
pub async fn resolve(catalog: &dyn Catalog, query: &str) -> Result<SeriesMatch> {
    let query = query.trim();
    if query.is_empty() {
        return Err(GraphError::not_found("No title given"));
    }

    let matches = catalog.search(query).await?;
    debug!(query, candidates = matches.len(), "catalog search finished");

    let best = matches.into_iter().next().ok_or_else(|| {
        GraphError::not_found(format!("No TV series found matching '{query}'"))
    })?;

    info!(
        query,
        canonical_id = %best.canonical_id,
        display_title = %best.display_title,
        "resolved series"
    );
    Ok(best)
}

/// Pick one title uniformly at random from the top-rated TV chart.
pub async fn pick_top_rated(catalog: &dyn Catalog) -> Result<String> {
    let titles = catalog.top_rated_titles().await?;
    let picked = titles
        .choose(&mut rand::rng())
        .cloned()
        .ok_or_else(|| GraphError::not_found("The top rated TV chart is empty"))?;

    info!(title = %picked, candidates = titles.len(), "picked top rated series");
    Ok(picked)
}
