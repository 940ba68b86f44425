use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{GraphError, Result};
use crate::model::{EpisodeRating, EpisodeRecord, RatingCell, SeasonSeries};

/// Scrape every season of a series and keep the rated, in-continuity episodes.
///
/// Issues one request for the season list plus one per season, in catalog
/// order. Seasons without a single qualifying episode are left out of the
/// result entirely.
pub async fn collect(catalog: &dyn Catalog, canonical_id: &str) -> Result<SeasonSeries> {
    let mut season_ids = catalog.season_ids(canonical_id).await?;
    let mut seen = HashSet::new();
    season_ids.retain(|season_id| seen.insert(season_id.clone()));
    if season_ids.is_empty() {
        return Err(GraphError::not_found(format!(
            "Series {canonical_id} has no seasons listed"
        )));
    }

    let mut series = SeasonSeries::new();
    for season_id in &season_ids {
        let records = catalog.season_episodes(canonical_id, season_id).await?;
        if records.is_empty() {
            return Err(GraphError::not_found(format!(
                "Season {season_id} of {canonical_id} lists no episodes"
            )));
        }

        let listed = records.len();
        let mut kept = 0usize;
        for rating in records.into_iter().filter_map(qualify) {
            series.push(rating.season, rating.rating);
            kept += 1;
        }
        debug!(canonical_id, season_id, listed, kept, "collected season");
    }

    if series.is_empty() {
        return Err(GraphError::not_found(format!(
            "Series {canonical_id} has no rated episodes yet"
        )));
    }

    info!(
        canonical_id,
        seasons = series.len(),
        episodes = series.total_episodes(),
        "collected ratings"
    );
    Ok(series)
}

/// Specials (episode number below 1), unaired and not-yet-rated episodes are
/// omissions, not errors.
fn qualify(record: EpisodeRecord) -> Option<EpisodeRating> {
    let season = record.season.filter(|season| *season >= 1)?;
    let episode_number = u32::try_from(record.episode_number)
        .ok()
        .filter(|number| *number >= 1)?;
    let RatingCell::Score(rating) = record.rating else {
        return None;
    };

    Some(EpisodeRating {
        season,
        episode_number,
        rating,
        title: record.title,
        link: record.link,
    })
}
