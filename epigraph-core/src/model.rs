use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Best search hit for a free-text title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMatch {
    pub canonical_id: String,
    pub display_title: String,
}

/// What the catalog shows in place of a score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingCell {
    /// No rating widget at all: the episode has not aired.
    Unaired,
    /// Widget present but no numeric score yet.
    Placeholder,
    Score(f64),
}

/// One episode row exactly as the markup adapter read it.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub season: Option<u32>,
    pub episode_number: i32,
    pub title: String,
    pub link: Option<String>,
    pub rating: RatingCell,
}

/// An episode that made it through the collector's filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRating {
    pub season: u32,
    pub episode_number: u32,
    pub rating: f64,
    pub title: String,
    pub link: Option<String>,
}

/// Ratings grouped by season, in broadcast order within each season.
///
/// Seasons only appear once a rating has been pushed for them, so every
/// present key maps to a non-empty sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonSeries {
    seasons: BTreeMap<u32, Vec<f64>>,
}

impl SeasonSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, season: u32, rating: f64) {
        self.seasons.entry(season).or_default().push(rating);
    }

    pub fn get(&self, season: u32) -> Option<&[f64]> {
        self.seasons.get(&season).map(Vec::as_slice)
    }

    /// Seasons in increasing season-number order.
    pub fn seasons(&self) -> impl Iterator<Item = (u32, &[f64])> {
        self.seasons
            .iter()
            .map(|(season, ratings)| (*season, ratings.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    pub fn total_episodes(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }
}

impl FromIterator<EpisodeRating> for SeasonSeries {
    fn from_iter<I: IntoIterator<Item = EpisodeRating>>(iter: I) -> Self {
        let mut series = Self::new();
        for episode in iter {
            series.push(episode.season, episode.rating);
        }
        series
    }
}
