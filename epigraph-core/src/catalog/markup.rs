//! HTML → record parsers for the catalog's classic page layout.
//!
//! Every function here is pure and tolerant: rows it cannot read are either
//! skipped or reported with the most conservative [`RatingCell`]. Deciding
//! which rows count is the collector's job.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::model::{EpisodeRecord, RatingCell, SeriesMatch};

/// Search-listing categories that count as a series. Mini-series make up a
/// good part of the top rated TV chart.
pub const SERIES_CATEGORIES: [&str; 3] =
    ["TV Series", "TV Mini-Series", "TV Mini Series"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static RESULT_TEXT: LazyLock<Selector> =
    LazyLock::new(|| selector("table.findList td.result_text"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static SEASON_OPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("select#bySeason option"));
static EPISODE_ITEM: LazyLock<Selector> =
    LazyLock::new(|| selector("div.list_item"));
static EPISODE_NUMBER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[itemprop="episodeNumber"]"#));
static EPISODE_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[itemprop="name"]"#));
static EPISODE_LABEL: LazyLock<Selector> =
    LazyLock::new(|| selector("div.image div[data-const]"));
static RATING_WIDGET: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ipl-rating-widget"));
static RATING_STAR: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ipl-rating-widget > div.ipl-rating-star"));
static RATING_VALUE: LazyLock<Selector> =
    LazyLock::new(|| selector("span.ipl-rating-star__rating"));
static TOP_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("td.titleColumn a"));

static TITLE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/title/(tt\d+)").expect("static regex must compile")
});
static RESULT_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((TV [A-Za-z -]+)\)").expect("static regex must compile")
});
static SEASON_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"S(\d+),\s*Ep(-?\d+)").expect("static regex must compile")
});

/// Series hits from a search page, in listed order.
///
/// A row's category is the first `(TV ...)` group in its text; episode rows
/// also name their parent series further along.
pub fn parse_search_results(html: &str) -> Vec<SeriesMatch> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_TEXT)
        .filter_map(|cell| {
            if !is_series_row(&collapse(cell.text())) {
                return None;
            }
            let link = cell.select(&ANCHOR).next()?;
            let canonical_id = title_id(link.value().attr("href")?)?;
            let display_title = collapse(link.text());
            if display_title.is_empty() {
                return None;
            }
            Some(SeriesMatch {
                canonical_id,
                display_title,
            })
        })
        .collect()
}

pub fn parse_season_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&SEASON_OPTION)
        .filter_map(|option| {
            let id = match option.value().attr("value") {
                Some(value) => value.trim().to_string(),
                None => collapse(option.text()),
            };
            (!id.is_empty()).then_some(id)
        })
        .collect()
}

/// All episode rows on a season page.
///
/// `season` is the number the page was requested for; rows fall back to the
/// `S<n>, Ep<m>` label when it is unknown.
pub fn parse_episode_rows(html: &str, season: Option<u32>) -> Vec<EpisodeRecord> {
    let document = Html::parse_document(html);
    document
        .select(&EPISODE_ITEM)
        .map(|item| episode_record(item, season))
        .collect()
}

pub fn parse_top_titles(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOP_TITLE)
        .map(|link| collapse(link.text()))
        .filter(|title| !title.is_empty())
        .collect()
}

fn episode_record(item: ElementRef<'_>, season: Option<u32>) -> EpisodeRecord {
    let label = item
        .select(&EPISODE_LABEL)
        .next()
        .map(|node| collapse(node.text()))
        .unwrap_or_default();
    let label = SEASON_LABEL.captures(&label);

    let episode_number = item
        .select(&EPISODE_NUMBER)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(|content| content.trim().parse().ok())
        .or_else(|| label.as_ref()?.get(2)?.as_str().parse().ok())
        .unwrap_or(0);

    let season = season.or_else(|| label.as_ref()?.get(1)?.as_str().parse().ok());

    let name = item.select(&EPISODE_NAME).next();
    let title = name.map(|link| collapse(link.text())).unwrap_or_default();
    let link = name
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string);

    EpisodeRecord {
        season,
        episode_number,
        title,
        link,
        rating: rating_cell(item),
    }
}

fn rating_cell(item: ElementRef<'_>) -> RatingCell {
    if item.select(&RATING_WIDGET).next().is_none() {
        return RatingCell::Unaired;
    }

    let Some(star) = item.select(&RATING_STAR).next() else {
        return RatingCell::Placeholder;
    };
    if star
        .value()
        .classes()
        .any(|class| class == "ipl-rating-star--placeholder")
    {
        return RatingCell::Placeholder;
    }

    star.select(&RATING_VALUE)
        .next()
        .and_then(|value| collapse(value.text()).parse::<f64>().ok())
        .filter(|score| (0.0..=10.0).contains(score))
        .map_or(RatingCell::Placeholder, RatingCell::Score)
}

fn title_id(href: &str) -> Option<String> {
    TITLE_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

fn is_series_row(text: &str) -> bool {
    RESULT_CATEGORY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .is_some_and(|category| SERIES_CATEGORIES.contains(&category.as_str().trim()))
}

fn collapse<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
