//! # Epigraph Core
//!
//! Turns a free-text TV series title into a chart of its episode ratings.
//!
//! ## Overview
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`resolver`] finds the catalog identifier for a title.
//! 2. [`collector`] scrapes every season and keeps the rated episodes.
//! 3. [`chart`] lays the ratings out on a cumulative episode axis and renders
//!    a PNG through a [`chart::ChartRenderer`].
//!
//! [`pipeline::GraphPipeline`] composes the three steps and
//! [`cache::ChartCache`] memoizes its output per title for one hour.
//!
//! All catalog access goes through the [`catalog::Catalog`] trait so the
//! markup adapter can be replaced (or mocked) without touching the rules in
//! the collector.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod catalog;
pub mod chart;
pub mod collector;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod resolver;

pub use cache::{CHART_TTL, ChartCache, DEFAULT_CACHE_CAPACITY};
pub use catalog::{Catalog, ImdbCatalog};
pub use chart::{BitmapRenderer, ChartRenderer, ChartSpec, PlotlyRenderer};
pub use error::{ErrorKind, GraphError, Result};
pub use model::{EpisodeRating, EpisodeRecord, RatingCell, SeasonSeries, SeriesMatch};
pub use pipeline::GraphPipeline;
