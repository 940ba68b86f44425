use std::sync::Arc;

use anyhow::{Context, Result};
use epigraph_config::{Config, RendererConfig};
use epigraph_core::chart::{FontSource, PlotlyCredentials};
use epigraph_core::{
    BitmapRenderer, ChartCache, ChartRenderer, GraphPipeline, ImdbCatalog,
    PlotlyRenderer,
};
use tracing::info;

use crate::infra::app_state::AppState;
use crate::slack::dispatcher::CallbackDispatcher;

/// Catalog client plus the configured renderer, with credentials bound once.
pub fn build_pipeline(config: &Config) -> Result<GraphPipeline> {
    let catalog = ImdbCatalog::new(
        config.catalog.base_url.clone(),
        config.catalog.timeout,
    )
    .context("failed to build catalog client")?;

    let renderer: Arc<dyn ChartRenderer> = match &config.renderer {
        RendererConfig::Plotly(plotly) => Arc::new(
            PlotlyRenderer::new(
                plotly.endpoint.clone(),
                PlotlyCredentials::new(&plotly.username, &plotly.api_key),
                config.catalog.timeout,
            )
            .context("failed to build plotly renderer")?,
        ),
        RendererConfig::Bitmap(bitmap) => Arc::new(
            BitmapRenderer::new(&FontSource {
                regular: bitmap.font_path.clone(),
                bold: bitmap.bold_font_path.clone(),
            })
            .context("failed to load chart fonts")?,
        ),
    };

    info!(
        catalog = %config.catalog.base_url,
        backend = renderer.backend(),
        "chart pipeline ready"
    );
    Ok(GraphPipeline::new(Arc::new(catalog), renderer))
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let public_base_url = config.require_public_base_url()?.clone();
    let pipeline = build_pipeline(config)?;
    let charts = Arc::new(ChartCache::new(pipeline, config.cache.capacity));

    let http = reqwest::Client::builder()
        .timeout(config.catalog.timeout)
        .build()
        .context("failed to build callback client")?;
    let callbacks = CallbackDispatcher::new(charts.clone(), http, public_base_url)?;

    Ok(AppState::new(charts, callbacks))
}
