use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::info;

use crate::catalog::Catalog;
use crate::chart::{ChartRenderer, render_chart};
use crate::collector::collect;
use crate::error::Result;
use crate::resolver::resolve;

/// Resolve → collect → render, with no caching of its own.
#[derive(Clone)]
pub struct GraphPipeline {
    catalog: Arc<dyn Catalog>,
    renderer: Arc<dyn ChartRenderer>,
}

impl fmt::Debug for GraphPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphPipeline")
            .field("renderer", &self.renderer.backend())
            .finish_non_exhaustive()
    }
}

impl GraphPipeline {
    pub fn new(catalog: Arc<dyn Catalog>, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { catalog, renderer }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn backend(&self) -> &'static str {
        self.renderer.backend()
    }

    pub async fn run(&self, title: &str) -> Result<Bytes> {
        let started = Instant::now();

        let matched = resolve(self.catalog.as_ref(), title).await?;
        let series = collect(self.catalog.as_ref(), &matched.canonical_id).await?;
        let png = render_chart(
            self.renderer.as_ref(),
            &matched.display_title,
            &series,
        )
        .await?;

        info!(
            title,
            canonical_id = %matched.canonical_id,
            backend = self.renderer.backend(),
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered ratings chart"
        );
        Ok(png)
    }
}
