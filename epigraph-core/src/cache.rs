use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use moka::future::Cache;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::GraphPipeline;

/// Rendered charts live this long after creation, regardless of reads.
pub const CHART_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Per-title memo of the full pipeline output.
///
/// Keys are the raw requested titles, so `"Dark"` and `"dark"` are separate
/// entries. Concurrent misses for the same title may both run the pipeline;
/// each insert replaces the whole value. Failures are never stored.
pub struct ChartCache {
    pipeline: GraphPipeline,
    entries: Cache<String, Bytes>,
}

impl fmt::Debug for ChartCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartCache")
            .field("pipeline", &self.pipeline)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl ChartCache {
    pub fn new(pipeline: GraphPipeline, capacity: u64) -> Self {
        Self::with_ttl(pipeline, capacity, CHART_TTL)
    }

    pub fn with_ttl(pipeline: GraphPipeline, capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { pipeline, entries }
    }

    pub fn pipeline(&self) -> &GraphPipeline {
        &self.pipeline
    }

    pub async fn get_or_render(&self, title: &str) -> Result<Bytes> {
        if let Some(png) = self.entries.get(title).await {
            debug!(title, bytes = png.len(), "chart cache hit");
            return Ok(png);
        }

        debug!(title, "chart cache miss");
        let png = self.pipeline.run(title).await?;
        self.entries.insert(title.to_string(), png.clone()).await;
        Ok(png)
    }

    pub async fn contains(&self, title: &str) -> bool {
        self.entries.get(title).await.is_some()
    }

    /// Flush pending maintenance and report how many charts are held.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
