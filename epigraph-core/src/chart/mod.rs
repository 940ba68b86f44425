//! Chart layout and PNG renderers.
//!
//! [`ChartSpec`] holds every layout decision; renderers only translate it into
//! their backend's vocabulary.

mod bitmap;
mod layout;
mod plotly;

pub use bitmap::{BitmapRenderer, FontSource};
pub use layout::{
    CANVAS_HEIGHT, CANVAS_WIDTH, ChartSpec, MARKER_SIZE, SeasonPlot,
    X_AXIS_LABEL, Y_AXIS_LABEL, Y_MAX, Y_MIN, Y_TICK_STEP,
};
pub use plotly::{DEFAULT_PLOTLY_IMAGE_URL, PlotlyCredentials, PlotlyRenderer};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::model::SeasonSeries;

/// First eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render `spec` to PNG bytes.
    async fn render(&self, spec: &ChartSpec) -> Result<Bytes>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

pub async fn render_chart(
    renderer: &dyn ChartRenderer,
    display_title: &str,
    series: &SeasonSeries,
) -> Result<Bytes> {
    let spec = ChartSpec::new(display_title, series);
    renderer.render(&spec).await
}
