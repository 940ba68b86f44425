use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::layout::{
    CANVAS_HEIGHT, CANVAS_WIDTH, ChartSpec, MARKER_SIZE, X_AXIS_LABEL,
    Y_AXIS_LABEL, Y_TICK_STEP,
};
use super::{ChartRenderer, PNG_SIGNATURE};
use crate::error::{GraphError, Result};

pub const DEFAULT_PLOTLY_IMAGE_URL: &str = "https://api.plot.ly/v2/images";

// Pushes the y tick labels away from the axis line.
const Y_TICK_PREFIX: &str = "          ";

/// Account used to sign requests to the image-export service.
#[derive(Clone)]
pub struct PlotlyCredentials {
    username: String,
    api_key: String,
}

impl PlotlyCredentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for PlotlyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotlyCredentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Renders through Plotly's remote image-export endpoint.
///
/// Credentials are handed over once at construction and reused for every
/// request.
pub struct PlotlyRenderer {
    http: reqwest::Client,
    endpoint: Url,
    credentials: PlotlyCredentials,
}

impl fmt::Debug for PlotlyRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotlyRenderer")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl PlotlyRenderer {
    pub fn new(
        endpoint: Url,
        credentials: PlotlyCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                GraphError::render(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    /// The figure document the service expects.
    pub fn figure(spec: &ChartSpec) -> Value {
        let data: Vec<Value> = spec
            .plots()
            .iter()
            .map(|plot| {
                json!({
                    "type": "scatter",
                    "mode": "lines+markers",
                    "name": plot.name,
                    "x": plot.x,
                    "y": plot.y,
                    "marker": { "size": MARKER_SIZE },
                })
            })
            .collect();

        let (x_min, x_max) = spec.x_range();
        let (y_min, y_max) = spec.y_range();

        json!({
            "data": data,
            "layout": {
                "title": format!("<b>{}</b>", escape_markup(&spec.title())),
                "yaxis": {
                    "title": Y_AXIS_LABEL,
                    "range": [y_min, y_max],
                    "tickmode": "linear",
                    "tick0": y_min,
                    "dtick": Y_TICK_STEP,
                    "tickformat": ".1f",
                    "tickprefix": Y_TICK_PREFIX,
                },
                "xaxis": {
                    "title": X_AXIS_LABEL,
                    "range": [x_min, x_max],
                    "tickmode": "array",
                    "tickvals": spec.x_ticks(),
                    "showgrid": false,
                },
                "margin": { "l": 100, "pad": 10 },
                "showlegend": false,
                "width": CANVAS_WIDTH,
                "height": CANVAS_HEIGHT,
            },
        })
    }
}

#[async_trait]
impl ChartRenderer for PlotlyRenderer {
    async fn render(&self, spec: &ChartSpec) -> Result<Bytes> {
        let body = json!({
            "figure": Self::figure(spec),
            "format": "png",
            "width": CANVAS_WIDTH,
            "height": CANVAS_HEIGHT,
        });

        debug!(
            endpoint = %self.endpoint,
            series = spec.plots().len(),
            episodes = spec.total_episodes(),
            "requesting chart image"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.api_key))
            .header("Plotly-Client-Platform", "rust")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                GraphError::render(format!("image service unreachable: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "image service rejected the figure");
            return Err(GraphError::render(format!(
                "image service returned HTTP {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response.bytes().await.map_err(|err| {
            GraphError::render(format!("image download failed: {err}"))
        })?;
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(GraphError::render("image service did not return a PNG"));
        }

        Ok(bytes)
    }

    fn backend(&self) -> &'static str {
        "plotly"
    }
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
