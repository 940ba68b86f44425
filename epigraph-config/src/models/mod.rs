pub mod sources;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::loader::ConfigLoadError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Externally reachable base of this service, used to build chart links.
    pub public_base_url: Option<Url>,
    pub catalog: CatalogConfig,
    pub renderer: RendererConfig,
    pub cache: CacheConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Serving without a public base URL would post dead links, so the
    /// server refuses to start instead.
    pub fn require_public_base_url(&self) -> Result<&Url, ConfigLoadError> {
        self.public_base_url
            .as_ref()
            .ok_or(ConfigLoadError::MissingKey {
                key: "PUBLIC_BASE_URL",
            })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    /// Applied to every outbound request, including the image service.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartBackend {
    Plotly,
    Bitmap,
}

impl ChartBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plotly => "plotly",
            Self::Bitmap => "bitmap",
        }
    }
}

impl FromStr for ChartBackend {
    type Err = ConfigLoadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plotly" => Ok(Self::Plotly),
            "bitmap" => Ok(Self::Bitmap),
            _ => Err(ConfigLoadError::UnknownBackend {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RendererConfig {
    Plotly(PlotlySettings),
    Bitmap(BitmapSettings),
}

impl RendererConfig {
    pub fn backend(&self) -> ChartBackend {
        match self {
            Self::Plotly(_) => ChartBackend::Plotly,
            Self::Bitmap(_) => ChartBackend::Bitmap,
        }
    }
}

#[derive(Clone)]
pub struct PlotlySettings {
    pub username: String,
    pub api_key: String,
    pub endpoint: Url,
}

impl fmt::Debug for PlotlySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotlySettings")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BitmapSettings {
    pub font_path: PathBuf,
    pub bold_font_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of rendered charts kept in memory.
    pub capacity: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
