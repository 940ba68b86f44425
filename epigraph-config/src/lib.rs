//! Configuration library for epigraph.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file is loaded into the environment
//! first). [`ConfigLoader`] produces a validated [`Config`] plus any
//! [`ConfigWarnings`] worth surfacing at startup.

pub mod constants;
pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    BitmapSettings, CacheConfig, CatalogConfig, ChartBackend, Config,
    ConfigMetadata, PlotlySettings, RendererConfig, ServerConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
