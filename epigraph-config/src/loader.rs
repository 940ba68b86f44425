use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use epigraph_core::DEFAULT_CACHE_CAPACITY;
use epigraph_core::catalog::DEFAULT_CATALOG_URL;
use epigraph_core::chart::DEFAULT_PLOTLY_IMAGE_URL;
use thiserror::Error;
use url::Url;

use crate::constants::{
    DEFAULT_CONFIG_LOCATIONS, DEFAULT_HOST, DEFAULT_HTTP_TIMEOUT, DEFAULT_PORT,
};
use crate::models::sources::{EnvConfig, FileChartConfig, FileConfig};
use crate::models::{
    BitmapSettings, CacheConfig, CatalogConfig, ChartBackend, Config,
    ConfigMetadata, PlotlySettings, RendererConfig, ServerConfig,
};
use crate::validation::{self, ConfigWarnings};

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env` into the process environment, then compose the config
    /// from the file and the environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Compose from an already gathered environment, leaving the process
    /// environment untouched.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let config = compose_config(file_config, env, config_path)?;
        let warnings = validation::check(&config);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        // Recorded in the metadata; `main` logs it once tracing is up.
        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        public_base_url: file_public_base_url,
        server: file_server,
        catalog: file_catalog,
        chart: file_chart,
        cache: file_cache,
    } = file_config.unwrap_or_default();

    let port = match env.server_port.as_deref() {
        Some(raw) => parse_number::<u16>("SERVER_PORT", raw)?,
        None => file_server.port.unwrap_or(DEFAULT_PORT),
    };
    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
    };

    let public_base_url = env
        .public_base_url
        .or(file_public_base_url)
        .map(|raw| parse_url("PUBLIC_BASE_URL", &raw))
        .transpose()?;

    let catalog = CatalogConfig {
        base_url: parse_url(
            "CATALOG_BASE_URL",
            env.catalog_base_url
                .as_deref()
                .or(file_catalog.base_url.as_deref())
                .unwrap_or(DEFAULT_CATALOG_URL),
        )?,
        timeout: env
            .http_timeout
            .or(file_catalog.timeout)
            .map(|raw| parse_duration("HTTP_TIMEOUT", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT),
    };

    let renderer = compose_renderer(
        file_chart,
        env.chart_backend,
        env.plotly_username,
        env.plotly_api_key,
        env.plotly_image_url,
        env.chart_font_path,
        env.chart_bold_font_path,
    )?;

    let capacity = match env.chart_cache_capacity.as_deref() {
        Some(raw) => parse_number::<u64>("CHART_CACHE_CAPACITY", raw)?,
        None => file_cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
    };

    Ok(Config {
        server,
        public_base_url,
        catalog,
        renderer,
        cache: CacheConfig { capacity },
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    })
}

#[allow(clippy::too_many_arguments)]
fn compose_renderer(
    file: FileChartConfig,
    backend: Option<String>,
    plotly_username: Option<String>,
    plotly_api_key: Option<String>,
    plotly_image_url: Option<String>,
    font_path: Option<PathBuf>,
    bold_font_path: Option<PathBuf>,
) -> Result<RendererConfig, ConfigLoadError> {
    let backend = match backend.or(file.backend) {
        Some(raw) => raw.parse::<ChartBackend>()?,
        None => ChartBackend::Plotly,
    };

    match backend {
        ChartBackend::Plotly => {
            let username = plotly_username
                .or(file.plotly_username)
                .ok_or(ConfigLoadError::MissingKey {
                    key: "PLOTLY_USERNAME",
                })?;
            let api_key = plotly_api_key.or(file.plotly_api_key).ok_or(
                ConfigLoadError::MissingKey {
                    key: "PLOTLY_API_KEY",
                },
            )?;
            let endpoint = parse_url(
                "PLOTLY_IMAGE_URL",
                plotly_image_url
                    .as_deref()
                    .or(file.plotly_image_url.as_deref())
                    .unwrap_or(DEFAULT_PLOTLY_IMAGE_URL),
            )?;
            Ok(RendererConfig::Plotly(PlotlySettings {
                username,
                api_key,
                endpoint,
            }))
        }
        ChartBackend::Bitmap => {
            let font_path = font_path.or(file.font_path).ok_or(
                ConfigLoadError::MissingKey {
                    key: "CHART_FONT_PATH",
                },
            )?;
            Ok(RendererConfig::Bitmap(BitmapSettings {
                font_path,
                bold_font_path: bold_font_path.or(file.bold_font_path),
            }))
        }
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw).map_err(|source| ConfigLoadError::InvalidUrl { key, source })
}

fn parse_duration(
    key: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw)
        .map_err(|source| ConfigLoadError::InvalidDuration { key, source })
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    raw: &str,
) -> Result<T, ConfigLoadError> {
    raw.parse().map_err(|_| ConfigLoadError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("required setting {key} is not set")]
    MissingKey { key: &'static str },
    #[error("{key} is not a valid URL")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} is not a valid duration")]
    InvalidDuration {
        key: &'static str,
        #[source]
        source: humantime::DurationError,
    },
    #[error("{key} is not a valid number: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("unknown chart backend '{value}' (expected plotly or bitmap)")]
    UnknownBackend { value: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
