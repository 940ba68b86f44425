use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub chart: FileChartConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Human-readable duration such as `"10s"` or `"1500ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileChartConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plotly_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plotly_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plotly_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold_font_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
}

/// Environment-derived configuration values.
///
/// Values are kept as raw strings; the loader parses them so a malformed
/// value is reported instead of silently ignored. Blank variables count as
/// unset.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub public_base_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub http_timeout: Option<String>,
    pub chart_backend: Option<String>,
    pub plotly_username: Option<String>,
    pub plotly_api_key: Option<String>,
    pub plotly_image_url: Option<String>,
    pub chart_font_path: Option<PathBuf>,
    pub chart_bold_font_path: Option<PathBuf>,
    pub chart_cache_capacity: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            config_path: var("EPIGRAPH_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT"),
            public_base_url: var("PUBLIC_BASE_URL"),
            catalog_base_url: var("CATALOG_BASE_URL"),
            http_timeout: var("HTTP_TIMEOUT"),
            chart_backend: var("CHART_BACKEND"),
            plotly_username: var("PLOTLY_USERNAME"),
            plotly_api_key: var("PLOTLY_API_KEY"),
            plotly_image_url: var("PLOTLY_IMAGE_URL"),
            chart_font_path: var("CHART_FONT_PATH").map(PathBuf::from),
            chart_bold_font_path: var("CHART_BOLD_FONT_PATH")
                .map(PathBuf::from),
            chart_cache_capacity: var("CHART_CACHE_CAPACITY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn blank_variables_count_as_unset() {
        let vars = HashMap::from([
            ("SERVER_HOST", "   "),
            ("SERVER_PORT", " 8080 "),
            ("CHART_FONT_PATH", "/fonts/DejaVuSans.ttf"),
        ]);
        let env = EnvConfig::from_lookup(|key| {
            vars.get(key).map(|value| value.to_string())
        });

        assert_eq!(env.server_host, None);
        assert_eq!(env.server_port.as_deref(), Some("8080"));
        assert_eq!(
            env.chart_font_path,
            Some(PathBuf::from("/fonts/DejaVuSans.ttf"))
        );
        assert_eq!(env.plotly_api_key, None);
    }

    #[test]
    fn file_sections_are_optional() {
        let file: FileConfig = toml::from_str(
            r#"
            public_base_url = "https://graphs.example.com"

            [chart]
            backend = "bitmap"
            font_path = "/fonts/DejaVuSans.ttf"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.public_base_url.as_deref(),
            Some("https://graphs.example.com")
        );
        assert_eq!(file.chart.backend.as_deref(), Some("bitmap"));
        assert_eq!(file.server.port, None);
        assert_eq!(file.cache.capacity, None);
    }
}
