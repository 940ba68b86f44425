//! Soft checks on a composed configuration.
//!
//! Hard failures are [`ConfigLoadError`](crate::ConfigLoadError)s; what ends
//! up here still lets the service start but is worth a line in the log.

use std::fmt;

use crate::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} ({hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub(crate) fn check(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.metadata.config_path.is_none() {
        warnings.push_with_hint(
            "No epigraph.toml detected; using environment variables only",
            "Set EPIGRAPH_CONFIG to point at a configuration file",
        );
    }

    if config.cache.capacity == 0 {
        warnings.push(
            "CHART_CACHE_CAPACITY is 0; every request renders a fresh chart",
        );
    }

    if let Some(base) = &config.public_base_url {
        if base.scheme() != "https" {
            warnings.push_with_hint(
                format!("PUBLIC_BASE_URL uses {}", base.scheme()),
                "Chat clients may refuse to unfurl images that are not served over HTTPS",
            );
        }
        if base.query().is_some() {
            warnings.push("PUBLIC_BASE_URL carries a query string that will be dropped");
        }
    }

    warnings
}
