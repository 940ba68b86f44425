use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Probed in order when neither an explicit path nor `EPIGRAPH_CONFIG` is set.
pub const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["epigraph.toml", "config/epigraph.toml"];
