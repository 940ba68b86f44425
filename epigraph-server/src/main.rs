use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use epigraph_config::{Config, ConfigLoad, ConfigLoader};
use epigraph_server::create_app;
use epigraph_server::infra::startup::{build_pipeline, build_state};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "epigraph-server", version)]
#[command(about = "Charts the IMDb rating of every episode of a TV series")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one chart to a PNG file and exit
    Render {
        /// The title of the TV series
        title: String,

        /// Where to write the image
        #[arg(short, long, default_value = "graph.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    init_tracing();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "using configuration file");
    }
    for warning in warnings.iter() {
        warn!(%warning, "configuration warning");
    }

    if let Some(port) = cli.serve.port {
        config.server.port = port;
    }
    if let Some(host) = cli.serve.host {
        config.server.host = host;
    }

    match cli.command {
        Some(Command::Render { title, output }) => {
            render_once(&config, &title, &output).await
        }
        None => serve(&config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = build_state(config)?;
    let app = create_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        backend = config.renderer.backend().as_str(),
        cache_capacity = config.cache.capacity,
        "epigraph listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn render_once(
    config: &Config,
    title: &str,
    output: &Path,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;

    let png = match pipeline.run(title).await {
        Ok(png) => png,
        Err(err) => {
            error!(error = %err, title, "render failed");
            return Err(anyhow!(err.public_message()));
        }
    };

    tokio::fs::write(output, &png)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), bytes = png.len(), "chart written");
    Ok(())
}
