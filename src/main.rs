use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use healops::config::DashboardConfig;
use healops::source::{file::FileSource, http::HttpSource, IncidentSource};
use healops::view::{Route, ViewController};

#[derive(Parser)]
#[command(
    name = "healops",
    about = "Operations dashboard for ECS incident snapshots",
    version,
    long_about = None
)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true, env = "HEALOPS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server (poller + HTTP)
    Serve {
        /// Bind address
        #[arg(long)]
        bind: Option<String>,

        /// Upstream API base URL
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Render one view to stdout
    Render {
        /// View to render: dashboard, incidents or about
        #[arg(long, default_value = "incidents")]
        view: Route,

        /// Read the payload from a JSON file instead of the upstream API
        #[arg(long)]
        input: Option<PathBuf>,

        /// Upstream API base URL
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

/// Load the config with a scoped stderr subscriber, since the global one
/// depends on the config's logging section.
fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || match path {
        Some(path) => DashboardConfig::load(path),
        None => Ok(DashboardConfig::load_or_default()),
    })
}

fn init_tracing(config: &DashboardConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.logging.level))
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Commands::Serve { bind, upstream } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(upstream) = upstream {
                config.upstream.base_url = upstream;
            }
            tracing::info!(bind = %config.server.bind, "Starting HealOps dashboard");
            healops::serve(config).await?;
        }
        Commands::Render {
            view,
            input,
            upstream,
        } => {
            let source: Arc<dyn IncidentSource> = match input {
                Some(path) => Arc::new(FileSource::single(path)),
                None => {
                    if let Some(upstream) = upstream {
                        config.upstream.base_url = upstream;
                    }
                    let http = HttpSource::new(&config.upstream)
                        .context("failed to build HTTP client")?;
                    Arc::new(http)
                }
            };
            let controller = ViewController::new(source, config.view.max_rows);
            controller
                .refresh(view)
                .await
                .with_context(|| format!("failed to load {} view", view))?;
            println!("{}", controller.render(view).await);
        }
        Commands::ShowConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
