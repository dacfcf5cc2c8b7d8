use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use wagate_session::{MessagingSession, noop::NoopSession};

#[derive(Parser)]
#[command(name = "wagate", about = "Wagate — WhatsApp REST gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Serve {
        /// Listen address; overrides the config file.
        #[arg(long)]
        bind: Option<String>,
        /// Listen port; overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the config file path in use (or the default).
    Path,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    match cli.command {
        Commands::Serve { bind, port } => {
            let config = wagate_config::discover_and_load();
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);

            // Session backends are pluggable; without one wired in, the
            // gateway serves its full surface but every send returns an
            // explanatory error.
            let session: Arc<dyn MessagingSession> = Arc::new(NoopSession::new());

            info!(%bind, port, "starting wagate gateway");
            wagate_gateway::start_gateway(&bind, port, config, session).await
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = wagate_config::discover_and_load();
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            },
            ConfigAction::Path => {
                println!("{}", wagate_config::find_or_default_config_path().display());
                Ok(())
            },
        },
    }
}
