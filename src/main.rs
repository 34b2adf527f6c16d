use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cert_header_proxy::config::{load_config, ProxyConfig};
use cert_header_proxy::config::validation::validate_config;
use cert_header_proxy::lifecycle::{startup, Shutdown};
use cert_header_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "cert-header-proxy")]
#[command(about = "Forward requests with mTLS client certificate status headers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        if let Err(errors) = validate_config(&config) {
            for e in errors {
                eprintln!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    }

    if cli.check {
        println!("configuration ok");
        return ExitCode::SUCCESS;
    }

    init_logging(&config.observability);
    tracing::info!("cert-header-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "Proxy failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
