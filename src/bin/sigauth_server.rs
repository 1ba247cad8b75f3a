use clap::Parser;
use log::info;
use sigauth::auth_server::{load_server_config, AuthHttpServer, AuthService};

/// Command line options for the authentication server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server, overrides the config file
    #[arg(long)]
    port: Option<u16>,

    /// Path to the server configuration file
    #[arg(long)]
    config: Option<String>,
}

/// Main entry point for the authentication server.
///
/// Generates the server key pair, which lives for the lifetime of the
/// process, and serves the HTTP API.
///
/// # Environment Variables
///
/// * `SIGAUTH_CONFIG` - Path to the configuration file (default: config/server_config.json)
/// * `RUST_LOG` - Log filter, overrides the configured level
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_server_config(cli.config.as_deref(), cli.port)?;
    sigauth::logging::init(&config.log_level).ok();
    info!("Starting sigauth server...");

    let service = AuthService::generate()?;
    info!("Server public key:\n{}", service.server_public_key());

    let server = AuthHttpServer::new(service, &config.listen_address());
    server.run().await?;

    Ok(())
}
