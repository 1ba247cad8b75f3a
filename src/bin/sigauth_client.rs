use clap::Parser;
use log::info;
use sigauth::client::{AuthClient, HttpTransport};

/// Command line options for the demo client.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,

    /// Identifier to register under
    #[arg(long, default_value = "clientA")]
    client_id: String,

    /// Message to sign
    #[arg(long, default_value = "Hello from client A!")]
    message: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Runs both protocol scenarios against a server.
///
/// 1. Register a fresh key, sign a message, have the server verify it.
/// 2. Fetch the server public key, request a signed challenge and verify
///    it locally.
///
/// Each scenario is its own session, since a session takes only one branch
/// after registration.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    sigauth::logging::init(&cli.log_level).ok();

    let transport = HttpTransport::new(&cli.server_url);

    info!("Scenario 1: client signature verified by the server");
    let mut session = AuthClient::new(&cli.client_id, transport.clone());
    session.generate_keys()?;
    let registration = session.register().await?;
    println!("Register client public key: {:?}", registration);
    let outcome = session.sign_and_verify(&cli.message).await?;
    println!("Scenario 1 verify response for {}: {}", session.client_id(), outcome);

    info!("Scenario 2: server signature verified by the client");
    let mut session = AuthClient::new(&cli.client_id, transport);
    session.generate_keys()?;
    session.register().await?;
    if session.check_server_identity().await? {
        println!("Scenario 2: signature from server is VALID");
    } else {
        println!("Scenario 2: signature from server is INVALID");
    }

    Ok(())
}
