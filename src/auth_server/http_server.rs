use super::auth_routes;
use super::service::AuthService;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use log::info;
use std::io;
use std::net::TcpListener;
use std::sync::Arc;

/// HTTP server for the authentication service.
///
/// Exposes client key registration, signature verification, the server
/// public key and signed challenges as JSON endpoints.
pub struct AuthHttpServer {
    service: Arc<AuthService>,
    bind_address: String,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    pub service: Arc<AuthService>,
}

/// Register the API routes on an actix app
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(auth_routes::json_error_handler))
        .route(
            "/register_client_public_key",
            web::post().to(auth_routes::register_client_public_key),
        )
        .route("/verify", web::post().to(auth_routes::verify_signature))
        .route(
            "/server_public_key",
            web::get().to(auth_routes::get_server_public_key),
        )
        .route(
            "/generate_random_message",
            web::get().to(auth_routes::generate_random_message),
        )
        .route("/status", web::get().to(auth_routes::get_status));
}

impl AuthHttpServer {
    /// Create a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `service` - The service answering requests
    /// * `bind_address` - The address to bind to (e.g., "127.0.0.1:5000")
    pub fn new(service: AuthService, bind_address: &str) -> Self {
        Self {
            service: Arc::new(service),
            bind_address: bind_address.to_string(),
        }
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run(&self) -> io::Result<()> {
        let listener = TcpListener::bind(self.bind_address.as_str())?;
        self.serve(listener)?.await
    }

    /// Start serving on an already bound listener.
    ///
    /// The returned server must be awaited or spawned to accept connections.
    pub fn serve(&self, listener: TcpListener) -> io::Result<Server> {
        let local_addr = listener.local_addr()?;
        let app_state = web::Data::new(AppState {
            service: Arc::clone(&self.service),
        });

        let server = ActixHttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .configure(configure_routes)
        })
        .listen(listener)?
        .run();

        info!("HTTP server running on {}", local_addr);
        Ok(server)
    }
}
