//! Server side of the protocol: the service, its configuration and the
//! HTTP surface in front of it.

pub mod auth_routes;
pub mod config;
pub mod http_server;
pub mod service;

pub use config::{load_server_config, ConfigError, ServerConfig};
pub use http_server::{configure_routes, AppState, AuthHttpServer};
pub use service::AuthService;
