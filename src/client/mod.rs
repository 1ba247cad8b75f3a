//! Client library: a protocol session over a pluggable transport

pub mod session;
pub mod transport;

pub use session::{AuthClient, ClientState};
pub use transport::{AuthTransport, HttpTransport};
