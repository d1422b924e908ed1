// cloudev-api: Async Rust client for the cloud development service API

pub mod auth;
pub mod client;
pub mod error;
pub mod operation;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use operation::Operation;
pub use transport::{HttpTransport, Transport, TransportConfig};
pub use types::{PagedRequest, PagedResponse};
