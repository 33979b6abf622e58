//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing (entry point → path info → target URL)
//!     → request.rs (header rewrite) → upstream via reqwest
//!       or websocket.rs (upgrade) → upstream via tokio-tungstenite
//!     → response.rs (strip hop-by-hop headers, stream body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use response::ProxyError;
pub use server::{ProxyServer, ServerError};
