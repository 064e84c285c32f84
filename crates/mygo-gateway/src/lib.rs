//! # mygo-gateway
//!
//! A blocking HTTP implementation of
//! [`BackendGateway`](mygo_core::traits::BackendGateway) that speaks the
//! dashboard backend's JSON API.
//!
//! ```rust,ignore
//! use std::path::Path;
//! use mygo_gateway::HttpGateway;
//!
//! let gateway = HttpGateway::from_file(Path::new("mygo.toml"))?;
//! // Pass `Box::new(gateway)` to `mygo_core::Orchestrator::new(...)`.
//! ```

pub mod config;
pub mod http;

pub use config::GatewayConfig;
pub use http::HttpGateway;
