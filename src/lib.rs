// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod credentials;
pub mod error;
pub mod metrics;
pub mod models;
pub mod perccli;
pub mod routes;

/// Package name and version, from Cargo.toml at build time.
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
