//! Command line and environment configuration.
//!
//! Every option can be given as a flag or through the environment; a `.env` file in the
//! working directory is loaded before parsing.

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};

/// Which storage engine backs the gateway.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// MongoDB at `DATABASE_URL`.
    Mongodb,
    /// Process-local store; data is lost on exit.
    Memory,
}

/// Culinary educational backend API
#[derive(Parser, Debug, Clone)]
#[command(name = "culinary")]
#[command(about = "Backend API for recipes, lessons, ads, videos and contact details")]
pub struct Args {
    /// Database connection string. Without it the API starts but every store route
    /// answers 503.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name
    #[arg(long, env = "DATABASE_NAME", default_value = "culinary")]
    pub database_name: String,

    /// Storage engine
    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreKind::Mongodb)]
    pub store: StoreKind,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Log level for this service (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "culinary",
            "--database-url",
            "mongodb://db:27017",
            "--store",
            "memory",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(args.database_url.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(args.store, StoreKind::Memory);
        assert_eq!(args.listen_addr().port(), 9000);
    }
}
