//! Startup configuration.
//!
//! The whole configuration surface is one flag. Parsed once in `main`,
//! immutable afterwards.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "defaultbackend", about = "Serves a 404 page for every request. Used as a default backend.")]
pub struct Config {
    /// Port number to serve the default backend 404 page.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl Config {
    /// Address the listener binds to (all interfaces, configured port).
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}
