use crate::error::AppError;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Listener settings for a relay service.
///
/// Sourced from an optional `configuration` file overlaid with
/// `RELAY__`-prefixed environment variables (e.g. `RELAY__PORT`), after
/// `.env` loading. Port 0 asks the OS for an ephemeral port, which is how
/// the integration tests run.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

impl ListenConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let sources = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("RELAY").separator("__"))
            .build()?;

        Ok(sources.try_deserialize()?)
    }

    /// The address the relay binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
