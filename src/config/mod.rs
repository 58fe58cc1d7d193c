use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

/// Command-line flags. No subcommands, no config file, no environment
/// variables.
#[derive(Parser, Debug)]
#[command(name = "mdserve", about = "Static file server with Markdown rendering")]
pub struct Cli {
    /// Listening ip
    #[arg(long, default_value = "0.0.0.0")]
    pub ip: String,

    /// Listening port
    #[arg(long, default_value_t = 80)]
    pub port: u16,

    /// Root directory to serve
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Process-wide configuration, immutable after startup.
#[derive(Debug)]
pub struct ServerConfig {
    /// Absolute path of the served root directory.
    pub root: PathBuf,
    pub ip: String,
    pub port: u16,
}

impl ServerConfig {
    /// Build the configuration from parsed flags, fixing the root to an
    /// absolute path. Fails if the root does not exist.
    pub fn from_cli(cli: Cli) -> Result<Self, io::Error> {
        let root = cli.root.canonicalize()?;
        Ok(Self {
            root,
            ip: cli.ip,
            port: cli.port,
        })
    }

    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> Result<SocketAddr, io::Error> {
        format!("{}:{}", self.ip, self.port)
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}
