use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "bridge.toml";

/// Anthropic Messages to `OpenAI` Chat Completions bridge
#[derive(Debug, Parser)]
#[command(
    name = "bridge",
    about = "Serve the Anthropic Messages API on top of an OpenAI-compatible backend"
)]
pub struct Args {
    /// Path to configuration file [default: bridge.toml, optional]
    #[arg(short, long, env = "BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "BRIDGE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the backend base URL
    #[arg(long, env = "BRIDGE_BACKEND_URL")]
    pub backend_url: Option<Url>,
}
