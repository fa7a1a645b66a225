use clap::Parser;

use crate::config::{normalize_base, normalize_prefix, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "sirius-user-management")]
#[command(about = "Admin front end for managing Sirius users and teams")]
#[command(version)]
pub struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Path to mount every route under (overrides PREFIX)")]
    pub prefix: Option<String>,

    #[arg(long, help = "Sirius base URL for API calls (overrides SIRIUS_URL)")]
    pub sirius_url: Option<String>,

    #[arg(long, help = "Sirius URL browsers are sent to (overrides SIRIUS_PUBLIC_URL)")]
    pub sirius_public_url: Option<String>,
}

impl Args {
    /// Apply command-line flags on top of `config`.
    pub fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(prefix) = self.prefix {
            config.server.prefix = normalize_prefix(&prefix);
        }
        if let Some(url) = self.sirius_url {
            // The public URL follows the API URL unless it was set separately.
            let follows_api = config.sirius.public_url == config.sirius.url;
            config.sirius.url = normalize_base(&url);
            if follows_api {
                config.sirius.public_url = config.sirius.url.clone();
            }
        }
        if let Some(url) = self.sirius_public_url {
            config.sirius.public_url = normalize_base(&url);
        }
        config
    }
}
