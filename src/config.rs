//! Configuration loading.
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! YAML config file (`--config` / `CONFIG_FILE`, falling back to
//! `./config.yaml` when present), `COURIER_*__*` environment variables,
//! then CLI flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::gateway::GatewaySettings;
use crate::session::DEFAULT_IDLE_TIMEOUT;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the remote messaging gateway
    #[arg(long, env = "GATEWAY_BASE_URL")]
    pub gateway_url: Option<String>,

    /// Disable the whole-request timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub resilience: ResilienceConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL the three gateway endpoints hang off.
    pub base_url: String,
}

impl GatewayConfig {
    /// Connection settings for the gateway client.
    #[must_use]
    pub fn settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.base_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Sessions idle longer than this are swept.
    pub idle_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("gateway.base_url", "http://127.0.0.1:8000")?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("session.idle_timeout_secs", DEFAULT_IDLE_TIMEOUT.as_secs())?;

        // Config file: explicit path is required to exist, the cwd fallback
        // is not.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // Environment variables, e.g. COURIER_SERVER__PORT=8000.
        builder = builder.add_source(
            Environment::with_prefix("COURIER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags win over everything else.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.gateway_url {
            builder = builder.set_override("gateway.base_url", url)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;

        // The gateway base URL must be absolute; catching it here beats a
        // reqwest builder error on the first submission.
        Url::parse(&cfg.gateway.base_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid gateway.base_url {:?}: {e}",
                cfg.gateway.base_url
            ))
        })?;

        Ok(cfg)
    }
}
