use crate::llm::{Provider, ProviderSettings};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
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

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("provider.base_url", "https://api.deepseek.com")?
            .set_default("provider.model", "deepseek-chat")?
            .set_default("log.json", false)?;

        // 2. Config file: explicit path must exist, ./config.* is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables (prefixed with TRADER_), e.g. TRADER_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("TRADER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Well-known provider variables
        if let Some(key) = env_non_empty("DEEPSEEK_API_KEY").or_else(|| env_non_empty("LLM_API_KEY"))
        {
            builder = builder.set_override("provider.api_key", key)?;
        }
        if let Some(url) = env_non_empty("LLM_BASE_URL") {
            builder = builder.set_override("provider.base_url", url)?;
        }
        if let Some(model) = env_non_empty("LLM_MODEL") {
            builder = builder.set_override("provider.model", model)?;
        }

        // 5. CLI flags (clap already folded in their env vars)
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Provider settings for the relay driver.
    pub fn provider_settings(&self) -> Result<ProviderSettings, config::ConfigError> {
        let base_url = self.provider.base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(config::ConfigError::Message(
                "provider.base_url cannot be empty".to_string(),
            ));
        }
        let model = self.provider.model.trim().to_string();
        if model.is_empty() {
            return Err(config::ConfigError::Message(
                "provider.model cannot be empty".to_string(),
            ));
        }

        Ok(ProviderSettings {
            provider: Provider::detect_from_url(&base_url),
            base_url,
            api_key: self
                .provider
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            model,
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
