use crate::{config::Config, errors::AppError, types::LogLevel};
use anyhow::{Error, Result};
use clap::{CommandFactory, Parser};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use twelf::{Layer, config};

pub const DEFAULT_MORALIS_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2/";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

static SHOULD_SKIP_SERIALIZNG_FIELDS: AtomicBool = AtomicBool::new(false);

fn should_skip_serializng_fields<T>(_: &T) -> bool {
    SHOULD_SKIP_SERIALIZNG_FIELDS.load(Ordering::SeqCst)
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(author,
          name = "history-proxy",
          bin_name = "history-proxy",
          version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_REVISION"), ")"),
          about,
          long_about = None)]
#[config]
pub struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    pub server_address: IpAddr,

    #[arg(long, default_value = "3000")]
    pub server_port: u16,

    /// Maximum number of requests served at once
    #[arg(long, default_value = "1024")]
    pub server_concurrency_limit: usize,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Moralis API key, falls back to the MORALIS_API_KEY environment variable
    #[arg(long)]
    pub moralis_api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_MORALIS_BASE_URL)]
    pub moralis_base_url: String,

    /// Timeout for each Moralis request
    #[arg(long, default_value = "10")]
    pub upstream_timeout_sec: u64,

    /// Comma-separated list of origins allowed by CORS, `*` allows any
    #[arg(long, default_value = DEFAULT_CORS_ORIGINS)]
    pub cors_origins: String,

    #[arg(long)]
    pub no_metrics: bool,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    #[serde(default)]
    init: bool,

    #[arg(long, help = "Path to an existing configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    config: Option<PathBuf>,
}

fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history-proxy")
        .join("config.toml")
}

impl Args {
    fn parse_args(config_path: &Path) -> Result<Args, AppError> {
        const ENV_PREFIX: &str = "HISTORY_PROXY_";

        let matches = Self::command().get_matches();

        let mut config_layers = vec![
            Layer::Env(Some(String::from(ENV_PREFIX))),
            Layer::Clap(matches),
        ];
        if config_path.exists() {
            config_layers.insert(0, Layer::Toml(config_path.to_path_buf()));
        }

        Self::with_layers(&config_layers).map_err(|e| match e {
            twelf::Error::Toml(_) => AppError::Config(format!(
                "Failed to parse config file '{}'",
                config_path.to_string_lossy()
            )),
            _ => AppError::Config(e.to_string()),
        })
    }

    /// Layers the config file, `HISTORY_PROXY_*` variables and CLI flags,
    /// in increasing priority.
    pub fn init() -> Result<Config, AppError> {
        let initial_args = Args::parse();
        let config_path = initial_args.config.unwrap_or_else(get_config_path);

        let arguments = Args::parse_args(&config_path)?;

        SHOULD_SKIP_SERIALIZNG_FIELDS.store(true, Ordering::SeqCst);

        if arguments.init {
            arguments
                .to_file(&config_path)
                .map_err(|e| AppError::Config(e.to_string()))?;
            println!("\nConfig has been written to {config_path:?}");

            std::process::exit(0);
        }

        Config::from_args(arguments)
    }

    fn to_file(&self, file_path: &Path) -> Result<()> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string(self).map_err(Error::new)?;
        let mut file = fs::File::create(file_path)?;
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }
}
