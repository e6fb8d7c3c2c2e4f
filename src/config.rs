use crate::search::text::TextSearchMode;

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub database_url: Option<String>,
    pub catalog_file: Option<PathBuf>,
    pub max_connections: u32,
    pub text_search: TextSearchMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            catalog_file: None,
            max_connections: 10,
            text_search: TextSearchMode::Auto,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            bind: try_load("LESSN_BIND", "127.0.0.1:3000")?,
            database_url: optional("DATABASE_URL"),
            catalog_file: optional("LESSN_CATALOG_FILE").map(PathBuf::from),
            max_connections: try_load("LESSN_DB_MAX_CONNECTIONS", "10")?,
            text_search: try_load("LESSN_TEXT_SEARCH", "auto")?,
        })
    }

    /// Applies `--bind <addr>` and `--catalog <path>` flags on top of the environment.
    pub fn apply_args(mut self, args: &[String]) -> anyhow::Result<Self> {
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = flag_value(args, i)?;
                    self.bind = value.parse()?;
                    i += 2;
                }
                "--catalog" => {
                    let value = flag_value(args, i)?;
                    self.catalog_file = Some(PathBuf::from(value));
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }
        Ok(self)
    }
}

fn flag_value(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", args[i]))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}"))
}
