use clap::Parser;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Parser)]
#[clap(
    name = "geminiscribe",
    version = "0.1.0",
    about = "A command-line tool to generate text with Gemini and save it to a file. Asks on STDIN for anything not supplied as an option."
)]
pub struct Config {
    #[clap(
        long,
        value_name = "PATH",
        help = "The KEY=VALUE file to read the API key from",
        default_value = ".env"
    )]
    pub env_file: PathBuf,

    #[clap(
        long,
        value_name = "NAME",
        help = "The name of the API key entry in the env file",
        default_value = "GEMINI_API_KEY"
    )]
    pub key_name: String,

    #[clap(
        long("key"),
        value_name = "API_KEY",
        help = "Sets the API key directly; if absent, the env file and then the environment are checked"
    )]
    pub api_key: Option<String>,

    #[clap(
        long("api"),
        value_name = "URL",
        help = "The API endpoint base URL to use.",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub api: String,

    #[clap(
        long("model"),
        value_name = "MODEL_ID",
        help = "Sets the model to use for generating content",
        default_value = "gemini-1.5-flash-latest"
    )]
    pub model_id: String,

    #[clap(
        long,
        value_name = "PROMPT",
        help = "Sets the prompt for the AI instead of asking on STDIN"
    )]
    pub prompt: Option<String>,

    #[clap(
        short('o'),
        long,
        value_name = "PATH",
        help = "Sets the file to save the response to instead of asking on STDIN"
    )]
    pub output: Option<PathBuf>,

    #[clap(
        long,
        value_name = "SECS",
        help = "Abort the request after this many seconds; by default it waits indefinitely"
    )]
    pub timeout: Option<u64>,

    #[clap(
        short('n'),
        long,
        value_name = "INT",
        help = "Sets the maximum number of tokens to generate"
    )]
    pub max_tokens: Option<u32>,

    #[clap(long, value_name = "F32", help = "Sets the temperature for sampling")]
    pub temp: Option<f32>,

    #[clap(
        long,
        value_name = "F32",
        help = "Include only the top tokens whose probabilities add up to P when sampling"
    )]
    pub top_p: Option<f32>,

    #[clap(
        long,
        value_name = "INT",
        help = "Include only this amount of top tokens when sampling"
    )]
    pub top_k: Option<u32>,

    #[clap(
        long,
        value_name = "INT",
        help = "The seed to use for the generation (determinism is not guaranteed)"
    )]
    pub seed: Option<i64>,

    #[clap(
        short('v'),
        long,
        help = "Write debug logging to STDERR",
        default_value_t = false
    )]
    pub verbose: bool,
}

impl Config {
    pub fn from_cli() -> Self {
        Config::parse()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Picks the API key from `--key`, then the env file, then the process
    /// environment. When nothing turns up, the env file's error is returned.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match load_api_key(&self.env_file, &self.key_name) {
            Ok(key) => Ok(key),
            Err(file_err) => match env::var(&self.key_name) {
                Ok(key) if !key.trim().is_empty() => {
                    tracing::debug!(
                        key_name = %self.key_name,
                        "key file unusable ({}), using the environment",
                        file_err
                    );
                    Ok(key.trim().to_string())
                }
                _ => Err(file_err),
            },
        }
    }
}

/// Reads `path` as `NAME=VALUE` lines and returns the value of the first
/// line starting with `key_name=`.
///
/// Only the text up to the next `=` is kept, so `KEY=abc=def` yields `abc`.
/// An empty value counts as not found.
pub fn load_api_key(path: &Path, key_name: &str) -> Result<String> {
    let file = File::open(path).map_err(|source| AppError::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let prefix = format!("{key_name}=");

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| AppError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(rest) = line.strip_prefix(&prefix) {
            let value = rest.split('=').next().unwrap_or_default().trim();
            if value.is_empty() {
                break;
            }
            tracing::debug!(path = %path.display(), key_name, "loaded API key");
            return Ok(value.to_string());
        }
    }

    tracing::debug!(path = %path.display(), key_name, "no usable API key line");
    Err(AppError::KeyNotFound {
        path: path.to_path_buf(),
    })
}
