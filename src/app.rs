use reqwest::Client;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::api::{self, ApiClient};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::extract::extract_text;
use crate::output::save_response;
use crate::prompt::ask;

/// Drives one run: load the key, get a prompt, call the API, show the
/// extracted text and save it.
pub struct App {
    config: Config,
    http: Client,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let http = api::http_client(&config)?;
        Ok(Self::with_http_client(config, http))
    }

    pub fn with_http_client(config: Config, http: Client) -> Self {
        App { config, http }
    }

    /// Runs every step in order, asking on `input` for anything the
    /// command line didn't supply. User-facing text goes to `output`.
    ///
    /// Stops at the first failure; nothing is written to disk unless the API
    /// call succeeded.
    pub async fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let api_key = self.config.resolve_api_key()?;

        let prompt = match &self.config.prompt {
            Some(p) => p.clone(),
            None => ask(input, output, "Enter your prompt: ")?,
        };
        tracing::debug!(chars = prompt.chars().count(), "prompt ready");

        let client = ApiClient::new(self.http.clone(), self.config.clone(), api_key);
        let raw = client.generate(&prompt).await?;
        let text = extract_text(&raw);

        writeln!(output, "Response from Gemini: \n{text}").map_err(AppError::Console)?;

        let path = match &self.config.output {
            Some(p) => p.clone(),
            None => PathBuf::from(ask(
                input,
                output,
                "Enter file path to save the response: ",
            )?),
        };

        save_response(&text, &path)?;
        writeln!(output, "Response saved to {}", path.display()).map_err(AppError::Console)?;
        Ok(())
    }
}
