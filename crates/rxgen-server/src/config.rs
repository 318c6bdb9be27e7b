//! Startup configuration.
//!
//! Read once from flags and environment (after loading `.env`) into an
//! [`AppConfig`] that is handed to the server. Nothing reads the environment
//! after startup.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use rxgen_llm::{BackendHandle, GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

#[derive(Parser, Debug, Clone)]
#[command(name = "rxgen-server")]
#[command(about = "Natural-language regex generation server")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Bind address
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fallback Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, hide = true)]
    pub google_api_key: Option<String>,

    /// Model used for every generation
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// Shared secret required to create profiles
    #[arg(long, env = "MASTER_PASS", hide_env_values = true)]
    pub master_pass: Option<String>,

    /// SQLite database file for profiles and query logs
    #[arg(long, env = "DATABASE_PATH", default_value = "rxgen.db")]
    pub database_path: PathBuf,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub gemini_base_url: String,
    pub master_pass: Option<String>,
    pub database_path: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            api_key: non_empty(cli.api_key).or_else(|| non_empty(cli.google_api_key)),
            model: cli.model,
            gemini_base_url: cli.gemini_base_url,
            master_pass: non_empty(cli.master_pass),
            database_path: cli.database_path,
            debug: cli.debug,
        }
    }

    /// Build the generation backend; disabled when no credential is set.
    pub fn backend(&self) -> BackendHandle {
        match &self.api_key {
            Some(api_key) => BackendHandle::configured(
                GeminiProvider::new(api_key.clone())
                    .with_base_url(self.gemini_base_url.clone())
                    .with_model(self.model.clone()),
            ),
            None => BackendHandle::Unconfigured,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("master_pass", &self.master_pass.as_ref().map(|_| "<redacted>"))
            .field("database_path", &self.database_path)
            .field("debug", &self.debug)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["rxgen-server"];
        argv.extend_from_slice(args);
        AppConfig::from_cli(Cli::try_parse_from(argv).expect("valid args"))
    }

    #[test]
    fn google_key_is_used_when_gemini_key_is_missing() {
        let config = parse(&["--google-api-key", "google"]);
        assert_eq!(config.api_key.as_deref(), Some("google"));

        let config = parse(&["--api-key", "gemini", "--google-api-key", "google"]);
        assert_eq!(config.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn blank_secrets_count_as_unset() {
        let config = parse(&["--api-key", " ", "--master-pass", ""]);
        assert!(config.api_key.is_none());
        assert!(config.master_pass.is_none());
        assert!(!config.backend().is_configured());
    }

    #[test]
    fn backend_uses_configured_model() {
        let config = parse(&["--api-key", "k", "--model", "gemini-1.5-flash"]);
        let backend = config.backend();
        assert_eq!(backend.generator().map(|g| g.model()), Some("gemini-1.5-flash"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = parse(&["--api-key", "super-secret-key", "--master-pass", "hunter2"]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
