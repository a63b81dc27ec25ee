// src/settings.rs
//! Process-wide configuration.
//!
//! Resolved once at startup and shared read-only with every request.
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. optional `did-web.toml` in the working directory
//! 3. process environment (populated from `.env` by `dotenv` beforehand)
//!
//! ## Keys
//! - `SOLID_URL`: POD container that receives uploads (required)
//! - `TOKEN_URL`, `SIGN_API_URL`, `CLIENT_ID`, `CLIENT_SECRET`: enable the
//!   signing flow when all four are set
//! - `DUMMY_PDF_PATH`: PDF submitted for signing (default `assets/dummy.pdf`)
//! - `LISTEN_HOST`, `PORT`: bind address (default `0.0.0.0:3001`)
//! - `HTTP_TIMEOUT_SECS`: deadline for each outbound call (default 30)
//! - `REQUEST_TIMEOUT_SECS`: deadline for a whole request (default 120)

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{key} is not a valid http(s) URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("signing is partially configured, missing: {}", .0.join(", "))]
    IncompleteSigning(Vec<&'static str>),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Everything the service reads from its environment.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub listen_host: String,
    pub port: u16,
    pub solid_url: String,
    pub token_url: Option<String>,
    pub sign_api_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub dummy_pdf_path: PathBuf,
    pub http_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

// Manual impl so the client secret never reaches the logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("listen_host", &self.listen_host)
            .field("port", &self.port)
            .field("solid_url", &self.solid_url)
            .field("token_url", &self.token_url)
            .field("sign_api_url", &self.sign_api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("dummy_pdf_path", &self.dummy_pdf_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// The subset of [`Settings`] the signing flow needs, all present.
#[derive(Clone)]
pub struct SigningSettings {
    pub token_url: String,
    pub sign_api_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub dummy_pdf_path: PathBuf,
}

impl Settings {
    /// Loads settings from `did-web.toml` (if present) and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::with_name("did-web").required(false))
            .add_source(Environment::default());
        Self::from_builder(builder)
    }

    /// Applies defaults under `builder`'s sources, then normalizes and
    /// validates the result.
    pub fn from_builder(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let mut settings: Settings = builder
            .set_default("listen_host", "0.0.0.0")?
            .set_default("port", 3001_i64)?
            .set_default("dummy_pdf_path", "assets/dummy.pdf")?
            .set_default("http_timeout_secs", 30_i64)?
            .set_default("request_timeout_secs", 120_i64)?
            .build()?
            .try_deserialize()?;

        // `TOKEN_URL=` in a .env file means "not set"
        for value in [
            &mut settings.token_url,
            &mut settings.sign_api_url,
            &mut settings.client_id,
            &mut settings.client_secret,
        ] {
            if value.as_deref().map_or(false, |v| v.trim().is_empty()) {
                *value = None;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        check_url("SOLID_URL", &self.solid_url)?;
        if let Some(url) = &self.token_url {
            check_url("TOKEN_URL", url)?;
        }
        if let Some(url) = &self.sign_api_url {
            check_url("SIGN_API_URL", url)?;
        }

        let missing: Vec<&'static str> = [
            ("TOKEN_URL", self.token_url.is_none()),
            ("SIGN_API_URL", self.sign_api_url.is_none()),
            ("CLIENT_ID", self.client_id.is_none()),
            ("CLIENT_SECRET", self.client_secret.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();
        if !missing.is_empty() && missing.len() < 4 {
            return Err(SettingsError::IncompleteSigning(missing));
        }

        if self.http_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout("HTTP_TIMEOUT_SECS"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout("REQUEST_TIMEOUT_SECS"));
        }
        Ok(())
    }

    /// Signing settings, or `None` when the service runs the basic flow.
    pub fn signing(&self) -> Option<SigningSettings> {
        Some(SigningSettings {
            token_url: self.token_url.clone()?,
            sign_api_url: self.sign_api_url.clone()?,
            client_id: self.client_id.clone()?,
            client_secret: self.client_secret.clone()?,
            dummy_pdf_path: self.dummy_pdf_path.clone(),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.port)
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), SettingsError> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(SettingsError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}
