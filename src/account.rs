//! Mailgun account settings.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

use crate::Result;

/// Name of the properties file looked up in the working directory.
pub const MAILGUN_PROPERTIES: &str = "mailgun.properties";

/// Mailgun's public API root.
pub const DEFAULT_BASE_URI: &str = "https://api.mailgun.net/v3";

/// Base URI, sending domain and the two API keys of a Mailgun account.
///
/// Immutable once built. API keys are kept as [`SecretString`] and never
/// printed by `Debug`.
///
/// Properties files use the keys `baseUri`, `domain`, `privateApiKey` and
/// `publicApiKey` (snake_case spellings are accepted too):
///
/// ```text
/// baseUri=https://api.mailgun.net/v3
/// domain=samples.mailgun.org
/// privateApiKey=key-3ax6xnjp29jd6fds4gc373sgvjxteol0
/// publicApiKey=pubkey-5ogiflzbnjrljiky49qxsiozqef5jxp7
/// ```
///
/// Only the `key=value` subset of the Java properties format is understood.
/// Comment lines may start with `#` or `!`. Whitespace-separated `key value`
/// pairs and `\` line continuations are not supported.
#[derive(Debug, Deserialize)]
pub struct Account {
    #[serde(rename = "baseUri", alias = "baseuri", alias = "base_uri")]
    base_uri: String,
    domain: String,
    #[serde(rename = "privateApiKey", alias = "privateapikey", alias = "private_api_key")]
    private_api_key: SecretString,
    #[serde(rename = "publicApiKey", alias = "publicapikey", alias = "public_api_key")]
    public_api_key: SecretString,
}

impl Account {
    pub fn new(
        base_uri: impl Into<String>,
        domain: impl Into<String>,
        private_api_key: impl Into<String>,
        public_api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_uri: base_uri.into(),
            domain: domain.into(),
            private_api_key: SecretString::new(private_api_key.into()),
            public_api_key: SecretString::new(public_api_key.into()),
        }
    }

    /// Load settings from a `key=value` properties file.
    ///
    /// All four keys must be present, otherwise loading fails.
    pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading mailgun properties");
        let properties = std::fs::read_to_string(path)?;
        Self::from_properties_str(&properties)
    }

    /// Parse settings from properties text.
    pub fn from_properties_str(properties: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(&strip_bang_comments(properties), FileFormat::Ini))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Read `MAILGUN_BASE_URI`, `MAILGUN_DOMAIN`, `MAILGUN_PRIVATE_API_KEY` and
    /// `MAILGUN_PUBLIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix("MAILGUN").prefix_separator("_"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Sending domain used in message and campaign paths.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn private_api_key(&self) -> &SecretString {
        &self.private_api_key
    }

    /// Key used for address validation.
    pub fn public_api_key(&self) -> &SecretString {
        &self.public_api_key
    }
}

// INI only knows `#` and `;` comments.
fn strip_bang_comments(properties: &str) -> String {
    properties
        .lines()
        .filter(|line| !line.trim_start().starts_with('!'))
        .collect::<Vec<_>>()
        .join("\n")
}
