//! REST connection abstraction over `reqwest`.
//!
//! A [`RestConnection`] is a value describing exactly one request: each builder
//! method consumes it and returns the refined value, and one of the `invoke_*`
//! methods performs the round trip. Nothing is shared between requests except
//! the underlying `reqwest::Client` pool.

use std::fmt;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::request::Parameters;
use crate::{Error, Result};

/// HTTP Basic username Mailgun expects alongside an API key.
pub const API_USER: &str = "api";

/// Media type every Mailgun routine negotiates.
pub const APPLICATION_JSON: &str = "application/json";

/// Class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFamily {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
    Other,
}

impl From<StatusCode> for StatusFamily {
    fn from(status: StatusCode) -> Self {
        match status.as_u16() {
            100..=199 => StatusFamily::Informational,
            200..=299 => StatusFamily::Successful,
            300..=399 => StatusFamily::Redirection,
            400..=499 => StatusFamily::ClientError,
            500..=599 => StatusFamily::ServerError,
            _ => StatusFamily::Other,
        }
    }
}

impl fmt::Display for StatusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusFamily::Informational => "INFORMATIONAL",
            StatusFamily::Successful => "SUCCESSFUL",
            StatusFamily::Redirection => "REDIRECTION",
            StatusFamily::ClientError => "CLIENT_ERROR",
            StatusFamily::ServerError => "SERVER_ERROR",
            StatusFamily::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Outcome of one HTTP round trip.
#[derive(Debug, Clone)]
pub struct RestResponse {
    status: StatusCode,
    body: Option<String>,
}

impl RestResponse {
    pub fn new(status: StatusCode, body: Option<String>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn family(&self) -> StatusFamily {
        self.status.into()
    }

    /// `true` for any 2xx status.
    pub fn success(&self) -> bool {
        self.family() == StatusFamily::Successful
    }

    /// Raw response text, `None` when the server sent no entity.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    /// [`Error::ResponseParse`] when there is no body, [`Error::Json`] when it is
    /// not JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| Error::ResponseParse(format!("empty response body ({})", self.status)))?;
        Ok(serde_json::from_str(body)?)
    }
}

/// Builder for one authenticated Mailgun request.
#[derive(Debug)]
pub struct RestConnection {
    http: reqwest::Client,
    base: Url,
    api_key: SecretString,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    form: Parameters,
    media_type: Option<String>,
}

impl RestConnection {
    /// Position a connection at `base_uri`, authenticating with `api_key`.
    ///
    /// # Errors
    /// [`Error::BaseUri`] when `base_uri` is not an absolute URL that can take
    /// path segments.
    pub fn connect(http: reqwest::Client, base_uri: &str, api_key: &SecretString) -> Result<Self> {
        let base = Url::parse(base_uri).map_err(|e| Error::BaseUri {
            base_uri: base_uri.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::BaseUri {
                base_uri: base_uri.to_string(),
                reason: "URI cannot take a path".to_string(),
            });
        }

        Ok(Self {
            http,
            base,
            api_key: SecretString::new(api_key.expose_secret().clone()),
            segments: Vec::new(),
            query: Vec::new(),
            form: Parameters::new(),
            media_type: None,
        })
    }

    /// Append `path` (split on `/`) to the target. `None` is a no-op.
    pub fn add_path<'a>(mut self, path: impl Into<Option<&'a str>>) -> Self {
        if let Some(path) = path.into() {
            debug!(path, "adding path");
            self.segments.extend(
                path.split('/')
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string),
            );
        }
        self
    }

    /// Add a query parameter. Skipped unless both name and value are present.
    pub fn add_query_param<'a>(
        mut self,
        name: impl Into<Option<&'a str>>,
        value: impl Into<Option<&'a str>>,
    ) -> Self {
        if let (Some(name), Some(value)) = (name.into(), value.into()) {
            debug!(name, value, "adding query param");
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Merge form fields into the request body. `None` is a no-op.
    pub fn add_form_params<'a>(mut self, params: impl Into<Option<&'a Parameters>>) -> Self {
        if let Some(params) = params.into() {
            self.form
                .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    /// Fix the negotiated media type. Required before any `invoke_*` call.
    pub fn configure_request(mut self, media_type: &str) -> Self {
        self.media_type = Some(media_type.to_string());
        self
    }

    /// Full target URL including path and query.
    pub fn target(&self) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| Error::BaseUri {
                base_uri: self.base.to_string(),
                reason: "URI cannot take a path".to_string(),
            })?;
            path.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    pub fn form(&self) -> &Parameters {
        &self.form
    }

    pub async fn invoke_get(&self) -> Result<RestResponse> {
        self.invoke(Method::GET, false).await
    }

    pub async fn invoke_delete(&self) -> Result<RestResponse> {
        self.invoke(Method::DELETE, false).await
    }

    /// POST the accumulated form parameters as `application/x-www-form-urlencoded`.
    pub async fn invoke_post(&self) -> Result<RestResponse> {
        self.invoke(Method::POST, true).await
    }

    /// PUT the accumulated form parameters as `application/x-www-form-urlencoded`.
    pub async fn invoke_put(&self) -> Result<RestResponse> {
        self.invoke(Method::PUT, true).await
    }

    async fn invoke(&self, method: Method, with_form: bool) -> Result<RestResponse> {
        let url = self.target()?;
        let media_type = self.media_type.as_deref().ok_or_else(|| Error::Unconfigured {
            uri: url.to_string(),
            target: format!("{method} {}", url.path()),
        })?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(API_USER, Some(self.api_key.expose_secret()))
            .header(ACCEPT, media_type);
        if with_form {
            request = request.form(&self.form);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = (!text.is_empty()).then_some(text);

        let family = StatusFamily::from(status);
        debug!(%method, %url, status = status.as_u16(), %family, "response received");
        Ok(RestResponse::new(status, body))
    }
}
