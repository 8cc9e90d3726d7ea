//! Form-parameter builders for write requests.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::address::EmailAddress;
use crate::{Error, Result};

/// Form fields of a write request, keyed by Mailgun parameter name.
pub type Parameters = BTreeMap<String, String>;

const HEADER_PREFIX: &str = "h:";
const VAR_PREFIX: &str = "v:";

pub(crate) const ADDRESS_KEY: &str = "address";
pub(crate) const NAME_KEY: &str = "name";
pub(crate) const SUBSCRIBED_KEY: &str = "subscribed";
pub(crate) const VARS_KEY: &str = "vars";

fn prefixed(name: &str, prefix: &str) -> String {
    if name.starts_with(prefix) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

fn recipient_list<I, S>(recipients: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = recipients
        .into_iter()
        .map(|r| EmailAddress::parse(r.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    if parsed.is_empty() {
        return Err(Error::invalid_address("", "no recipients given"));
    }
    Ok(parsed
        .iter()
        .map(EmailAddress::as_str)
        .collect::<Vec<_>>()
        .join(","))
}

/// Parameters of a `POST /{domain}/messages` call.
///
/// Setters that take addresses validate them and fail immediately.
///
/// # Examples
/// ```
/// # fn main() -> Result<(), mailgun_manager::Error> {
/// use mailgun_manager::EmailRequest;
///
/// let request = EmailRequest::new()
///     .from("Excited User <mailgun@example.com>")?
///     .to(["alice@example.com", "bob@example.com"])?
///     .subject("Hello")
///     .text("Testing some Mailgun awesomeness!")
///     .header("X-Source", "docs");
///
/// assert_eq!(request.parameters()["to"], "alice@example.com,bob@example.com");
/// assert_eq!(request.parameters()["h:X-Source"], "docs");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailRequest {
    parameters: Parameters,
}

impl EmailRequest {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn from(self, from: &str) -> Result<Self> {
        let from = EmailAddress::parse(from)?;
        Ok(self.set("from", from))
    }

    /// Sender as `"First Last <email>"`.
    pub fn from_full_name(self, first: &str, last: &str, email: &str) -> Result<Self> {
        let from = EmailAddress::with_full_name(first, last, email)?;
        Ok(self.set("from", from))
    }

    /// Recipients, joined with commas.
    pub fn to<I, S>(self, recipients: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let to = recipient_list(recipients)?;
        Ok(self.set("to", to))
    }

    pub fn to_full_name(self, first: &str, last: &str, email: &str) -> Result<Self> {
        let to = EmailAddress::with_full_name(first, last, email)?;
        Ok(self.set("to", to))
    }

    pub fn cc<I, S>(self, recipients: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cc = recipient_list(recipients)?;
        Ok(self.set("cc", cc))
    }

    pub fn bcc<I, S>(self, recipients: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bcc = recipient_list(recipients)?;
        Ok(self.set("bcc", bcc))
    }

    pub fn reply_to(self, reply_to: &str) -> Result<Self> {
        let reply_to = EmailAddress::parse(reply_to)?;
        Ok(self.set("h:Reply-To", reply_to))
    }

    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.set("subject", subject)
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.set("text", text)
    }

    pub fn html(self, html: impl Into<String>) -> Self {
        self.set("html", html)
    }

    /// Custom MIME header; `h:` is prepended unless already present.
    pub fn header(self, name: &str, value: impl Into<String>) -> Self {
        self.set(prefixed(name, HEADER_PREFIX), value)
    }

    /// Custom JSON variable; `v:` is prepended unless already present.
    pub fn json_var(self, name: &str, json: impl Into<String>) -> Self {
        self.set(prefixed(name, VAR_PREFIX), json)
    }

    /// Like [`EmailRequest::json_var`], serialising `value` first.
    pub fn var<T: Serialize>(self, name: &str, value: &T) -> Result<Self> {
        let json = serde_json::to_string(value)?;
        Ok(self.json_var(name, json))
    }

    /// Tag the message with a campaign id (`o:campaign`).
    pub fn campaign(self, campaign_id: impl Into<String>) -> Self {
        self.set("o:campaign", campaign_id)
    }

    /// `o:testmode`: Mailgun accepts the message but does not deliver it.
    pub fn test_mode(self, test_mode: bool) -> Self {
        self.set("o:testmode", test_mode.to_string())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Parameters of a list member create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMemberRequest {
    parameters: Parameters,
}

impl ListMemberRequest {
    /// Start a request for `address`, which must be a valid mailbox.
    ///
    /// A display name in the mailbox (`John <john@example.com>`) becomes the
    /// member name.
    pub fn new(address: &str) -> Result<Self> {
        let address = EmailAddress::parse(address)?;
        let mut parameters = Parameters::new();
        parameters.insert(ADDRESS_KEY.to_string(), address.addr_spec().to_string());
        if let Some(name) = address.display_name() {
            parameters.insert(NAME_KEY.to_string(), name.to_string());
        }
        Ok(Self { parameters })
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.parameters.insert(NAME_KEY.to_string(), name.into());
        self
    }

    pub fn subscribed(mut self, subscribed: bool) -> Self {
        self.parameters
            .insert(SUBSCRIBED_KEY.to_string(), subscribed.to_string());
        self
    }

    /// Member vars as a JSON document.
    pub fn vars_json(mut self, json: impl Into<String>) -> Self {
        self.parameters.insert(VARS_KEY.to_string(), json.into());
        self
    }

    pub fn vars<T: Serialize>(self, vars: &T) -> Result<Self> {
        let json = serde_json::to_string(vars)?;
        Ok(self.vars_json(json))
    }

    pub fn address(&self) -> &str {
        self.parameters
            .get(ADDRESS_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}
