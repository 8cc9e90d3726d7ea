//! RFC 5322 mailbox parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::{Error, Result};

// `Display Name <local@domain>`. A quoted name must be closed; an unquoted
// phrase may not contain `@`, `,` or `;`.
static NAME_ADDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:"(?P<quoted>(?:[^"\\]|\\.)*)"|(?P<plain>[^"<>@,;]*?))\s*<(?P<addr>[^<>\s]+)>$"#,
    )
    .expect("mailbox pattern compiles")
});

/// A validated mailbox: either a bare `addr-spec` or a `name-addr`.
///
/// Construction is the only place validation happens, so holding an
/// `EmailAddress` means the address already passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    mailbox: String,
    addr_spec: String,
    display_name: Option<String>,
}

impl EmailAddress {
    /// Parse a mailbox such as `john@example.com` or `John Doe <john@example.com>`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAddress`] when the input is empty, has unbalanced
    /// angle brackets, or the address part is not a valid email address.
    pub fn parse(input: &str) -> Result<Self> {
        let mailbox = input.trim();
        if mailbox.is_empty() {
            return Err(Error::invalid_address(input, "address is empty"));
        }

        let (addr_spec, display_name) = if mailbox.contains(['<', '>']) {
            let caps = NAME_ADDR
                .captures(mailbox)
                .ok_or_else(|| Error::invalid_address(input, "malformed name-addr"))?;
            let name = caps
                .name("quoted")
                .or_else(|| caps.name("plain"))
                .map(|m| m.as_str().trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            (caps["addr"].to_string(), name)
        } else {
            (mailbox.to_string(), None)
        };

        if !addr_spec.validate_email() {
            return Err(Error::invalid_address(input, "not an RFC 5322 addr-spec"));
        }

        Ok(Self {
            mailbox: mailbox.to_string(),
            addr_spec,
            display_name,
        })
    }

    /// Build `"First Last <email>"` and validate it.
    pub fn with_full_name(first: &str, last: &str, email: &str) -> Result<Self> {
        Self::parse(&format!("{first} {last} <{email}>"))
    }

    /// The mailbox as it was given (trimmed).
    pub fn as_str(&self) -> &str {
        &self.mailbox
    }

    /// The `local@domain` part.
    pub fn addr_spec(&self) -> &str {
        &self.addr_spec
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mailbox)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.mailbox
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.mailbox
    }
}
