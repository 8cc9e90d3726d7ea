//! Mailgun client facade and its builder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::account::{Account, MAILGUN_PROPERTIES};
use crate::campaigns::Campaigns;
use crate::lists::MailingLists;
use crate::members::ListMembers;
use crate::models::{Campaign, CampaignEvent, EmailValidation, ListInfo, ListMember};
use crate::request::{EmailRequest, ListMemberRequest};
use crate::routine::Routine;
use crate::sender::MailSender;
use crate::validation::AddressValidator;
use crate::{Error, Result};

/// Async client for the Mailgun HTTP API.
///
/// Holds one [`Account`] and one pooled HTTP client for its whole life. Use
/// [`Client::new`] to read `mailgun.properties` from the working directory,
/// [`Client::with_account`] for an explicit account, or [`Client::builder`]
/// for proxies, timeouts and a custom user agent.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    account: Account,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from `mailgun.properties` in the working directory.
    ///
    /// # Errors
    /// [`Error::Config`] when the file does not exist, [`Error::Settings`]
    /// when it is incomplete, [`Error::Io`] when it cannot be read.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Create a client for an explicit account.
    ///
    /// # Examples
    /// ```
    /// # fn main() -> Result<(), mailgun_manager::Error> {
    /// use mailgun_manager::{Account, Client};
    ///
    /// let account = Account::new(
    ///     "https://api.mailgun.net/v3",
    ///     "samples.mailgun.org",
    ///     "key-3ax6xnjp29jd6fds4gc373sgvjxteol0",
    ///     "pubkey-5ogiflzbnjrljiky49qxsiozqef5jxp7",
    /// );
    /// let client = Client::with_account(account)?;
    /// assert_eq!(client.account().domain(), "samples.mailgun.org");
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_account(account: Account) -> Result<Self> {
        ClientBuilder::new().account(account).build()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    fn routine(&self) -> Routine<'_> {
        Routine::new(&self.http, &self.account)
    }

    pub fn sender(&self) -> MailSender<'_> {
        MailSender::new(self.routine())
    }

    pub fn validator(&self) -> AddressValidator<'_> {
        AddressValidator::new(self.routine())
    }

    pub fn lists(&self) -> MailingLists<'_> {
        MailingLists::new(self.routine())
    }

    /// Member operations on the list with address `list_address`.
    pub fn members<'a>(&'a self, list_address: &'a str) -> ListMembers<'a> {
        ListMembers::new(self.routine(), list_address)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self.routine())
    }

    /// Send a message.
    ///
    /// # Returns
    /// `true` if Mailgun accepted the message.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_manager::{Client, EmailRequest};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_manager::Error> {
    /// let client = Client::new()?;
    /// let request = EmailRequest::new()
    ///     .from("Excited User <mailgun@samples.mailgun.org>")?
    ///     .to(["bar@example.com"])?
    ///     .subject("Hello")
    ///     .text("Testing some Mailgun awesomeness!");
    /// let accepted = client.send_message(&request).await?;
    /// println!("{accepted}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message(&self, request: &EmailRequest) -> Result<bool> {
        self.sender().send_message(request).await
    }

    /// Validate an address with Mailgun, using the public API key.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_manager::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_manager::Error> {
    /// let client = Client::new()?;
    /// let result = client.validate_address("foo@mailgun.net").await?;
    /// if let Some(suggestion) = &result.did_you_mean {
    ///     println!("did you mean {suggestion}?");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn validate_address(&self, address: &str) -> Result<EmailValidation> {
        self.validator().validate(address).await
    }

    /// All mailing lists of the account, `None` if Mailgun refused the call.
    pub async fn mailing_lists(&self) -> Result<Option<Vec<ListInfo>>> {
        self.lists().lists().await
    }

    pub async fn add_list_member(&self, list_address: &str, request: &ListMemberRequest) -> Result<bool> {
        self.members(list_address).add(request).await
    }

    /// Bulk-add members, split into uploads of at most
    /// [`MAX_MEMBERS_PER_CALL`](crate::MAX_MEMBERS_PER_CALL).
    pub async fn add_list_members<V: Serialize>(
        &self,
        list_address: &str,
        members: &[ListMember<V>],
    ) -> Result<bool> {
        self.members(list_address).add_many(members).await
    }

    pub async fn list_member(&self, list_address: &str, email: &str) -> Result<Option<ListMember>> {
        self.members(list_address).get(email).await
    }

    pub async fn list_members(&self, list_address: &str) -> Result<Option<Vec<ListMember>>> {
        self.members(list_address).list().await
    }

    /// Like [`Client::list_members`], with member vars converted into `V`.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_manager::Client;
    /// #[derive(serde::Deserialize)]
    /// struct Details {
    ///     city: String,
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_manager::Error> {
    /// let client = Client::new()?;
    /// let members = client
    ///     .list_members_as::<Details>("dev@samples.mailgun.org")
    ///     .await?
    ///     .unwrap_or_default();
    /// for member in &members {
    ///     if let Some(details) = member.vars() {
    ///         println!("{member}: {}", details.city);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_members_as<V: DeserializeOwned>(
        &self,
        list_address: &str,
    ) -> Result<Option<Vec<ListMember<V>>>> {
        self.members(list_address).list_as().await
    }

    pub async fn update_list_member(&self, list_address: &str, request: &ListMemberRequest) -> Result<bool> {
        self.members(list_address).update(request).await
    }

    pub async fn unsubscribe_list_member(&self, list_address: &str, email: &str) -> Result<bool> {
        self.members(list_address).unsubscribe(email).await
    }

    pub async fn delete_list_member(&self, list_address: &str, email: &str) -> Result<bool> {
        self.members(list_address).delete(email).await
    }

    pub async fn campaign(&self, campaign_id: &str) -> Result<Option<Campaign>> {
        self.campaigns().get(campaign_id).await
    }

    pub async fn campaign_events(&self, campaign_id: &str) -> Result<Option<Vec<CampaignEvent>>> {
        self.campaigns().events(campaign_id).await
    }

    /// Export a campaign's events as CSV into `dir`; see
    /// [`Campaigns::save_events_csv`].
    pub async fn save_campaign_events_csv(&self, campaign_id: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
        self.campaigns().save_events_csv(campaign_id, dir).await
    }
}

const USER_AGENT_VALUE: &str = concat!("mailgun-manager/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a Mailgun client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug)]
pub struct ClientBuilder {
    account: Option<Account>,
    properties_file: Option<PathBuf>,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Account read from `mailgun.properties` in the working directory
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - `mailgun-manager/<version>` user agent
    /// - No request timeout
    pub fn new() -> Self {
        Self {
            account: None,
            properties_file: None,
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            timeout: None,
        }
    }

    /// Use this account. Takes precedence over any properties file.
    pub fn account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Read the account from this properties file instead of
    /// `mailgun.properties` in the working directory.
    pub fn properties_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties_file = Some(path.into());
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Total timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn resolve_account(account: Option<Account>, properties_file: Option<PathBuf>) -> Result<Account> {
        if let Some(account) = account {
            return Ok(account);
        }
        if let Some(path) = properties_file {
            return Account::from_properties_file(path);
        }
        let default = Path::new(MAILGUN_PROPERTIES);
        if default.is_file() {
            return Account::from_properties_file(default);
        }
        warn!(path = MAILGUN_PROPERTIES, "no account configured");
        Err(Error::Config(format!(
            "no account given and no {MAILGUN_PROPERTIES} in the working directory"
        )))
    }

    /// Build the client.
    ///
    /// No network request is made; the account is resolved from the builder,
    /// then the configured properties file, then `mailgun.properties`.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::time::Duration;
    /// # use mailgun_manager::Client;
    /// # fn main() -> Result<(), mailgun_manager::Error> {
    /// let client = Client::builder()
    ///     .properties_file("config/mailgun.properties")
    ///     .user_agent("my-app/1.0")
    ///     .timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let account = Self::resolve_account(self.account, self.properties_file)?;

        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .user_agent(self.user_agent);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;
        info!(domain = account.domain(), base_uri = account.base_uri(), "mailgun client ready");

        Ok(Client { http, account })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
