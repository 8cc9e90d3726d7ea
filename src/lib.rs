//! # Mailgun Manager
//! Asynchronous client for the Mailgun HTTP API: send messages, validate addresses, manage mailing-list members and export campaign events, through [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust services and scripts that talk to a single Mailgun account: describe the account with [`Account`] (or a `mailgun.properties` file), build requests with [`EmailRequest`] and [`ListMemberRequest`], and read back typed [`ListInfo`], [`ListMember`] and [`Campaign`] values. Member `vars` can be decoded into any `serde` type with [`Client::list_members_as`].
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest` with basic authentication (`api` plus the private key, or the public key for address validation).
//!
//! ## Out of scope
//! Not an SMTP client, webhook receiver or admin console. Domains, routes, bounces and suppressions are not covered, and nothing is retried.
//!
//! ## Errors
//! Invalid addresses are rejected when a request is built ([`Error::InvalidAddress`]). Transport failures surface as [`Error::Request`]. A non-2xx reply is not an error for most calls: boolean operations return `false` and fetches return `None`. Address validation and CSV export report it as [`Error::Unsuccessful`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mailgun_manager::{Client, EmailRequest, ListMemberRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailgun_manager::Error> {
//!     let client = Client::new()?;
//!
//!     let request = EmailRequest::new()
//!         .from("Excited User <mailgun@samples.mailgun.org>")?
//!         .to(["alice@example.com"])?
//!         .subject("Hello")
//!         .text("Testing some Mailgun awesomeness!");
//!     println!("sent: {}", client.send_message(&request).await?);
//!
//!     let member = ListMemberRequest::new("Bob <bob@example.com>")?;
//!     client.add_list_member("dev@samples.mailgun.org", &member).await?;
//!     for member in client.list_members("dev@samples.mailgun.org").await?.unwrap_or_default() {
//!         println!("{member}");
//!     }
//!     Ok(())
//! }
//! ```

mod account;
mod address;
mod campaigns;
mod client;
pub mod connection;
pub mod converters;
mod error;
mod lists;
mod members;
mod models;
mod request;
mod routine;
mod sender;
mod validation;

pub use account::{Account, DEFAULT_BASE_URI, MAILGUN_PROPERTIES};
pub use address::EmailAddress;
pub use campaigns::Campaigns;
pub use client::{Client, ClientBuilder};
pub use connection::{RestConnection, RestResponse, StatusFamily};
pub use error::Error;
pub use lists::MailingLists;
pub use members::{ListMembers, MAX_MEMBERS_PER_CALL};
pub use models::{Campaign, CampaignEvent, EmailValidation, ListInfo, ListMember};
pub use request::{EmailRequest, ListMemberRequest, Parameters};
pub use sender::MailSender;
pub use validation::AddressValidator;

/// Result type alias for Mailgun operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
