//! Data models returned by the Mailgun API.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};
use crate::address::EmailAddress;
use crate::request::ListMemberRequest;

/// Result of an address validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailValidation {
    /// The address that was checked, as given.
    pub address: String,
    pub is_valid: bool,
    /// Suggested correction; `None` when the API has none.
    pub did_you_mean: Option<String>,
}

/// A mailing list as listed by `GET /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    #[serde(default)]
    pub access_level: Option<String>,
    /// The list's own email address, which identifies it in the API.
    pub address: String,
    #[serde(rename = "members_count", default)]
    pub count: Option<u64>,
    #[serde(rename = "created_at", default)]
    pub created: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Aggregate delivery and engagement counters of a campaign.
///
/// Populated from camelCase keys; see [`crate::converters::campaign`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    pub id: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub submitted_count: Option<u64>,
    pub delivered_count: Option<u64>,
    pub opened_count: Option<u64>,
    pub clicked_count: Option<u64>,
    pub bounced_count: Option<u64>,
    pub complained_count: Option<u64>,
    pub dropped_count: Option<u64>,
    pub unsubscribed_count: Option<u64>,
}

/// One campaign event, keys in the order the API sent them.
pub type CampaignEvent = serde_json::Map<String, serde_json::Value>;

/// A member of a mailing list.
///
/// `V` is the type of the free-form `vars` payload; by default it is left as
/// raw JSON. Two members are equal when their addresses match ignoring case.
#[derive(Debug, Clone, Serialize)]
pub struct ListMember<V = serde_json::Value> {
    #[serde(serialize_with = "serialize_addr_spec")]
    address: EmailAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    subscribed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    vars: Option<V>,
}

impl<V> ListMember<V> {
    /// A subscribed member with no vars.
    ///
    /// A display name in the mailbox (`Jane Roe <jane@example.com>`) becomes
    /// the member name.
    pub fn new(address: &str) -> Result<Self> {
        Ok(Self::from_parts(EmailAddress::parse(address)?, None, true, None))
    }

    /// An explicit `name` wins over the mailbox's display name.
    pub(crate) fn from_parts(
        address: EmailAddress,
        name: Option<String>,
        subscribed: bool,
        vars: Option<V>,
    ) -> Self {
        let name = name.or_else(|| address.display_name().map(str::to_string));
        Self {
            address,
            name,
            subscribed,
            vars,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = subscribed;
        self
    }

    pub fn with_vars(mut self, vars: V) -> Self {
        self.vars = Some(vars);
        self
    }

    /// The bare `local@domain` address, as used in member paths.
    pub fn address(&self) -> &str {
        self.address.addr_spec()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn vars(&self) -> Option<&V> {
        self.vars.as_ref()
    }

    pub fn into_vars(self) -> Option<V> {
        self.vars
    }

    fn key(&self) -> String {
        self.address.addr_spec().to_lowercase()
    }
}

fn serialize_addr_spec<S: Serializer>(address: &EmailAddress, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(address.addr_spec())
}

impl<V: Serialize> ListMember<V> {
    /// Request that recreates this member through the create/update endpoints.
    pub fn to_request(&self) -> Result<ListMemberRequest> {
        let mut request = ListMemberRequest::new(self.address.addr_spec())?.subscribed(self.subscribed);
        if let Some(name) = &self.name {
            request = request.name(name.as_str());
        }
        if let Some(vars) = &self.vars {
            request = request.vars(vars)?;
        }
        Ok(request)
    }
}

impl<V: Serialize> TryFrom<&ListMember<V>> for ListMemberRequest {
    type Error = Error;

    fn try_from(member: &ListMember<V>) -> Result<Self> {
        member.to_request()
    }
}

impl<V> PartialEq for ListMember<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<V> Eq for ListMember<V> {}

impl<V> Hash for ListMember<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<V> fmt::Display for ListMember<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address.addr_spec()),
            None => f.write_str(self.address.addr_spec()),
        }
    }
}
