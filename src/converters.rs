//! JSON to record conversion.
//!
//! Each converter takes one JSON object from a Mailgun reply and maps it onto a
//! typed record. Member vars are converted into whatever type the caller asks
//! for; asking for a type the payload does not fit is an error rather than a
//! silent fallback.

use std::any::type_name;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::address::EmailAddress;
use crate::models::{Campaign, ListInfo, ListMember};
use crate::{Error, Result};

/// Rewrite a snake_case key as camelCase (`created_at` → `createdAt`).
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::ResponseParse(format!("expected {what} object, got {value}")))
}

/// Convert one item of the `GET /lists` reply.
pub fn list_info(value: &Value) -> Result<ListInfo> {
    object(value, "mailing list")?;
    Ok(ListInfo::deserialize(value)?)
}

/// Convert a campaign reply, rewriting its snake_case keys to camelCase first.
pub fn campaign(value: &Value) -> Result<Campaign> {
    let rewritten: Map<String, Value> = object(value, "campaign")?
        .iter()
        .map(|(k, v)| (camel_case(k), v.clone()))
        .collect();
    Ok(Campaign::deserialize(Value::Object(rewritten))?)
}

#[derive(Deserialize)]
struct WireMember {
    address: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    subscribed: bool,
    #[serde(default)]
    vars: Option<Value>,
}

/// Convert one list member, turning its vars into `V`.
///
/// Vars that are not a JSON object are dropped. With the default
/// `V = serde_json::Value` the object is kept as is.
///
/// # Errors
/// [`Error::InvalidAddress`] for a malformed member address and
/// [`Error::VarsType`] when the vars object does not deserialize into `V`.
pub fn list_member<V: DeserializeOwned>(value: &Value) -> Result<ListMember<V>> {
    object(value, "list member")?;
    let wire = WireMember::deserialize(value)?;
    let address = EmailAddress::parse(&wire.address)?;

    let vars = match wire.vars {
        Some(vars @ Value::Object(_)) => {
            let converted = serde_json::from_value::<V>(vars).map_err(|source| Error::VarsType {
                vars_type: type_name::<V>(),
                source,
            })?;
            Some(converted)
        }
        _ => None,
    };

    Ok(ListMember::from_parts(address, wire.name, wire.subscribed, vars))
}

/// Convert every object of `items` with `convert`.
pub(crate) fn items<T>(
    reply: &Value,
    convert: impl Fn(&Value) -> Result<T>,
) -> Result<Vec<T>> {
    reply
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::ResponseParse("reply has no `items` array".to_string()))?
        .iter()
        .map(convert)
        .collect()
}
