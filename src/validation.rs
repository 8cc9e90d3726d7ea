//! Address validation.

use serde::Deserialize;
use tracing::debug;
use validator::ValidateEmail;

use crate::connection::APPLICATION_JSON;
use crate::models::EmailValidation;
use crate::routine::Routine;
use crate::{Error, Result};

#[derive(Deserialize)]
struct ValidateReply {
    is_valid: bool,
    #[serde(default)]
    did_you_mean: Option<String>,
}

/// Checks addresses through `GET /address/validate`, authenticated with the
/// public API key.
#[derive(Debug, Clone, Copy)]
pub struct AddressValidator<'a> {
    routine: Routine<'a>,
}

impl<'a> AddressValidator<'a> {
    pub(crate) fn new(routine: Routine<'a>) -> Self {
        Self { routine }
    }

    /// Validate `address`.
    ///
    /// Addresses that fail the local syntax check are reported invalid without
    /// contacting Mailgun.
    ///
    /// # Errors
    /// [`Error::Unsuccessful`] when Mailgun answers with a non-2xx status.
    pub async fn validate(&self, address: &str) -> Result<EmailValidation> {
        let locally_valid = address.validate_email();
        debug!(address, locally_valid, "local syntax check");
        if !locally_valid {
            return Ok(EmailValidation {
                address: address.to_string(),
                is_valid: false,
                did_you_mean: None,
            });
        }

        let response = self
            .routine
            .connection(self.routine.account().public_api_key())?
            .add_path("/address/validate")
            .add_query_param("address", address)
            .configure_request(APPLICATION_JSON)
            .invoke_get()
            .await?;

        if !response.success() {
            return Err(Error::Unsuccessful {
                operation: "address validation",
                family: response.family(),
            });
        }

        let reply = ValidateReply::deserialize(response.json()?)?;
        Ok(EmailValidation {
            address: address.to_string(),
            is_valid: reply.is_valid,
            did_you_mean: reply.did_you_mean,
        })
    }
}
