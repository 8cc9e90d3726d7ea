//! Plumbing shared by every Mailgun routine.

use secrecy::SecretString;

use crate::Result;
use crate::account::Account;
use crate::connection::{APPLICATION_JSON, RestConnection, RestResponse};
use crate::request::Parameters;

/// Borrowed HTTP client and account, handed to each routine by [`crate::Client`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Routine<'a> {
    http: &'a reqwest::Client,
    account: &'a Account,
}

impl<'a> Routine<'a> {
    pub(crate) fn new(http: &'a reqwest::Client, account: &'a Account) -> Self {
        Self { http, account }
    }

    pub(crate) fn account(&self) -> &'a Account {
        self.account
    }

    /// A connection at the account's base URI, authenticated with `api_key`.
    pub(crate) fn connection(&self, api_key: &SecretString) -> Result<RestConnection> {
        RestConnection::connect(self.http.clone(), self.account.base_uri(), api_key)
    }

    fn private(&self, path: &str) -> Result<RestConnection> {
        Ok(self
            .connection(self.account.private_api_key())?
            .add_path(path)
            .configure_request(APPLICATION_JSON))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<RestResponse> {
        self.private(path)?.invoke_get().await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<RestResponse> {
        self.private(path)?.invoke_delete().await
    }

    pub(crate) async fn post(&self, path: &str, form: &Parameters) -> Result<RestResponse> {
        self.private(path)?.add_form_params(form).invoke_post().await
    }

    pub(crate) async fn put(&self, path: &str, form: &Parameters) -> Result<RestResponse> {
        self.private(path)?.add_form_params(form).invoke_put().await
    }
}
