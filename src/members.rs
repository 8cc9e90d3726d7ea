//! Members of one mailing list.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::converters;
use crate::models::ListMember;
use crate::request::{ListMemberRequest, Parameters, SUBSCRIBED_KEY};
use crate::routine::Routine;
use crate::{Error, Result};

/// Most members Mailgun accepts in one bulk upload.
pub const MAX_MEMBERS_PER_CALL: usize = 1000;

/// CRUD operations on `/lists/{list}/members`.
#[derive(Debug, Clone, Copy)]
pub struct ListMembers<'a> {
    routine: Routine<'a>,
    list_address: &'a str,
}

impl<'a> ListMembers<'a> {
    pub(crate) fn new(routine: Routine<'a>, list_address: &'a str) -> Self {
        Self {
            routine,
            list_address,
        }
    }

    /// The list's own email address.
    pub fn list_address(&self) -> &str {
        self.list_address
    }

    fn members_path(&self) -> String {
        format!("/lists/{}/members", self.list_address)
    }

    fn member_path(&self, email: &str) -> String {
        format!("/lists/{}/members/{email}", self.list_address)
    }

    /// Add one member. The member is always added as subscribed.
    ///
    /// # Returns
    /// `false` when Mailgun rejects the call, e.g. because the address is
    /// already on the list.
    pub async fn add(&self, request: &ListMemberRequest) -> Result<bool> {
        let request = request.clone().subscribed(true);
        let response = self
            .routine
            .post(&self.members_path(), request.parameters())
            .await?;
        Ok(response.success())
    }

    /// Bulk-add members, at most [`MAX_MEMBERS_PER_CALL`] per call.
    ///
    /// Every chunk is sent even when an earlier one fails; failed chunks are
    /// logged. An empty slice sends nothing.
    ///
    /// # Returns
    /// `true` only if every chunk was accepted.
    pub async fn add_many<V: Serialize>(&self, members: &[ListMember<V>]) -> Result<bool> {
        let path = format!("{}.json", self.members_path());
        let chunks = members.chunks(MAX_MEMBERS_PER_CALL);
        let total = chunks.len();
        let mut all_accepted = true;

        for (index, chunk) in chunks.enumerate() {
            let mut form = Parameters::new();
            form.insert("members".to_string(), serde_json::to_string(chunk)?);

            let response = self.routine.post(&path, &form).await?;
            if response.success() {
                debug!(chunk = index + 1, total, size = chunk.len(), "members chunk added");
            } else {
                warn!(
                    list = self.list_address,
                    chunk = index + 1,
                    total,
                    family = %response.family(),
                    "failed to add members chunk"
                );
                all_accepted = false;
            }
        }

        Ok(all_accepted)
    }

    /// Fetch one member with raw JSON vars.
    ///
    /// # Returns
    /// `None` when Mailgun answers with a non-2xx status (e.g. unknown member).
    pub async fn get(&self, email: &str) -> Result<Option<ListMember>> {
        self.get_as(email).await
    }

    /// Fetch one member, converting its vars into `V`.
    pub async fn get_as<V: DeserializeOwned>(&self, email: &str) -> Result<Option<ListMember<V>>> {
        let response = self.routine.get(&self.member_path(email)).await?;
        if !response.success() {
            return Ok(None);
        }

        let reply = response.json()?;
        let member = reply
            .get("member")
            .ok_or_else(|| Error::ResponseParse("reply has no `member` object".to_string()))?;
        Ok(Some(converters::list_member(member)?))
    }

    /// Fetch all members with raw JSON vars.
    pub async fn list(&self) -> Result<Option<Vec<ListMember>>> {
        self.list_as().await
    }

    /// Fetch all members, converting each member's vars into `V`.
    ///
    /// # Errors
    /// [`Error::VarsType`] when some member's vars do not fit `V`.
    pub async fn list_as<V: DeserializeOwned>(&self) -> Result<Option<Vec<ListMember<V>>>> {
        let response = self.routine.get(&self.members_path()).await?;
        if !response.success() {
            return Ok(None);
        }

        let members = converters::items(&response.json()?, converters::list_member::<V>)?;
        debug!(list = self.list_address, count = members.len(), "members fetched");
        Ok(Some(members))
    }

    /// Update the member named by the request's address with its other fields.
    pub async fn update(&self, request: &ListMemberRequest) -> Result<bool> {
        let response = self
            .routine
            .put(&self.member_path(request.address()), request.parameters())
            .await?;
        Ok(response.success())
    }

    /// Mark a member as unsubscribed.
    pub async fn unsubscribe(&self, email: &str) -> Result<bool> {
        let mut form = Parameters::new();
        form.insert(SUBSCRIBED_KEY.to_string(), "no".to_string());
        let response = self.routine.put(&self.member_path(email), &form).await?;
        Ok(response.success())
    }

    pub async fn delete(&self, email: &str) -> Result<bool> {
        let response = self.routine.delete(&self.member_path(email)).await?;
        Ok(response.success())
    }
}
