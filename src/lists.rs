//! Mailing lists.

use tracing::debug;

use crate::Result;
use crate::converters;
use crate::models::ListInfo;
use crate::routine::Routine;

/// Reads the account's mailing lists.
#[derive(Debug, Clone, Copy)]
pub struct MailingLists<'a> {
    routine: Routine<'a>,
}

impl<'a> MailingLists<'a> {
    pub(crate) fn new(routine: Routine<'a>) -> Self {
        Self { routine }
    }

    /// `GET /lists`.
    ///
    /// # Returns
    /// `None` when Mailgun answers with a non-2xx status.
    pub async fn lists(&self) -> Result<Option<Vec<ListInfo>>> {
        let response = self.routine.get("/lists").await?;
        if !response.success() {
            return Ok(None);
        }

        let lists = converters::items(&response.json()?, converters::list_info)?;
        debug!(count = lists.len(), "mailing lists fetched");
        Ok(Some(lists))
    }
}
