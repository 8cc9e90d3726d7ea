//! Campaign metadata, events and CSV export.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::connection::RestResponse;
use crate::converters;
use crate::models::{Campaign, CampaignEvent};
use crate::routine::Routine;
use crate::{Error, Result};

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.-]").expect("file name pattern compiles"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reads campaigns of the account's domain.
#[derive(Debug, Clone, Copy)]
pub struct Campaigns<'a> {
    routine: Routine<'a>,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(routine: Routine<'a>) -> Self {
        Self { routine }
    }

    fn campaign_path(&self, campaign_id: &str) -> String {
        format!("/{}/campaigns/{campaign_id}", self.routine.account().domain())
    }

    /// `GET /{domain}/campaigns/{id}`; `None` on a non-2xx status.
    pub async fn get(&self, campaign_id: &str) -> Result<Option<Campaign>> {
        let response = self.routine.get(&self.campaign_path(campaign_id)).await?;
        if !response.success() {
            return Ok(None);
        }
        Ok(Some(converters::campaign(&response.json()?)?))
    }

    async fn events_response(&self, campaign_id: &str) -> Result<RestResponse> {
        let path = format!("{}/events", self.campaign_path(campaign_id));
        self.routine.get(&path).await
    }

    /// `GET /{domain}/campaigns/{id}/events`; `None` on a non-2xx status.
    ///
    /// The reply is a flat JSON array, one object per event.
    pub async fn events(&self, campaign_id: &str) -> Result<Option<Vec<CampaignEvent>>> {
        let response = self.events_response(campaign_id).await?;
        if !response.success() {
            return Ok(None);
        }
        Ok(Some(parse_events(&response)?))
    }

    /// Write the campaign's events as CSV into `dir` and return the file path.
    ///
    /// The file is named after the campaign (`{name}_({id})_{timestamp}.csv`),
    /// or `{id}_{timestamp}.csv` when the campaign cannot be looked up. The
    /// header is the key set of the first event; a campaign without events
    /// produces an empty file.
    ///
    /// # Errors
    /// [`Error::Unsuccessful`] when the events cannot be fetched, and
    /// [`Error::Io`] when the file cannot be written.
    pub async fn save_events_csv(&self, campaign_id: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let campaign = self.get(campaign_id).await?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let path = dir
            .as_ref()
            .join(csv_file_name(campaign.as_ref(), campaign_id, &timestamp));

        let response = self.events_response(campaign_id).await?;
        if !response.success() {
            return Err(Error::Unsuccessful {
                operation: "campaign events fetch",
                family: response.family(),
            });
        }
        let events = parse_events(&response)?;

        tokio::fs::write(&path, events_to_csv(&events)?).await?;
        info!(path = %path.display(), events = events.len(), "campaign events saved");
        Ok(path)
    }
}

fn parse_events(response: &RestResponse) -> Result<Vec<CampaignEvent>> {
    let events: Vec<CampaignEvent> = serde_json::from_value(response.json()?)?;
    debug!(count = events.len(), "campaign events fetched");
    Ok(events)
}

/// `{name}_({id})_{timestamp}.csv`, with anything unsafe in a file name
/// replaced by `_`.
pub(crate) fn csv_file_name(campaign: Option<&Campaign>, campaign_id: &str, timestamp: &str) -> String {
    let id = UNSAFE_FILE_CHARS.replace_all(campaign_id, "_");
    match campaign.and_then(|c| c.name.as_deref()) {
        Some(name) => {
            let name = UNSAFE_FILE_CHARS.replace_all(name, "_");
            format!("{name}_({id})_{timestamp}.csv")
        }
        None => format!("{id}_{timestamp}.csv"),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Encode events as CSV. Columns follow the first event's keys; later events
/// are projected onto those columns.
pub(crate) fn events_to_csv(events: &[CampaignEvent]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if let Some(first) = events.first() {
        let header: Vec<&str> = first.keys().map(String::as_str).collect();
        writer.write_record(&header)?;
        for event in events {
            writer.write_record(header.iter().map(|key| cell(event.get(*key))))?;
        }
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}
