use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::datetime::local_from_millis;
use crate::event::{Event, EventId};

const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// A timestamp as the backend sends it: epoch milliseconds from the joined
/// events endpoint, or a `YYYY-MM-DDTHH:MM:SS` string from the group events
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Text(String),
}

impl WireTimestamp {
    /// Local calendar timestamp in `tz`. Strings without an offset are
    /// already local and pass through unchanged.
    pub fn to_local(&self, tz: &Tz) -> anyhow::Result<NaiveDateTime> {
        match self {
            WireTimestamp::Millis(millis) => local_from_millis(*millis, tz)
                .ok_or_else(|| anyhow!("epoch millis out of range: {millis}")),
            WireTimestamp::Text(raw) => parse_text_timestamp(raw, tz),
        }
    }
}

fn parse_text_timestamp(raw: &str, tz: &Tz) -> anyhow::Result<NaiveDateTime> {
    let token = raw.trim();

    for fmt in LOCAL_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(token, fmt) {
            return Ok(ndt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Ok(dt.with_timezone(tz).naive_local());
    }

    if let Ok(millis) = token.parse::<i64>() {
        return local_from_millis(millis, tz)
            .ok_or_else(|| anyhow!("epoch millis out of range: {millis}"));
    }

    Err(anyhow!("unrecognized timestamp: {raw}"))
}

/// An event as serialized by the backend. Fields the calendar does not use
/// (`creator`, `messages`, `attendees`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    #[serde(rename = "startTime", alias = "start")]
    pub start: WireTimestamp,
    #[serde(rename = "endTime", alias = "end")]
    pub end: WireTimestamp,
}

impl EventRecord {
    pub fn into_event(self, tz: &Tz) -> anyhow::Result<Event> {
        let start = self
            .start
            .to_local(tz)
            .with_context(|| format!("invalid start of event {}", self.id))?;
        let end = self
            .end
            .to_local(tz)
            .with_context(|| format!("invalid end of event {}", self.id))?;
        Ok(Event::new(self.id, self.title, start, end))
    }
}

pub fn parse_event_records(json: &str) -> anyhow::Result<Vec<EventRecord>> {
    serde_json::from_str(json).context("event payload is not a JSON array of events")
}

#[instrument(skip(json, tz), fields(timezone = %tz))]
pub fn load_events(json: &str, tz: &Tz) -> anyhow::Result<Vec<Event>> {
    let records = parse_event_records(json)?;
    let count = records.len();

    let events = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            record
                .into_event(tz)
                .with_context(|| format!("event record #{idx} could not be converted"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    debug!(count, "loaded events");
    Ok(events)
}
