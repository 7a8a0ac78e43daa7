use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the owning collection. Integers and strings both
/// occur in backend payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Integer(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Integer(value) => write!(f, "{value}"),
            EventId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Integer(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

/// A titled interval on the local calendar.
///
/// `end >= start` is expected but not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    id: EventId,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Event {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Calendar day the event starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Returns `true` when `first` starts strictly before `second`.
///
/// Equal start times compare `false` in both directions.
pub fn compare_events_by_start_date(first: &Event, second: &Event) -> bool {
    first.start < second.start
}

/// Sorts by start time. Events starting at the same time keep their input
/// order.
pub fn sort_events_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| {
        if compare_events_by_start_date(a, b) {
            Ordering::Less
        } else if compare_events_by_start_date(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{Event, EventId, compare_events_by_start_date, sort_events_by_start};

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid datetime")
    }

    fn event(id: i64, start: NaiveDateTime) -> Event {
        Event::new(id, format!("Event {id}"), start, start)
    }

    #[test]
    fn earlier_start_compares_true() {
        let first = Event::new(0_i64, "First event", at(2020, 9, 10, 0), at(2020, 9, 11, 0));
        let second = Event::new(1_i64, "Second event", at(2020, 10, 10, 0), at(2020, 10, 11, 0));

        assert!(compare_events_by_start_date(&first, &second));
        assert!(!compare_events_by_start_date(&second, &first));
    }

    #[test]
    fn equal_start_compares_false_both_ways() {
        let first = Event::new(0_i64, "First event", at(2020, 9, 10, 0), at(2020, 9, 11, 0));
        let second = Event::new(1_i64, "Second event", at(2020, 9, 10, 0), at(2020, 10, 11, 0));

        assert!(!compare_events_by_start_date(&first, &second));
        assert!(!compare_events_by_start_date(&second, &first));
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut events = vec![
            event(1, at(2020, 9, 10, 12)),
            event(2, at(2020, 9, 10, 9)),
            event(3, at(2020, 9, 10, 12)),
            event(4, at(2020, 9, 10, 9)),
            event(5, at(2020, 9, 9, 23)),
        ];

        sort_events_by_start(&mut events);

        let ids: Vec<_> = events.iter().map(|e| e.id().clone()).collect();
        assert_eq!(
            ids,
            vec![
                EventId::Integer(5),
                EventId::Integer(2),
                EventId::Integer(4),
                EventId::Integer(1),
                EventId::Integer(3),
            ]
        );
    }

    #[test]
    fn event_id_displays_raw_value() {
        assert_eq!(EventId::from(42_i64).to_string(), "42");
        assert_eq!(EventId::from("abc").to_string(), "abc");
    }
}
