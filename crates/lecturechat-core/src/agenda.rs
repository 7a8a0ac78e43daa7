use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::event::{Event, sort_events_by_start};
use crate::month::CalendarMonth;

/// Events grouped by the calendar day they start on.
///
/// Each day's events are ordered by start time; ties keep the order in
/// which they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsByDay {
    days: BTreeMap<NaiveDate, Vec<Event>>,
}

impl EventsByDay {
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut days: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
        for event in events {
            days.entry(event.start_day()).or_default().push(event);
        }
        for bucket in days.values_mut() {
            sort_events_by_start(bucket);
        }

        debug!(days = days.len(), "grouped events by start day");
        Self { days }
    }

    /// Events starting on `date`, empty when there are none.
    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[Event])> {
        self.days.iter().map(|(day, events)| (*day, events.as_slice()))
    }

    /// Only the days falling inside `month`.
    pub fn within(&self, month: CalendarMonth) -> Self {
        let days = self
            .days
            .range(month.first_day()..=month.last_day())
            .map(|(day, events)| (*day, events.clone()))
            .collect();
        Self { days }
    }

    /// Total number of events across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::EventsByDay;
    use crate::event::{Event, EventId};
    use crate::month::CalendarMonth;

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid datetime")
    }

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, month, day).expect("valid date")
    }

    fn sample() -> EventsByDay {
        EventsByDay::from_events(vec![
            Event::new(1_i64, "Seminar", at(9, 10, 15, 0), at(9, 10, 16, 0)),
            Event::new(2_i64, "Lecture", at(9, 10, 9, 0), at(9, 10, 11, 0)),
            Event::new(3_i64, "Lab", at(9, 30, 23, 30), at(10, 1, 1, 0)),
            Event::new(4_i64, "Exam", at(10, 1, 8, 0), at(10, 1, 10, 0)),
        ])
    }

    #[test]
    fn buckets_are_sorted_by_start() {
        let agenda = sample();
        let titles: Vec<_> = agenda
            .events_on(day(9, 10))
            .iter()
            .map(Event::title)
            .collect();
        assert_eq!(titles, vec!["Lecture", "Seminar"]);
        assert_eq!(agenda.len(), 4);
    }

    #[test]
    fn events_are_keyed_by_start_day_only() {
        let agenda = sample();
        assert!(agenda.has_events(day(9, 30)));
        assert_eq!(agenda.events_on(day(10, 1)).len(), 1);
        assert_eq!(agenda.events_on(day(10, 1))[0].id(), &EventId::Integer(4));
        assert!(agenda.events_on(day(9, 11)).is_empty());
    }

    #[test]
    fn within_keeps_only_the_month() {
        let september = CalendarMonth::new(2020, 8).expect("valid month");
        let filtered = sample().within(september);
        assert_eq!(filtered.len(), 3);
        assert!(!filtered.has_events(day(10, 1)));
        let days: Vec<_> = filtered.days().map(|(d, _)| d).collect();
        assert_eq!(days, vec![day(9, 10), day(9, 30)]);
    }

    #[test]
    fn empty_agenda() {
        let agenda = EventsByDay::from_events(Vec::new());
        assert!(agenda.is_empty());
        assert_eq!(agenda.len(), 0);
    }
}
