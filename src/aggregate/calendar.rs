use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use serde::Serialize;

use uuid::Uuid;

use crate::domain::Donor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Birthday,
    Anniversary,
    Memorial,
}

/// A donor occasion recurring every year on the same month and day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub donor_id: Uuid,
    pub donor_name: String,
    /// The occasion projected onto the calendar's year
    pub date: NaiveDate,
    pub kind: EventKind,
    pub description: String,
}

/// Move `date` to the same month and day of `year`.
///
/// February 29th falls on March 1st outside leap years.
pub fn project_onto_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Donor birthdays, anniversaries and memorial dates for one year
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventCalendar {
    year: i32,
    events: Vec<CalendarEvent>,
}

impl EventCalendar {
    pub fn for_year(donors: &[Donor], year: i32) -> Self {
        let mut events = Vec::new();

        for donor in donors {
            let mut push = |date: NaiveDate, kind: EventKind, description: String| {
                if let Some(date) = project_onto_year(date, year) {
                    events.push(CalendarEvent {
                        donor_id: donor.id,
                        donor_name: donor.name.clone(),
                        date,
                        kind,
                        description,
                    });
                }
            };

            if let Some(birth_date) = donor.birth_date {
                push(
                    birth_date,
                    EventKind::Birthday,
                    format!("{}'s Birthday", donor.name),
                );
            }
            if let Some(anniversary_date) = donor.anniversary_date {
                push(
                    anniversary_date,
                    EventKind::Anniversary,
                    format!("{}'s Anniversary", donor.name),
                );
            }
            for memorial in &donor.memorial_dates {
                let tag = match memorial.tag.trim() {
                    "" => "Memorial",
                    tag => tag,
                };
                push(
                    memorial.date,
                    EventKind::Memorial,
                    format!("{} for {}", tag, donor.name),
                );
            }
        }

        Self { year, events }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Events falling on exactly `date`
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// Events grouped per day, for badges on calendar cells
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&CalendarEvent>> {
        let mut days: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            days.entry(event.date).or_default().push(event);
        }
        days
    }
}
