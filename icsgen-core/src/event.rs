//! The event record collected from the user.
//!
//! An `EventRecord` is built once by the collector and consumed once by the
//! document builder. Nothing mutates it in between.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{IcsGenError, IcsGenResult};

/// Title used when the user leaves the summary blank.
pub const DEFAULT_SUMMARY: &str = "New Event";

/// A single calendar event, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub summary: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Free-text zone identifier, used verbatim as TZID.
    pub timezone: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<Reminder>,
    pub recurrence: Option<Recurrence>,
}

impl EventRecord {
    /// Create a record for a one-off event with no reminder.
    ///
    /// A blank summary becomes [`DEFAULT_SUMMARY`]. When `end_time` is `None`
    /// the end defaults to one hour after the start; an explicit end must be
    /// strictly later than the start.
    pub fn new(
        summary: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: Option<NaiveTime>,
        timezone: &str,
    ) -> IcsGenResult<Self> {
        let end_time = match end_time {
            Some(end) if end <= start_time => {
                return Err(IcsGenError::InvalidInput(format!(
                    "end time {} must be after start time {}",
                    end.format("%H:%M"),
                    start_time.format("%H:%M")
                )));
            }
            Some(end) => end,
            None => Self::default_end(start_time),
        };

        let summary = summary.trim();
        let summary = if summary.is_empty() {
            DEFAULT_SUMMARY
        } else {
            summary
        };

        Ok(EventRecord {
            summary: summary.to_string(),
            date,
            start_time,
            end_time,
            timezone: timezone.to_string(),
            location: None,
            description: None,
            reminder: None,
            recurrence: None,
        })
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = non_blank(location);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn with_reminder(mut self, reminder: Option<Reminder>) -> Self {
        self.reminder = reminder;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// One hour after `start`, on the same day.
    ///
    /// Starts after 23:00 wrap past midnight (23:30 gives 00:30); the date is
    /// never moved forward.
    pub fn default_end(start: NaiveTime) -> NaiveTime {
        start.overflowing_add_signed(Duration::hours(1)).0
    }

    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    pub fn has_alarm(&self) -> bool {
        self.reminder.is_some()
    }

    pub fn has_repeat(&self) -> bool {
        self.recurrence.is_some()
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Menu order.
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// RRULE `FREQ` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a recurring event stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatBound {
    Forever,
    /// Local date-time of the last occurrence's end.
    Until(NaiveDateTime),
    Count(NonZeroU32),
}

impl RepeatBound {
    /// Occurrence-count bound; zero is rejected.
    pub fn count(n: u32) -> IcsGenResult<Self> {
        NonZeroU32::new(n).map(RepeatBound::Count).ok_or_else(|| {
            IcsGenError::InvalidInput("number of occurrences must be greater than 0".into())
        })
    }
}

/// Recurrence rule for a repeating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub freq: Frequency,
    pub bound: RepeatBound,
}

/// Reminder offsets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reminder {
    FiveMinutes,
    TenMinutes,
    OneHour,
    TwoHours,
    TwelveHours,
    OneDay,
}

impl Reminder {
    /// Menu order.
    pub const ALL: [Reminder; 6] = [
        Reminder::FiveMinutes,
        Reminder::TenMinutes,
        Reminder::OneHour,
        Reminder::TwoHours,
        Reminder::TwelveHours,
        Reminder::OneDay,
    ];

    /// Negative duration used as the VALARM `TRIGGER`.
    pub fn trigger(&self) -> &'static str {
        match self {
            Reminder::FiveMinutes => "-PT5M",
            Reminder::TenMinutes => "-PT10M",
            Reminder::OneHour => "-PT1H",
            Reminder::TwoHours => "-PT2H",
            Reminder::TwelveHours => "-PT12H",
            Reminder::OneDay => "-P1D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reminder::FiveMinutes => "5 minutes",
            Reminder::TenMinutes => "10 minutes",
            Reminder::OneHour => "1 hour",
            Reminder::TwoHours => "2 hours",
            Reminder::TwelveHours => "12 hours",
            Reminder::OneDay => "1 day",
        }
    }
}
