//! ICS document generation.

use chrono::{DateTime, SubsecRound, Utc};
use icalendar::parser::{read_calendar, unfold};

use super::timezone;
use crate::error::{IcsGenError, IcsGenResult};
use crate::event::{EventRecord, RepeatBound};

pub const PRODID: &str = "-//Custom ICS Generator//EN";

const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";
const LOCAL_STAMP: &str = "%Y%m%dT%H%M%S";

/// Generate the .ics document for an event, stamped now with a fresh UID.
///
/// The rendered text is parsed back before it is returned so a malformed
/// document never reaches disk.
pub fn generate_ics(event: &EventRecord) -> IcsGenResult<String> {
    let stamp = Utc::now().trunc_subsecs(0);
    let uid = uuid::Uuid::new_v4().to_string();

    let content = render_ics(event, stamp, &uid);
    validate(&content)?;

    tracing::debug!(uid = %uid, summary = %event.summary, "rendered event document");
    Ok(content)
}

/// Render an event with a fixed stamp and UID.
///
/// Field values are written verbatim; nothing is escaped or folded.
pub fn render_ics(event: &EventRecord, stamp: DateTime<Utc>, uid: &str) -> String {
    let mut ics = Lines::default();
    let tz = event.timezone.as_str();
    let stamp = stamp.format(UTC_STAMP).to_string();
    let offset = timezone::format_offset(timezone::utc_offset_seconds(tz, event.start()));

    // Envelope
    ics.push("BEGIN:VCALENDAR");
    ics.prop("PRODID", PRODID);
    ics.prop("VERSION", "2.0");

    // Single STANDARD observance, no DST rules
    ics.push("BEGIN:VTIMEZONE");
    ics.prop("TZID", tz);
    ics.push("BEGIN:STANDARD");
    ics.prop("TZOFFSETTO", &offset);
    ics.prop("TZOFFSETFROM", &offset);
    ics.prop("TZNAME", tz);
    ics.prop("DTSTART", "19700101T000000");
    ics.push("END:STANDARD");
    ics.push("END:VTIMEZONE");

    ics.push("BEGIN:VEVENT");
    ics.prop("CREATED", &stamp);
    ics.prop("LAST-MODIFIED", &stamp);
    ics.prop("DTSTAMP", &stamp);
    ics.prop("UID", uid);
    ics.prop("SUMMARY", &event.summary);

    if let Some(recurrence) = &event.recurrence {
        let mut rrule = format!("FREQ={}", recurrence.freq);
        match recurrence.bound {
            RepeatBound::Forever => {}
            RepeatBound::Until(until) => {
                let until = timezone::local_to_utc(tz, until);
                rrule.push_str(&format!(";UNTIL={}", until.format(UTC_STAMP)));
            }
            RepeatBound::Count(n) => rrule.push_str(&format!(";COUNT={n}")),
        }
        ics.prop("RRULE", &rrule);
    }

    ics.prop(
        &format!("DTSTART;TZID={tz}"),
        &event.start().format(LOCAL_STAMP).to_string(),
    );
    ics.prop(
        &format!("DTEND;TZID={tz}"),
        &event.end().format(LOCAL_STAMP).to_string(),
    );
    ics.prop("TRANSP", "OPAQUE");

    if let Some(location) = &event.location {
        ics.prop("LOCATION", location);
    }
    if let Some(description) = &event.description {
        ics.prop("DESCRIPTION", description);
    }

    if let Some(reminder) = event.reminder {
        ics.push("BEGIN:VALARM");
        ics.prop("ACTION", "DISPLAY");
        ics.prop("TRIGGER", reminder.trigger());
        ics.prop("DESCRIPTION", "Event reminder");
        ics.push("END:VALARM");
    }

    ics.push("END:VEVENT");
    ics.push("END:VCALENDAR");

    ics.0
}

/// Check that a rendered document parses and holds exactly one VEVENT.
pub fn validate(content: &str) -> IcsGenResult<()> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| IcsGenError::IcsGenerate(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .count();
    if events != 1 {
        return Err(IcsGenError::IcsGenerate(format!(
            "expected exactly one VEVENT, found {events}"
        )));
    }

    Ok(())
}

/// CRLF-terminated content lines.
#[derive(Default)]
struct Lines(String);

impl Lines {
    fn push(&mut self, line: &str) {
        self.0.push_str(line);
        self.0.push_str("\r\n");
    }

    fn prop(&mut self, name: &str, value: &str) {
        self.0.push_str(name);
        self.0.push(':');
        self.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Frequency, Recurrence, Reminder};
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    const UID: &str = "00000000-0000-4000-8000-000000000000";

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 34, 56).unwrap()
    }

    fn team_sync() -> EventRecord {
        EventRecord::new(
            "Team Sync",
            NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            None,
            "Africa/Kampala",
        )
        .unwrap()
        .with_reminder(Some(Reminder::FiveMinutes))
    }

    #[test]
    fn test_render_team_sync_layout() {
        let ics = render_ics(&team_sync(), stamp(), UID);

        let expected = [
            "BEGIN:VCALENDAR",
            "PRODID:-//Custom ICS Generator//EN",
            "VERSION:2.0",
            "BEGIN:VTIMEZONE",
            "TZID:Africa/Kampala",
            "BEGIN:STANDARD",
            "TZOFFSETTO:+0300",
            "TZOFFSETFROM:+0300",
            "TZNAME:Africa/Kampala",
            "DTSTART:19700101T000000",
            "END:STANDARD",
            "END:VTIMEZONE",
            "BEGIN:VEVENT",
            "CREATED:20251001T123456Z",
            "LAST-MODIFIED:20251001T123456Z",
            "DTSTAMP:20251001T123456Z",
            "UID:00000000-0000-4000-8000-000000000000",
            "SUMMARY:Team Sync",
            "DTSTART;TZID=Africa/Kampala:20251020T090000",
            "DTEND;TZID=Africa/Kampala:20251020T100000",
            "TRANSP:OPAQUE",
            "BEGIN:VALARM",
            "ACTION:DISPLAY",
            "TRIGGER:-PT5M",
            "DESCRIPTION:Event reminder",
            "END:VALARM",
            "END:VEVENT",
            "END:VCALENDAR",
        ];
        let mut joined = expected.join("\r\n");
        joined.push_str("\r\n");

        assert_eq!(ics, joined);
        assert!(!ics.contains("RRULE"));
    }

    #[test]
    fn test_render_is_deterministic_for_frozen_inputs() {
        let event = team_sync().with_location("Room 4");
        assert_eq!(
            render_ics(&event, stamp(), UID),
            render_ics(&event, stamp(), UID)
        );
    }

    #[test]
    fn test_generated_documents_differ_only_in_uid() {
        let event = team_sync();
        let a = generate_ics(&event).unwrap();
        let b = generate_ics(&event).unwrap();

        let strip = |ics: &str| -> Vec<String> {
            ics.lines()
                .filter(|l| {
                    !l.starts_with("UID:")
                        && !l.starts_with("CREATED:")
                        && !l.starts_with("LAST-MODIFIED:")
                        && !l.starts_with("DTSTAMP:")
                })
                .map(str::to_string)
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));

        let uid = |ics: &str| ics.lines().find(|l| l.starts_with("UID:")).map(str::to_string);
        assert_ne!(uid(&a), uid(&b));
    }

    #[test]
    fn test_weekly_count_rrule() {
        let event = team_sync().with_recurrence(Some(Recurrence {
            freq: Frequency::Weekly,
            bound: RepeatBound::count(10).unwrap(),
        }));
        let ics = render_ics(&event, stamp(), UID);

        assert!(ics.contains("\r\nRRULE:FREQ=WEEKLY;COUNT=10\r\n"), "ICS:\n{ics}");
        let rrule_pos = ics.find("RRULE:").unwrap();
        let summary_pos = ics.find("SUMMARY:").unwrap();
        let dtstart_pos = ics.find("DTSTART;TZID=").unwrap();
        assert!(summary_pos < rrule_pos && rrule_pos < dtstart_pos);
    }

    #[test]
    fn test_until_rrule_is_utc() {
        let until = NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let event = team_sync().with_recurrence(Some(Recurrence {
            freq: Frequency::Daily,
            bound: RepeatBound::Until(until),
        }));
        let ics = render_ics(&event, stamp(), UID);

        assert!(ics.contains("RRULE:FREQ=DAILY;UNTIL=20251130T070000Z\r\n"), "ICS:\n{ics}");
        assert!(!ics.contains("COUNT="));
    }

    #[test]
    fn test_forever_rrule_has_no_bound() {
        let event = team_sync().with_recurrence(Some(Recurrence {
            freq: Frequency::Monthly,
            bound: RepeatBound::Forever,
        }));
        let ics = render_ics(&event, stamp(), UID);

        assert!(ics.contains("RRULE:FREQ=MONTHLY\r\n"));
        assert!(!ics.contains("UNTIL="));
        assert!(!ics.contains("COUNT="));
    }

    #[test]
    fn test_location_and_description_lines_are_conditional() {
        let bare = render_ics(&team_sync(), stamp(), UID);
        assert!(!bare.contains("LOCATION:"));
        assert_eq!(bare.lines().filter(|l| l.starts_with("DESCRIPTION:")).count(), 1);

        let full = render_ics(
            &team_sync()
                .with_location("Kampala Office")
                .with_description("Weekly catch-up"),
            stamp(),
            UID,
        );
        let lines: Vec<&str> = full.lines().collect();
        let transp = lines.iter().position(|l| *l == "TRANSP:OPAQUE").unwrap();
        assert_eq!(lines[transp + 1], "LOCATION:Kampala Office");
        assert_eq!(lines[transp + 2], "DESCRIPTION:Weekly catch-up");
        assert_eq!(lines[transp + 3], "BEGIN:VALARM");
    }

    #[test]
    fn test_no_reminder_means_no_valarm() {
        let event = team_sync().with_reminder(None);
        let ics = render_ics(&event, stamp(), UID);
        assert!(!ics.contains("BEGIN:VALARM"));
        assert!(!ics.contains("TRIGGER:"));
    }

    #[test]
    fn test_unknown_zone_gets_zero_offset() {
        let mut event = team_sync();
        event.timezone = "Office/Basement".to_string();
        let ics = render_ics(&event, stamp(), UID);

        assert!(ics.contains("TZOFFSETTO:+0000\r\n"));
        assert!(ics.contains("DTSTART;TZID=Office/Basement:20251020T090000"));
    }

    #[test]
    fn test_output_parses_as_icalendar() {
        let event = team_sync()
            .with_location("Room 4")
            .with_recurrence(Some(Recurrence {
                freq: Frequency::Yearly,
                bound: RepeatBound::count(3).unwrap(),
            }));
        let ics = render_ics(&event, stamp(), UID);

        let unfolded = unfold(&ics);
        let calendar = read_calendar(&unfolded).unwrap();
        let vevent = calendar
            .components
            .iter()
            .find(|c| c.name == "VEVENT")
            .expect("Should have VEVENT");
        assert_eq!(vevent.find_prop("SUMMARY").unwrap().val.to_string(), "Team Sync");
        assert_eq!(vevent.find_prop("UID").unwrap().val.to_string(), UID);
        assert_eq!(
            vevent.find_prop("RRULE").unwrap().val.to_string(),
            "FREQ=YEARLY;COUNT=3"
        );
    }

    #[test]
    fn test_validate_rejects_missing_event() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
        assert!(validate(ics).is_err());
    }
}
