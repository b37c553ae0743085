//! Interactive collection of a single event.
//!
//! Every question loops until the answer parses. There is no retry limit;
//! the only way out of a prompt is a valid answer or Ctrl-C.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use icsgen_core::ics::timezone;
use icsgen_core::{EventRecord, Frequency, IcsGenConfig, Recurrence, Reminder, RepeatBound};

use crate::utils::tui::Prompter;

const DATE_HINT: &str = "Invalid date format. Please use YYYY-MM-DD (e.g., 2025-10-20)";

/// Run the full prompt sequence and build the event.
pub fn collect_event<P: Prompter>(p: &mut P, config: &IcsGenConfig) -> Result<EventRecord> {
    p.say("=== ICS Calendar Event Generator ===\n");

    // --- Title ---
    let summary = p.ask("Event title/summary")?;

    // --- When ---
    let date = prompt_with_retry(p, "Event date (YYYY-MM-DD)", parse_date)?;
    let start = prompt_with_retry(p, "Start time (HH:MM in 24-hour format)", |s| {
        parse_time(s, "09:00")
    })?;

    let default_end = EventRecord::default_end(start);
    let end = prompt_with_retry(
        p,
        &format!(
            "End time (HH:MM in 24-hour format) [default: {}]",
            default_end.format("%H:%M")
        ),
        |s| parse_end_time(s, start),
    )?;
    let end_time = end.unwrap_or(default_end);

    // --- Timezone ---
    let timezone = p.ask(&format!(
        "Timezone (e.g., Africa/Kampala, America/New_York, Europe/London) [default: {}]",
        config.default_timezone
    ))?;
    let timezone = if timezone.is_empty() {
        config.default_timezone.clone()
    } else {
        timezone
    };
    if timezone::lookup(&timezone).is_none() {
        tracing::warn!(%timezone, "timezone not found in the IANA database");
        p.warn(&format!(
            "Unknown timezone '{timezone}', the file will use a +0000 offset for it."
        ));
    }

    // --- Where / what ---
    let location = p.ask("Event location (optional)")?;
    let description = p.ask("Event description (optional)")?;

    let recurrence = prompt_recurrence(p, date, end_time)?;
    let reminder = prompt_reminder(p)?;

    let event = EventRecord::new(&summary, date, start, end, &timezone)?
        .with_location(&location)
        .with_description(&description)
        .with_recurrence(recurrence)
        .with_reminder(reminder);

    Ok(event)
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<P, T, F>(p: &mut P, prompt: &str, parse: F) -> Result<T>
where
    P: Prompter,
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let input = p.ask(prompt)?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(hint) => p.warn(&hint),
        }
    }
}

/// Print a numbered menu and return the 1-based choice.
fn prompt_menu<P: Prompter>(
    p: &mut P,
    title: &str,
    options: &[&str],
    default: usize,
    prompt: &str,
) -> Result<usize> {
    p.say(&format!("\n{title}"));
    for (i, option) in options.iter().enumerate() {
        p.say(&format!("{}. {}", i + 1, option));
    }

    prompt_with_retry(p, prompt, |s| parse_menu_choice(s, options.len(), default))
}

fn prompt_recurrence<P: Prompter>(
    p: &mut P,
    date: NaiveDate,
    end_time: NaiveTime,
) -> Result<Option<Recurrence>> {
    let mut options = vec!["No repeat (single event)"];
    options.extend(Frequency::ALL.iter().map(Frequency::label));

    let choice = prompt_menu(
        p,
        "Repeating options:",
        &options,
        1,
        "Select repeat option [default: 1 - No repeat]",
    )?;

    let Some(freq) = choice.checked_sub(2).map(|i| Frequency::ALL[i]) else {
        p.say("Selected: No repeat");
        return Ok(None);
    };
    p.say(&format!("Selected: {}", freq.label()));

    let choice = prompt_menu(
        p,
        "How long should this repeat?",
        &[
            "Forever",
            "Until a specific date",
            "For a specific number of occurrences",
        ],
        2,
        "Select option [default: 2 - Until a specific date]",
    )?;

    let bound = match choice {
        1 => {
            p.say("Selected: Repeat forever");
            RepeatBound::Forever
        }
        2 => {
            let until = prompt_with_retry(p, "End date for repeating (YYYY-MM-DD)", |s| {
                parse_until_date(s, date)
            })?;
            p.say(&format!("Selected: Repeat until {}", until.format("%Y-%m-%d")));
            RepeatBound::Until(until.and_time(end_time))
        }
        _ => {
            let bound = prompt_with_retry(p, "Number of occurrences", parse_count)?;
            if let RepeatBound::Count(n) = bound {
                p.say(&format!("Selected: Repeat {n} times"));
            }
            bound
        }
    };

    Ok(Some(Recurrence { freq, bound }))
}

fn prompt_reminder<P: Prompter>(p: &mut P) -> Result<Option<Reminder>> {
    let labels: Vec<String> = Reminder::ALL
        .iter()
        .map(|r| format!("{} before", r.label()))
        .collect();
    let mut options: Vec<&str> = labels.iter().map(String::as_str).collect();
    options.push("No reminder");

    let choice = prompt_menu(
        p,
        "Reminder options:",
        &options,
        1,
        "Select reminder option [default: 1 - 5 minutes]",
    )?;

    let reminder = Reminder::ALL.get(choice - 1).copied();
    match reminder {
        Some(r) => p.say(&format!("Selected: {}", r.label())),
        None => p.say("Selected: No reminder"),
    }

    Ok(reminder)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| DATE_HINT.to_string())
}

/// Parse `HH:MM` (24-hour). `example` is shown in the hint on failure.
pub fn parse_time(input: &str, example: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| format!("Invalid time format. Please use HH:MM (e.g., {example})"))
}

/// Blank means "use the default end"; anything else must be after `start`.
pub fn parse_end_time(input: &str, start: NaiveTime) -> Result<Option<NaiveTime>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let end = parse_time(input, "10:00")?;
    if end <= start {
        return Err("End time must be after start time.".to_string());
    }
    Ok(Some(end))
}

pub fn parse_until_date(input: &str, event_date: NaiveDate) -> Result<NaiveDate, String> {
    let until = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Please use YYYY-MM-DD".to_string())?;
    if until <= event_date {
        return Err("End date must be after the event date.".to_string());
    }
    Ok(until)
}

pub fn parse_count(input: &str) -> Result<RepeatBound, String> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid number.".to_string())?;
    if n <= 0 {
        return Err("Number of occurrences must be greater than 0.".to_string());
    }

    let n = u32::try_from(n).map_err(|_| "Please enter a valid number.".to_string())?;
    RepeatBound::count(n).map_err(|e| e.to_string())
}

/// Parse a 1-based menu choice; blank selects `default`.
pub fn parse_menu_choice(input: &str, options: usize, default: usize) -> Result<usize, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=options).contains(&n) => Ok(n),
        _ => Err(format!("Please enter a number from 1 to {options}.")),
    }
}
