//! Inline macro tokens in task titles.
//!
//! A title may carry:
//! - `!1`, `!2`, `!3`, `!4`: priority Critical, High, Medium, Low
//! - `!before dd.mm.yyyy` (or `dd-mm-yyyy`): deadline at the end of that day
//!
//! Tokens are matched as plain substrings, so `task!1` counts as well as
//! `task !1`. The stored title keeps its tokens; [`clean_title`] produces the
//! display form.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MacroError;
use crate::models::Priority;

const DEADLINE_MARKER: &str = "!before";

/// Checked in this order; the first token present wins regardless of where
/// it sits in the title.
const PRIORITY_TOKENS: [(&str, Priority); 4] = [
    ("!1", Priority::Critical),
    ("!2", Priority::High),
    ("!3", Priority::Medium),
    ("!4", Priority::Low),
];

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$")
        .unwrap_or_else(|e| panic!("Invalid date token regex: {e}"))
});

static PRIORITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"![1-4]").unwrap_or_else(|e| panic!("Invalid priority regex: {e}")));

static DEADLINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!before\s[0-9]{2}[.-][0-9]{2}[.-][0-9]{4}")
        .unwrap_or_else(|e| panic!("Invalid deadline regex: {e}"))
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").unwrap_or_else(|e| panic!("Invalid whitespace regex: {e}")));

/// Priority encoded in the title, or [`Priority::Medium`] when there is none.
pub fn detect_priority(title: &str) -> Priority {
    PRIORITY_TOKENS
        .iter()
        .find(|(token, _)| title.contains(token))
        .map(|(_, priority)| *priority)
        .unwrap_or_default()
}

/// Deadline encoded in the title, checked against the current time.
pub fn extract_deadline(title: &str) -> Result<Option<DateTime<Utc>>, MacroError> {
    extract_deadline_at(title, Utc::now())
}

/// Deadline encoded in the title, checked against `now`.
///
/// Returns `Ok(None)` when the title has no `!before` token, when the token
/// is not followed by a space, or when nothing but whitespace follows it.
/// Otherwise the text up to the next whitespace must be a date: an empty or
/// unparsable one is an error, as is a date whose end of day is before `now`.
pub fn extract_deadline_at(
    title: &str,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, MacroError> {
    if !title.contains(DEADLINE_MARKER) {
        return Ok(None);
    }

    let Some((_, rest)) = title.split_once("!before ") else {
        return Ok(None);
    };

    if rest.trim().is_empty() {
        return Ok(None);
    }

    let token = rest.split(char::is_whitespace).next().unwrap_or_default();

    let deadline = end_of_day(parse_date_token(token)?)?;
    if deadline < now {
        return Err(MacroError::DeadlineInPast);
    }

    Ok(Some(deadline))
}

/// Title with every macro token removed and whitespace normalized.
///
/// Removal repeats until nothing changes, so the result never contains a
/// token that was spliced together by removing another one (`!!11`).
pub fn clean_title(title: &str) -> String {
    let mut current = clean_once(title);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(title: &str) -> String {
    let without_priority = PRIORITY_PATTERN.replace_all(title, "");
    let without_deadline = DEADLINE_PATTERN.replace_all(&without_priority, "");
    WHITESPACE_RUN
        .replace_all(&without_deadline, " ")
        .trim()
        .to_string()
}

fn parse_date_token(token: &str) -> Result<NaiveDate, MacroError> {
    let normalized = token.replace('-', ".");
    let caps = DATE_TOKEN
        .captures(&normalized)
        .ok_or(MacroError::InvalidDateFormat)?;

    let day: u32 = caps[1].parse().map_err(|_| MacroError::InvalidDateFormat)?;
    let month: u32 = caps[2].parse().map_err(|_| MacroError::InvalidDateFormat)?;
    let year: i32 = caps[3].parse().map_err(|_| MacroError::InvalidDateFormat)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(MacroError::InvalidDateFormat)
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>, MacroError> {
    date.and_hms_opt(23, 59, 59)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or(MacroError::InvalidDateFormat)
}
