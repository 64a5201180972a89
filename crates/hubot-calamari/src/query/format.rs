//! Chat phrasing for leave answers.

use chrono::{Datelike, NaiveDate};

use crate::leave::Leave;

/// Reply to a list request when nobody matched.
pub const NO_ONE_ON_LEAVE: &str = "No one is on leave.";

/// Separator between sentences in one reply.
pub const LINE_BREAK: &str = "\r\n";

/// `1` → `1st`, `12` → `12th`, `22` → `22nd`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Describe `date` relative to `today`, e.g. "tomorrow, the 19th" or
/// "Thursday the 21st". Past dates and dates a week or more ahead use
/// "the 3rd November".
pub fn calendar(date: NaiveDate, today: NaiveDate) -> String {
    let nth = ordinal(date.day());
    match (date - today).num_days() {
        0 => format!("today, the {nth}"),
        1 => format!("tomorrow, the {nth}"),
        2..=6 => format!("{} the {nth}", date.format("%A")),
        _ => format!("the {nth} {}", date.format("%B")),
    }
}

/// One line of the "who's on leave" answer.
pub fn list_sentence(name: &str, leave: &Leave, back: NaiveDate, today: NaiveDate) -> String {
    if leave.from == leave.to {
        return format!("{name} is on leave, on {}.", calendar(leave.from, today));
    }
    if leave.from > today {
        format!(
            "{name} is on leave, from {}, returning to work {}.",
            calendar(leave.from, today),
            calendar(back, today)
        )
    } else {
        format!(
            "{name} is on leave, returning to work {}.",
            calendar(back, today)
        )
    }
}

/// One line of the answer for a mentioned user.
pub fn mention_sentence(name: &str, partial: bool, back: NaiveDate, today: NaiveDate) -> String {
    let partial = if partial { " for part of" } else { "" };
    format!(
        "{name} is on leave{partial} today, returning to work {}.",
        calendar(back, today)
    )
}

/// Join list sentences; an empty list becomes [`NO_ONE_ON_LEAVE`].
pub fn join_list_results(results: &[String]) -> String {
    if results.is_empty() {
        NO_ONE_ON_LEAVE.to_string()
    } else {
        results.join(LINE_BREAK)
    }
}

/// Join mention sentences; an empty list stays empty so nothing is posted.
pub fn join_mention_results(results: &[String]) -> String {
    results.join(LINE_BREAK)
}
