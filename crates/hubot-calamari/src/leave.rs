use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Wire format for dates sent to and received from Calamari.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One approved absence for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    /// Email the leave was requested for.
    pub email: String,
    /// First day of leave (inclusive).
    pub from: NaiveDate,
    /// Last day of leave (inclusive).
    pub to: NaiveDate,
    pub status: String,
    /// Only half of the first day is taken.
    pub first_day_half: bool,
    /// Only half of the last day is taken.
    pub last_day_half: bool,
}

impl Leave {
    /// Whether `day` falls within this leave, both ends inclusive.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Whether this leave shares at least one day with `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.from <= to && self.to >= from
    }

    /// Whether only part of `day` is taken off.
    pub fn is_partial_on(&self, day: NaiveDate) -> bool {
        (self.first_day_half && self.from == day) || (self.last_day_half && self.to == day)
    }
}

/// Absence record as returned by `/api/leave/request/v1/find`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AbsenceRecord {
    from: String,
    to: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    amount_first_day: Option<Value>,
    #[serde(default)]
    amount_last_day: Option<Value>,
}

impl AbsenceRecord {
    /// Convert into a [`Leave`] for `email`. Records with unreadable dates are skipped.
    pub(crate) fn into_leave(self, email: &str) -> Option<Leave> {
        let (Some(from), Some(to)) = (parse_day(&self.from), parse_day(&self.to)) else {
            warn!(email, from = %self.from, to = %self.to, "skipping absence with unreadable dates");
            return None;
        };
        Some(Leave {
            email: email.to_string(),
            from,
            to,
            status: self.status.unwrap_or_default(),
            first_day_half: is_half_day(self.amount_first_day.as_ref()),
            last_day_half: is_half_day(self.amount_last_day.as_ref()),
        })
    }
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// Calamari reports day amounts either as `"0.5"` or `0.5`.
fn is_half_day(amount: Option<&Value>) -> bool {
    match amount {
        Some(Value::String(s)) => s == "0.5",
        Some(Value::Number(n)) => n.as_f64() == Some(0.5),
        _ => false,
    }
}
