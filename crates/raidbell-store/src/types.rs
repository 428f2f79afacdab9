use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Weekday token as stored in the `days` column.
///
/// Parsing is exact-token only: `"mon"` parses, `"Mon"` and `"tu"` do not.
/// Membership checks on a `Vec<Day>` therefore can never produce the
/// substring false positives a raw `days.contains(weekday_str)` would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
            Day::Sun => "sun",
        }
    }

    /// Token for a clock-derived chrono weekday.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Mon,
            Weekday::Tue => Day::Tue,
            Weekday::Wed => Day::Wed,
            Weekday::Thu => Day::Thu,
            Weekday::Fri => Day::Fri,
            Weekday::Sat => Day::Sat,
            Weekday::Sun => Day::Sun,
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Day {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mon" => Ok(Day::Mon),
            "tue" => Ok(Day::Tue),
            "wed" => Ok(Day::Wed),
            "thu" => Ok(Day::Thu),
            "fri" => Ok(Day::Fri),
            "sat" => Ok(Day::Sat),
            "sun" => Ok(Day::Sun),
            other => Err(StoreError::InvalidEvent(format!(
                "unknown weekday token: {other:?}"
            ))),
        }
    }
}

/// Parse the CSV column form, e.g. `"mon,wed,fri"`.
pub fn parse_days(csv: &str) -> Result<Vec<Day>> {
    csv.split(',').map(|token| token.trim().parse()).collect()
}

/// Serialise weekday tokens back to the CSV column form.
pub fn days_to_csv(days: &[Day]) -> String {
    days.iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Matching-rule category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fires once, on a specific calendar date.
    Once,
    /// Fires every week on a single weekday.
    WeeklySingle,
    /// Fires every week on several weekdays.
    WeeklyMulti,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::Once => "once",
            EventKind::WeeklySingle => "weekly_single",
            EventKind::WeeklyMulti => "weekly_multi",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EventKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "once" => Ok(EventKind::Once),
            "weekly_single" => Ok(EventKind::WeeklySingle),
            "weekly_multi" => Ok(EventKind::WeeklyMulti),
            other => Err(StoreError::InvalidEvent(format!(
                "unknown event kind: {other:?}"
            ))),
        }
    }
}

/// A persisted reminder definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub kind: EventKind,
    /// Weekday tokens; empty for one-off events.
    pub days: Vec<Day>,
    /// Calendar date; set only for one-off events.
    pub date: Option<NaiveDate>,
    /// Fire time, minute granularity, local bot time.
    pub time: NaiveTime,
    pub description: String,
    /// Date of the most recent delivery — the at-most-once guard.
    pub last_fired_on: Option<NaiveDate>,
}

/// Event definition as submitted by an admin, before it has an id.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub kind: EventKind,
    pub days: Vec<Day>,
    pub date: Option<NaiveDate>,
    pub time: NaiveTime,
    pub description: String,
}

impl NewEvent {
    pub fn once(date: NaiveDate, time: NaiveTime, description: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Once,
            days: Vec::new(),
            date: Some(date),
            time,
            description: description.into(),
        }
    }

    /// A weekly event; one day makes it single-day, several make it multi-day.
    pub fn weekly(days: Vec<Day>, time: NaiveTime, description: impl Into<String>) -> Self {
        let kind = if days.len() == 1 {
            EventKind::WeeklySingle
        } else {
            EventKind::WeeklyMulti
        };
        Self {
            kind,
            days,
            date: None,
            time,
            description: description.into(),
        }
    }

    /// Enforce the kind invariants of the data model.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(StoreError::InvalidEvent(msg.to_string()));
        match self.kind {
            EventKind::Once => {
                if self.date.is_none() {
                    return fail("one-off event requires a date");
                }
                if !self.days.is_empty() {
                    return fail("one-off event must not set weekdays");
                }
            }
            EventKind::WeeklySingle => {
                if self.date.is_some() {
                    return fail("weekly event must not set a date");
                }
                if self.days.len() != 1 {
                    return fail("single-day weekly event requires exactly one weekday");
                }
            }
            EventKind::WeeklyMulti => {
                if self.date.is_some() {
                    return fail("weekly event must not set a date");
                }
                if self.days.is_empty() {
                    return fail("weekly event requires at least one weekday");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn day_tokens_roundtrip() {
        for day in Day::ALL {
            assert_eq!(day.as_str().parse::<Day>().unwrap(), day);
        }
    }

    #[test]
    fn partial_and_cased_tokens_rejected() {
        assert!("tu".parse::<Day>().is_err());
        assert!("su".parse::<Day>().is_err());
        assert!("Mon".parse::<Day>().is_err());
        assert!("monday".parse::<Day>().is_err());
        assert!("".parse::<Day>().is_err());
    }

    #[test]
    fn chrono_weekdays_map_to_tokens() {
        assert_eq!(Day::from_weekday(Weekday::Mon), Day::Mon);
        assert_eq!(Day::from_weekday(Weekday::Sun), Day::Sun);
    }

    #[test]
    fn csv_roundtrip() {
        let days = parse_days("mon,wed,fri").unwrap();
        assert_eq!(days, vec![Day::Mon, Day::Wed, Day::Fri]);
        assert_eq!(days_to_csv(&days), "mon,wed,fri");
    }

    #[test]
    fn csv_tolerates_spaces() {
        assert_eq!(parse_days("tue, thu").unwrap(), vec![Day::Tue, Day::Thu]);
    }

    #[test]
    fn csv_rejects_bad_tokens() {
        assert!(parse_days("mon,funday").is_err());
        assert!(parse_days("").is_err());
    }

    #[test]
    fn kind_tokens_roundtrip() {
        for kind in [EventKind::Once, EventKind::WeeklySingle, EventKind::WeeklyMulti] {
            assert_eq!(kind.to_string().parse::<EventKind>().unwrap(), kind);
        }
        assert!("weekly".parse::<EventKind>().is_err());
    }

    #[test]
    fn weekly_constructor_picks_kind_by_day_count() {
        let single = NewEvent::weekly(vec![Day::Sun], t("09:00"), "x");
        assert_eq!(single.kind, EventKind::WeeklySingle);

        let multi = NewEvent::weekly(vec![Day::Mon, Day::Fri], t("09:00"), "x");
        assert_eq!(multi.kind, EventKind::WeeklyMulti);
    }

    #[test]
    fn validate_enforces_kind_invariants() {
        let date = "2024-06-15".parse().unwrap();

        let mut once = NewEvent::once(date, t("14:00"), "x");
        assert!(once.validate().is_ok());
        once.days = vec![Day::Mon];
        assert!(once.validate().is_err());

        let mut once = NewEvent::once(date, t("14:00"), "x");
        once.date = None;
        assert!(once.validate().is_err());

        let mut weekly = NewEvent::weekly(vec![Day::Mon], t("14:00"), "x");
        assert!(weekly.validate().is_ok());
        weekly.date = Some(date);
        assert!(weekly.validate().is_err());

        let empty = NewEvent::weekly(Vec::new(), t("14:00"), "x");
        assert!(empty.validate().is_err());
    }
}
