use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};

use raidbell_store::{Day, Event, EventKind};

/// One clock reading, reduced to the parts the match rules care about.
///
/// Captured once per tick so every event in a pass sees the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStamp {
    pub date: NaiveDate,
    pub weekday: Day,
    /// Current time truncated to the minute.
    pub time: NaiveTime,
}

impl TickStamp {
    pub fn from_datetime(now: &DateTime<FixedOffset>) -> Self {
        let date = now.date_naive();
        let time = now.time();
        Self {
            date,
            weekday: Day::from_weekday(date.weekday()),
            // Fallback is unreachable for a valid clock reading.
            time: NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time),
        }
    }
}

/// Kind-specific match predicate: does `event` fire at `stamp`?
///
/// Minute-granularity equality — an event fires in exactly the one-minute
/// window where its stored time equals the truncated clock reading.
pub fn is_due(event: &Event, stamp: &TickStamp) -> bool {
    if event.time != stamp.time {
        return false;
    }
    match event.kind {
        EventKind::Once => event.date == Some(stamp.date),
        // Token membership, never exact-set equality or substring search.
        EventKind::WeeklySingle | EventKind::WeeklyMulti => event.days.contains(&stamp.weekday),
    }
}

/// Reminder text for a fired event. Telegram HTML; description escaped.
pub fn format_reminder(event: &Event) -> String {
    let label = match event.kind {
        EventKind::Once => "📌 <b>One-off event:</b>",
        EventKind::WeeklySingle => "🔁 <b>Weekly event:</b>",
        EventKind::WeeklyMulti => "🔁 <b>Recurring event:</b>",
    };
    format!(
        "{label} {}\n🕒 {}",
        escape_html(&event.description),
        event.time.format("%H:%M"),
    )
}

/// Escape the characters Telegram's HTML parse mode reserves.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
