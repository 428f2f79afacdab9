use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use tracing::info;

use crate::db::init_db;
use crate::error::{Result, StoreError};
use crate::types::{days_to_csv, parse_days, Event, NewEvent};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

/// Shared handle to the `events` table.
///
/// Clones share one `Connection` behind a mutex. The engine and the admin
/// handlers each get their own `EventStore` over their own connection, so
/// a slow scan never blocks an insert.
#[derive(Clone)]
pub struct EventStore {
    conn: Arc<Mutex<Connection>>,
}

impl EventStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a validated event definition. Returns the stored record.
    pub fn add_event(&self, new: NewEvent) -> Result<Event> {
        new.validate()?;
        let conn = self.conn.lock().unwrap();
        let days = if new.days.is_empty() {
            None
        } else {
            Some(days_to_csv(&new.days))
        };
        let date = new.date.map(|d| d.format(DATE_FMT).to_string());

        conn.execute(
            "INSERT INTO events (kind, days, date, time, description, last_fired_on)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
            rusqlite::params![
                new.kind.to_string(),
                days,
                date,
                new.time.format(TIME_FMT).to_string(),
                new.description,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(event_id = id, kind = %new.kind, "event added");

        Ok(Event {
            id,
            kind: new.kind,
            days: new.days,
            date: new.date,
            time: new.time,
            description: new.description,
            last_fired_on: None,
        })
    }

    /// Full scan in id order — the engine reads this once per tick.
    pub fn list_events(&self) -> Result<Vec<Event>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, kind, days, date, time, description, last_fired_on
             FROM events ORDER BY id",
        )?;
        let events = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,            // id
                    row.get::<_, String>(1)?,         // kind
                    row.get::<_, Option<String>>(2)?, // days CSV
                    row.get::<_, Option<String>>(3)?, // date
                    row.get::<_, String>(4)?,         // time
                    row.get::<_, String>(5)?,         // description
                    row.get::<_, Option<String>>(6)?, // last_fired_on
                ))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(id, kind, days, date, time, description, fired)| {
                Some(Event {
                    id,
                    kind: kind.parse().ok()?,
                    days: match days {
                        Some(csv) => parse_days(&csv).ok()?,
                        None => Vec::new(),
                    },
                    date: date.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
                    time: NaiveTime::parse_from_str(&time, TIME_FMT).ok()?,
                    description,
                    last_fired_on: fired
                        .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
                })
            })
            .collect();
        Ok(events)
    }

    /// Delete by id. Returns `EventNotFound` when no row matches.
    pub fn delete_event(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::EventNotFound { id });
        }
        info!(event_id = id, "event deleted");
        Ok(())
    }

    /// Stamp the at-most-once marker after a successful delivery.
    pub fn mark_fired(&self, id: i64, on: NaiveDate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE events SET last_fired_on = ?1 WHERE id = ?2",
            rusqlite::params![on.format(DATE_FMT).to_string(), id],
        )?;
        if n == 0 {
            return Err(StoreError::EventNotFound { id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Day, EventKind};

    fn store() -> EventStore {
        EventStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn once_event_roundtrip() {
        let store = store();
        let added = store
            .add_event(NewEvent::once(d("2024-06-15"), t("14:00"), "Raid"))
            .unwrap();

        let listed = store.list_events().unwrap();
        assert_eq!(listed, vec![added]);
        assert_eq!(listed[0].kind, EventKind::Once);
        assert_eq!(listed[0].date, Some(d("2024-06-15")));
        assert!(listed[0].days.is_empty());
        assert_eq!(listed[0].last_fired_on, None);
    }

    #[test]
    fn weekly_event_roundtrip() {
        let store = store();
        let days = vec![Day::Mon, Day::Wed, Day::Fri];
        let added = store
            .add_event(NewEvent::weekly(days.clone(), t("09:00"), "Guild training"))
            .unwrap();

        assert_eq!(added.kind, EventKind::WeeklyMulti);
        let listed = store.list_events().unwrap();
        assert_eq!(listed[0].days, days);
        assert_eq!(listed[0].date, None);
    }

    #[test]
    fn single_day_weekly_roundtrip() {
        let store = store();
        let added = store
            .add_event(NewEvent::weekly(vec![Day::Sun], t("20:30"), "Officers"))
            .unwrap();
        assert_eq!(added.kind, EventKind::WeeklySingle);
        assert_eq!(store.list_events().unwrap()[0].days, vec![Day::Sun]);
    }

    #[test]
    fn invalid_definitions_rejected() {
        let store = store();

        let mut bad = NewEvent::once(d("2024-06-15"), t("14:00"), "x");
        bad.days = vec![Day::Mon];
        assert!(matches!(
            store.add_event(bad),
            Err(StoreError::InvalidEvent(_))
        ));

        let mut bad = NewEvent::weekly(vec![Day::Mon], t("14:00"), "x");
        bad.date = Some(d("2024-06-15"));
        assert!(matches!(
            store.add_event(bad),
            Err(StoreError::InvalidEvent(_))
        ));

        assert!(store.list_events().unwrap().is_empty());
    }

    #[test]
    fn duplicate_definitions_get_distinct_ids() {
        // No dedup invariant: only id is unique.
        let store = store();
        let new = NewEvent::weekly(vec![Day::Tue, Day::Thu], t("18:00"), "PvP");
        let a = store.add_event(new.clone()).unwrap();
        let b = store.add_event(new).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_events().unwrap().len(), 2);
    }

    #[test]
    fn delete_removes_row() {
        let store = store();
        let added = store
            .add_event(NewEvent::once(d("2024-06-15"), t("14:00"), "Raid"))
            .unwrap();
        store.delete_event(added.id).unwrap();
        assert!(store.list_events().unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_errors() {
        let store = store();
        assert!(matches!(
            store.delete_event(42),
            Err(StoreError::EventNotFound { id: 42 })
        ));
    }

    #[test]
    fn mark_fired_sets_marker() {
        let store = store();
        let added = store
            .add_event(NewEvent::weekly(vec![Day::Wed], t("09:00"), "Standup"))
            .unwrap();

        store.mark_fired(added.id, d("2024-06-12")).unwrap();
        let listed = store.list_events().unwrap();
        assert_eq!(listed[0].last_fired_on, Some(d("2024-06-12")));

        assert!(matches!(
            store.mark_fired(999, d("2024-06-12")),
            Err(StoreError::EventNotFound { id: 999 })
        ));
    }
}
