//! Admin command surface: single-message commands for managing events.
//!
//! Earlier generations of the bot walked admins through a multi-step
//! inline-keyboard flow; here every command carries its whole payload in
//! one message, so there is no conversation state to track.

use chrono::{NaiveDate, NaiveTime};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::warn;

use raidbell_core::config::TelegramConfig;
use raidbell_store::{days_to_csv, parse_days, Event, EventKind, EventStore, NewEvent, StoreError};

use crate::allow;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum AdminCommand {
    #[command(description = "show available commands")]
    Help,
    #[command(description = "list all scheduled events")]
    Events,
    #[command(
        description = "add an event: /add once YYYY-MM-DD HH:MM text, or /add weekly mon,wed,fri HH:MM text"
    )]
    Add(String),
    #[command(description = "delete an event by id: /delete 3")]
    Delete(String),
}

/// Dispatcher endpoint for admin commands.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: AdminCommand,
    store: EventStore,
    config: TelegramConfig,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        return Ok(());
    }
    let username = from.username.as_deref().unwrap_or("");
    let user_id = from.id.0.to_string();
    if !allow::is_admin(&config.admin_users, username, &user_id) {
        // Non-admins get silence, same as any other chatter.
        return Ok(());
    }

    let reply = match cmd {
        AdminCommand::Help => AdminCommand::descriptions().to_string(),
        AdminCommand::Events => match store.list_events() {
            Ok(events) => format_event_list(&events),
            Err(e) => {
                warn!("event listing failed: {e}");
                "⚠️ Could not read the event list.".to_string()
            }
        },
        AdminCommand::Add(args) => match parse_add(&args) {
            Ok(new) => match store.add_event(new) {
                Ok(event) => format!("✅ Event {} saved.", event.id),
                Err(e) => {
                    warn!("event insert failed: {e}");
                    "⚠️ Could not save the event.".to_string()
                }
            },
            Err(e) => format!("⚠️ {e}"),
        },
        AdminCommand::Delete(args) => match args.trim().parse::<i64>() {
            Ok(id) => match store.delete_event(id) {
                Ok(()) => "🗑️ Event deleted.".to_string(),
                Err(StoreError::EventNotFound { id }) => {
                    format!("⚠️ No event with id {id}.")
                }
                Err(e) => {
                    warn!("event delete failed: {e}");
                    "⚠️ Could not delete the event.".to_string()
                }
            },
            Err(_) => "⚠️ Usage: /delete <id>".to_string(),
        },
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

const ADD_USAGE: &str =
    "Usage: /add once YYYY-MM-DD HH:MM text, or /add weekly mon,wed,fri HH:MM text";

/// Parse `/add` arguments into an event definition.
///
/// Forms:
/// - `once YYYY-MM-DD HH:MM description…`
/// - `weekly day[,day…] HH:MM description…` — one day makes a single-day
///   weekly event, several make a multi-day one.
pub fn parse_add(args: &str) -> Result<NewEvent, String> {
    let mut words = args.split_whitespace();
    let form = words.next().ok_or_else(|| ADD_USAGE.to_string())?;
    let when = words.next().ok_or_else(|| ADD_USAGE.to_string())?;
    let time_token = words.next().ok_or_else(|| ADD_USAGE.to_string())?;
    let description = words.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(ADD_USAGE.to_string());
    }

    let time = NaiveTime::parse_from_str(time_token, "%H:%M")
        .map_err(|_| format!("Bad time {time_token:?}, expected HH:MM"))?;

    match form {
        "once" => {
            let date = NaiveDate::parse_from_str(when, "%Y-%m-%d")
                .map_err(|_| format!("Bad date {when:?}, expected YYYY-MM-DD"))?;
            Ok(NewEvent::once(date, time, description))
        }
        "weekly" => {
            let days = parse_days(when).map_err(|e| e.to_string())?;
            Ok(NewEvent::weekly(days, time, description))
        }
        other => Err(format!("Unknown event form {other:?}. {ADD_USAGE}")),
    }
}

/// Plain-text event listing for the admin chat.
pub fn format_event_list(events: &[Event]) -> String {
    if events.is_empty() {
        return "⚠️ No events scheduled.".to_string();
    }
    let mut text = String::from("📋 Events:\n\n");
    for event in events {
        let when = match event.kind {
            EventKind::Once => event
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            EventKind::WeeklySingle | EventKind::WeeklyMulti => days_to_csv(&event.days),
        };
        text.push_str(&format!(
            "🆔 {} | {}\n📅 {} ⏰ {}\n📝 {}\n\n",
            event.id,
            kind_label(event.kind),
            when,
            event.time.format("%H:%M"),
            event.description,
        ));
    }
    text.push_str("To delete: /delete <id>");
    text
}

fn kind_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Once => "one-off",
        EventKind::WeeklySingle => "weekly (one day)",
        EventKind::WeeklyMulti => "weekly (several days)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raidbell_store::Day;

    #[test]
    fn parse_add_once() {
        let new = parse_add("once 2024-06-15 14:00 Raid night").unwrap();
        assert_eq!(new.kind, EventKind::Once);
        assert_eq!(new.date, Some("2024-06-15".parse().unwrap()));
        assert_eq!(new.time, NaiveTime::parse_from_str("14:00", "%H:%M").unwrap());
        assert_eq!(new.description, "Raid night");
        assert!(new.days.is_empty());
    }

    #[test]
    fn parse_add_weekly_single_day() {
        let new = parse_add("weekly sun 20:30 Officers meeting").unwrap();
        assert_eq!(new.kind, EventKind::WeeklySingle);
        assert_eq!(new.days, vec![Day::Sun]);
        assert_eq!(new.description, "Officers meeting");
    }

    #[test]
    fn parse_add_weekly_multi_day() {
        let new = parse_add("weekly mon,wed,fri 09:00 Guild training").unwrap();
        assert_eq!(new.kind, EventKind::WeeklyMulti);
        assert_eq!(new.days, vec![Day::Mon, Day::Wed, Day::Fri]);
    }

    #[test]
    fn parse_add_rejects_bad_input() {
        assert!(parse_add("").is_err());
        assert!(parse_add("once 2024-06-15 14:00").is_err()); // no description
        assert!(parse_add("once 15.06.2024 14:00 Raid").is_err()); // bad date
        assert!(parse_add("once 2024-06-15 25:99 Raid").is_err()); // bad time
        assert!(parse_add("weekly funday 09:00 Raid").is_err()); // bad token
        assert!(parse_add("daily mon 09:00 Raid").is_err()); // unknown form
    }

    #[test]
    fn event_list_mentions_ids_and_descriptions() {
        let events = vec![
            Event {
                id: 1,
                kind: EventKind::Once,
                days: Vec::new(),
                date: Some("2024-06-15".parse().unwrap()),
                time: NaiveTime::parse_from_str("14:00", "%H:%M").unwrap(),
                description: "Raid".to_string(),
                last_fired_on: None,
            },
            Event {
                id: 2,
                kind: EventKind::WeeklyMulti,
                days: vec![Day::Tue, Day::Thu],
                date: None,
                time: NaiveTime::parse_from_str("18:00", "%H:%M").unwrap(),
                description: "PvP".to_string(),
                last_fired_on: None,
            },
        ];
        let text = format_event_list(&events);
        assert!(text.contains("🆔 1"));
        assert!(text.contains("2024-06-15"));
        assert!(text.contains("🆔 2"));
        assert!(text.contains("tue,thu"));
        assert!(text.contains("/delete"));
    }

    #[test]
    fn empty_event_list_has_placeholder() {
        assert!(format_event_list(&[]).contains("No events"));
    }
}
