//! Admin allowlist for the command surface.
//!
//! Deny-by-default: an empty `admin_users` list means nobody can manage
//! events. Entries are Telegram usernames (leading `@` optional) or
//! numeric user ids; matching is case-sensitive like the Telegram API.

/// Returns `true` when the sender may use the admin commands.
pub fn is_admin(admin_users: &[String], username: &str, user_id: &str) -> bool {
    if admin_users.is_empty() {
        return false;
    }
    admin_users.iter().any(|entry| {
        let entry = entry.trim_start_matches('@');
        entry == username || entry == user_id
    })
}
