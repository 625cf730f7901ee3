pub const USERS: &str = "users";
pub const CHATS: &str = "chats";
pub const MESSAGES: &str = "messages";
pub const CHAT_USERS: &str = "chat_users";

/// Table layout of a tenant store. Run once per tenant, safe to repeat.
pub const CREATE_TABLES: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (id TEXT PRIMARY KEY, name TEXT, email TEXT NOT NULL, role TEXT, avatar TEXT, created_at TEXT NOT NULL, updated_at TEXT NOT NULL)",
    "CREATE TABLE IF NOT EXISTS chats (id TEXT PRIMARY KEY, name TEXT, last_message TEXT, last_message_time INTEGER, last_message_by TEXT, last_message_by_id TEXT, last_message_by_avatar TEXT, created_at TEXT NOT NULL, updated_at TEXT NOT NULL)",
    "CREATE TABLE IF NOT EXISTS messages (id TEXT PRIMARY KEY, chat_id TEXT NOT NULL, user_id TEXT NOT NULL, message TEXT NOT NULL, timestamp INTEGER NOT NULL, created_at TEXT NOT NULL, updated_at TEXT NOT NULL)",
    "CREATE TABLE IF NOT EXISTS chat_users (id TEXT PRIMARY KEY, chat_id TEXT NOT NULL, user_id TEXT NOT NULL, unread_message_count INTEGER NOT NULL DEFAULT 0, created_at TEXT NOT NULL, updated_at TEXT NOT NULL)",
];

/// Table names reach SQL by concatenation, so only plain identifiers pass.
pub fn is_table_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names() {
        assert!(is_table_name(CHAT_USERS));
        assert!(!is_table_name(""));
        assert!(!is_table_name("users; DROP TABLE chats"));
        assert!(!is_table_name("main.users"));
    }
}
