//! Records exchanged with the API and stored through the mapper.
//!
//! Field names are the API convention; the mapper turns them into columns.
//! Optional fields that are `None` are left out when serialized so an upsert
//! only touches the columns the caller actually supplied.

use serde::{Deserialize, Serialize};

/// A stored row split into its identifier and the rest of its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem<T> {
    pub id: String,
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Member as seen from a chat. On chat creation only `user_id` or `email`
/// is needed to name the member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_message_count: Option<i64>,
}

impl ChatUser {
    /// The user id if given, otherwise the email.
    pub fn reference(&self) -> Option<&str> {
        self.user_id.as_deref().or(self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_by_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_by_avatar: Option<String>,

    pub chat_users: Vec<ChatUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatListItem {
    pub name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_time: Option<i64>,
    pub last_message_by: Option<String>,
    pub last_message_by_id: Option<String>,
    pub last_message_by_avatar: Option<String>,
    pub unread_message_count: i64,
}

/// Row of `chat_users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMembership {
    pub chat_id: String,
    pub user_id: String,
    pub unread_message_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub chat_id: String,
    pub user_id: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageListItem {
    pub chat_id: String,
    pub user_id: String,
    pub message: String,
    pub timestamp: i64,

    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
}
