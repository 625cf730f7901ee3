//! Entity operations for one request against one tenant store.
//!
//! Multi-statement operations here are not atomic: each statement opens its
//! own connection and commits on its own. A failure part-way leaves the
//! earlier statements applied.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::{
    config::Config,
    context::RequestContext,
    models::{ChatDetail, ChatListItem, ChatMembership, ChatUser, ListItem, Message, MessageListItem, User},
};

use super::{
    error::{StoreError, StoreResult},
    executor::Executor,
    mapper::{to_list_item, to_raw_list_item, to_record},
    page::Page,
    schema::{is_table_name, CHATS, CHAT_USERS, CREATE_TABLES, MESSAGES, USERS},
    upsert::{now_millis, now_rfc3339, update, upsert},
};

pub struct DatabaseAccess<'a> {
    ctx: &'a RequestContext,
    executor: Executor,
    max_page_size: u32,
}

impl<'a> DatabaseAccess<'a> {
    pub fn new(config: &Config, ctx: &'a RequestContext) -> Self {
        let location = config.tenant_store().resolve(ctx.tenant_id.as_deref());
        Self {
            ctx,
            executor: Executor::new(location),
            max_page_size: config.max_page_size,
        }
    }

    pub fn page(&self, top: Option<i64>, skip: Option<i64>) -> Page {
        Page::resolve(top, skip, self.max_page_size)
    }

    pub async fn init_system(&self) -> StoreResult<()> {
        info!(tenant = self.ctx.tenant(), "creating tables");
        for statement in CREATE_TABLES {
            self.executor.execute(statement, &[]).await?;
        }
        Ok(())
    }

    pub async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let rows = self
            .executor
            .query_many_lenient("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name", &[])
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|mut row| match row.remove("name") {
                Some(Value::String(name)) => Some(name),
                _ => None,
            })
            .collect())
    }

    /// Every column of every row in `table`, one page at a time.
    pub async fn records(
        &self,
        table: &str,
        top: Option<i64>,
        skip: Option<i64>,
    ) -> StoreResult<Vec<ListItem<Map<String, Value>>>> {
        if !is_table_name(table) {
            return Err(StoreError::InvalidTable(table.to_owned()));
        }

        let sql = self.page(top, skip).apply(&format!("SELECT * FROM {table}"));
        let rows = self.executor.query_many_lenient(&sql, &[]).await?;
        Ok(rows.into_iter().map(to_raw_list_item).collect())
    }

    // users

    pub async fn get_user(&self, id: &str) -> StoreResult<ListItem<User>> {
        let row = self
            .executor
            .query_one(&format!("SELECT * FROM {USERS} WHERE id = ?"), &[json!(id)])
            .await
            .map_err(|e| not_found(e, "user", id))?;
        to_list_item(row)
    }

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<ListItem<User>>> {
        self.executor
            .query_optional(&format!("SELECT * FROM {USERS} WHERE email = ?"), &[json!(email)])
            .await?
            .map(to_list_item)
            .transpose()
    }

    /// Email is the natural key: a known email updates that user in place.
    pub async fn upsert_user(&self, user: &User) -> StoreResult<String> {
        let existing = self.find_user_by_email(&user.email).await?;
        let id = upsert(&self.executor, USERS, user, existing.as_ref().map(|u| u.id.as_str())).await?;
        debug!(%id, email = %user.email, created = existing.is_none(), "user upserted");
        Ok(id)
    }

    /// Updates `id` without letting its email collide with another user. An
    /// unknown `id` whose email is already taken lands on that user instead.
    pub async fn update_user(&self, id: &str, user: &User) -> StoreResult<String> {
        let target = match self.find_user_by_email(&user.email).await? {
            Some(holder) if holder.id != id => {
                if self.user_exists(id).await? {
                    return Err(StoreError::Conflict(format!("email {} belongs to user {}", user.email, holder.id)));
                }
                holder.id
            }
            _ => id.to_owned(),
        };
        upsert(&self.executor, USERS, user, Some(target.as_str())).await
    }

    async fn user_exists(&self, id: &str) -> StoreResult<bool> {
        let row = self
            .executor
            .query_optional(&format!("SELECT id FROM {USERS} WHERE id = ?"), &[json!(id)])
            .await?;
        Ok(row.is_some())
    }

    // chats

    /// Creates the chat, adds the caller, then every listed member other than
    /// the caller. All with zero unread messages.
    pub async fn insert_chat(&self, chat: &ChatDetail) -> StoreResult<String> {
        let chat_id = upsert(&self.executor, CHATS, chat, None).await?;
        self.upsert_chat_membership(&chat_id, &self.ctx.user_id, 0).await?;

        for member in &chat.chat_users {
            let Some(user_id) = self.resolve_member(member).await? else {
                continue;
            };
            if user_id == self.ctx.user_id {
                continue;
            }
            self.upsert_chat_membership(&chat_id, &user_id, 0).await?;
        }

        info!(%chat_id, members = chat.chat_users.len(), "chat created");
        Ok(chat_id)
    }

    pub async fn update_chat(&self, id: &str, chat: &ChatDetail) -> StoreResult<String> {
        upsert(&self.executor, CHATS, chat, Some(id)).await
    }

    pub async fn get_chat(&self, id: &str) -> StoreResult<ListItem<ChatDetail>> {
        let row = self
            .executor
            .query_one(&format!("SELECT * FROM {CHATS} WHERE id = ?"), &[json!(id)])
            .await
            .map_err(|e| not_found(e, "chat", id))?;

        let mut chat: ListItem<ChatDetail> = to_list_item(row)?;
        chat.data.chat_users = self.chat_members(id).await?;
        Ok(chat)
    }

    /// Chats `user_id` belongs to, most recently active first.
    pub async fn chats_for_user(
        &self,
        user_id: &str,
        top: Option<i64>,
        skip: Option<i64>,
    ) -> StoreResult<Vec<ListItem<ChatListItem>>> {
        let sql = self.page(top, skip).apply(&format!(
            "SELECT {CHATS}.*, {CHAT_USERS}.unread_message_count FROM {CHATS} \
             INNER JOIN {CHAT_USERS} ON {CHAT_USERS}.chat_id = {CHATS}.id \
             WHERE {CHAT_USERS}.user_id = ? ORDER BY {CHATS}.updated_at DESC"
        ));
        let rows = self.executor.query_many_lenient(&sql, &[json!(user_id)]).await?;
        rows.into_iter().map(to_list_item).collect()
    }

    // memberships

    /// Email-shaped input is turned into a user id, creating the user if
    /// needed. Anything else is taken as a user id.
    pub async fn resolve_user_id(&self, user_or_email: &str) -> StoreResult<String> {
        if is_email(user_or_email) {
            let user = User { email: user_or_email.to_owned(), ..Default::default() };
            return self.upsert_user(&user).await;
        }
        Ok(user_or_email.to_owned())
    }

    async fn resolve_member(&self, member: &ChatUser) -> StoreResult<Option<String>> {
        match (&member.user_id, &member.email) {
            (Some(user_id), _) => Ok(Some(user_id.clone())),
            (None, Some(email)) => {
                let user = User { email: email.clone(), name: member.name.clone(), ..Default::default() };
                self.upsert_user(&user).await.map(Some)
            }
            (None, None) => Ok(None),
        }
    }

    async fn find_membership_id(&self, chat_id: &str, user_id: &str) -> StoreResult<Option<String>> {
        let row = self
            .executor
            .query_optional(
                &format!("SELECT id FROM {CHAT_USERS} WHERE chat_id = ? AND user_id = ?"),
                &[json!(chat_id), json!(user_id)],
            )
            .await?;

        Ok(row.and_then(|mut row| match row.remove("id") {
            Some(Value::String(id)) => Some(id),
            _ => None,
        }))
    }

    /// Adds the user to the chat or, when already a member, sets the unread
    /// counter of the existing row. One row per (chat, user).
    pub async fn upsert_chat_membership(
        &self,
        chat_id: &str,
        user_or_email: &str,
        unread_message_count: i64,
    ) -> StoreResult<String> {
        let user_id = self.resolve_user_id(user_or_email).await?;
        let existing = self.find_membership_id(chat_id, &user_id).await?;

        let membership = ChatMembership {
            chat_id: chat_id.to_owned(),
            user_id,
            unread_message_count,
        };
        upsert(&self.executor, CHAT_USERS, &membership, existing.as_deref()).await
    }

    /// Returns the id of the removed row.
    pub async fn remove_chat_membership(&self, chat_id: &str, user_or_email: &str) -> StoreResult<String> {
        let user_id = if is_email(user_or_email) {
            self.find_user_by_email(user_or_email)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("user {user_or_email}")))?
                .id
        } else {
            user_or_email.to_owned()
        };

        let id = self
            .find_membership_id(chat_id, &user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("member {user_id} of chat {chat_id}")))?;

        self.executor
            .execute(&format!("DELETE FROM {CHAT_USERS} WHERE id = ?"), &[json!(id)])
            .await?;
        Ok(id)
    }

    pub async fn chat_members(&self, chat_id: &str) -> StoreResult<Vec<ChatUser>> {
        let rows = self
            .executor
            .query_many_lenient(
                &format!(
                    "SELECT {CHAT_USERS}.user_id, {USERS}.name, {USERS}.email, {CHAT_USERS}.unread_message_count \
                     FROM {CHAT_USERS} LEFT JOIN {USERS} ON {USERS}.id = {CHAT_USERS}.user_id \
                     WHERE {CHAT_USERS}.chat_id = ? ORDER BY {CHAT_USERS}.created_at"
                ),
                &[json!(chat_id)],
            )
            .await?;

        rows.into_iter().map(|row| to_record(row, true)).collect()
    }

    // messages

    /// Stores the message, bumps every member's unread counter and copies the
    /// message onto the chat's last-message fields. Three separate statements.
    pub async fn insert_message(&self, chat_id: &str, text: &str) -> StoreResult<String> {
        let message = self.stamped_message(chat_id, text);

        let id = upsert(&self.executor, MESSAGES, &message, None).await?;
        self.bump_unread_counts(chat_id).await?;
        self.stamp_last_message(&message).await?;

        debug!(%id, %chat_id, "message inserted");
        Ok(id)
    }

    /// Author and timestamp are taken from the current caller, not kept from
    /// the stored message.
    pub async fn update_message(&self, id: &str, text: &str) -> StoreResult<String> {
        let existing = self.get_message(id).await?;
        let message = self.stamped_message(&existing.data.chat_id, text);
        upsert(&self.executor, MESSAGES, &message, Some(id)).await
    }

    pub async fn get_message(&self, id: &str) -> StoreResult<ListItem<Message>> {
        let row = self
            .executor
            .query_one(&format!("SELECT * FROM {MESSAGES} WHERE id = ?"), &[json!(id)])
            .await
            .map_err(|e| not_found(e, "message", id))?;
        to_list_item(row)
    }

    /// Newest first, with the author's name and avatar.
    pub async fn messages_for_chat(
        &self,
        chat_id: &str,
        top: Option<i64>,
        skip: Option<i64>,
    ) -> StoreResult<Vec<ListItem<MessageListItem>>> {
        let sql = self.page(top, skip).apply(&format!(
            "SELECT {MESSAGES}.*, {USERS}.name AS user_name, {USERS}.avatar AS user_avatar FROM {MESSAGES} \
             LEFT JOIN {USERS} ON {USERS}.id = {MESSAGES}.user_id \
             WHERE {MESSAGES}.chat_id = ? ORDER BY {MESSAGES}.timestamp DESC, {MESSAGES}.id DESC"
        ));
        let rows = self.executor.query_many_lenient(&sql, &[json!(chat_id)]).await?;
        rows.into_iter().map(to_list_item).collect()
    }

    fn stamped_message(&self, chat_id: &str, text: &str) -> Message {
        Message {
            chat_id: chat_id.to_owned(),
            user_id: self.ctx.user_id.clone(),
            message: text.to_owned(),
            timestamp: now_millis(),
        }
    }

    async fn bump_unread_counts(&self, chat_id: &str) -> StoreResult<()> {
        self.executor
            .execute(
                &format!(
                    "UPDATE {CHAT_USERS} SET unread_message_count = unread_message_count + 1, updated_at = ? \
                     WHERE chat_id = ?"
                ),
                &[json!(now_rfc3339()?), json!(chat_id)],
            )
            .await
    }

    async fn stamp_last_message(&self, message: &Message) -> StoreResult<()> {
        let author = self.get_user(&message.user_id).await?;
        let summary = LastMessage {
            last_message: &message.message,
            last_message_time: message.timestamp,
            last_message_by: &author.data.email,
            last_message_by_id: &author.id,
            last_message_by_avatar: author.data.avatar.as_deref(),
        };
        update(&self.executor, CHATS, &message.chat_id, &summary).await
    }
}

/// Denormalized copy of the newest message kept on the chat row. Every field
/// is written, a missing avatar included.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LastMessage<'m> {
    last_message: &'m str,
    last_message_time: i64,
    last_message_by: &'m str,
    last_message_by_id: &'m str,
    last_message_by_avatar: Option<&'m str>,
}

fn is_email(value: &str) -> bool {
    value.contains('@')
}

fn not_found(err: StoreError, what: &str, id: &str) -> StoreError {
    match err {
        StoreError::NotFound(_) => StoreError::NotFound(format!("{what} {id}")),
        other => other,
    }
}
