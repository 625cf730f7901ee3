mod chat;
mod members;
mod messages;

use axum::{routing::{get, put}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats", get(chat::list_chats).post(chat::insert_chat))
        .route("/chats/{id}", get(chat::get_chat).put(chat::update_chat))
        .route("/chats/{id}/users", get(members::list_members).post(members::add_member))
        .route(
            "/chats/{id}/users/{user}",
            put(members::update_member).delete(members::remove_member),
        )
        .route(
            "/chats/{id}/messages",
            get(messages::list_messages).post(messages::insert_message),
        )
        .route("/messages/{id}", get(messages::get_message).put(messages::update_message))
}
