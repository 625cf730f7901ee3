use axum::{debug_handler, extract::{Path, Query, State}, Json};
use serde::Deserialize;

use crate::{
    config::Config,
    context::RequestContext,
    db::DatabaseAccess,
    dto::{ApiArrayResponse, ApiInsertResponse, ApiItemResponse, ApiUpdateResponse, PageQuery},
    models::{ListItem, Message, MessageListItem},
    AppResult, AppState,
};

/// Author and timestamp always come from the caller, never from the body.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    message: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn list_messages(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(chat_id): Path<String>,
    Query(PageQuery { top, skip }): Query<PageQuery>,
) -> AppResult<Json<ApiArrayResponse<ListItem<MessageListItem>>>> {
    let db = DatabaseAccess::new(&config, &ctx);
    let messages = db.messages_for_chat(&chat_id, top, skip).await?;

    Ok(Json(ApiArrayResponse::ranged(messages, db.page(top, skip), &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn insert_message(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(chat_id): Path<String>,
    Json(MessageBody { message }): Json<MessageBody>,
) -> AppResult<Json<ApiInsertResponse>> {
    let id = DatabaseAccess::new(&config, &ctx).insert_message(&chat_id, &message).await?;
    Ok(Json(ApiInsertResponse::success(id, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn get_message(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiItemResponse<Message>>> {
    let message = DatabaseAccess::new(&config, &ctx).get_message(&id).await?;
    Ok(Json(ApiItemResponse::success(message, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_message(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(MessageBody { message }): Json<MessageBody>,
) -> AppResult<Json<ApiUpdateResponse>> {
    let id = DatabaseAccess::new(&config, &ctx).update_message(&id, &message).await?;
    Ok(Json(ApiUpdateResponse::success(id, &ctx)))
}
