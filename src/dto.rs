//! JSON envelopes returned by the `/v1` routes.

use serde::{Deserialize, Serialize};

use crate::{context::RequestContext, db::Page, models::ListItem};

/// OData-style paging parameters, `?$top=20&$skip=40`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "$top")]
    pub top: Option<i64>,
    #[serde(rename = "$skip")]
    pub skip: Option<i64>,
}

/// Echo of the request every envelope carries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseGeneric {
    pub request_id: String,
    pub request_url: String,
    pub tenant_id: String,
    pub machine: String,
}

impl ResponseGeneric {
    pub fn new(ctx: &RequestContext) -> Self {
        Self {
            request_id: ctx.request_id.clone(),
            request_url: ctx.request_url.clone(),
            tenant_id: ctx.tenant().to_owned(),
            machine: std::env::var("HOSTNAME").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItemResponse<T> {
    pub status: u16,
    pub message: &'static str,
    pub id: String,
    pub data: T,
    pub request: ResponseGeneric,
}

impl<T> ApiItemResponse<T> {
    pub fn success(item: ListItem<T>, ctx: &RequestContext) -> Self {
        Self {
            status: 200,
            message: "Success",
            id: item.id,
            data: item.data,
            request: ResponseGeneric::new(ctx),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArrayResponse<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: Vec<T>,
    pub total: usize,

    pub is_paged: bool,
    pub page: u64,
    pub page_size: u32,
    pub page_count: u64,

    pub link: String,
    pub request: ResponseGeneric,
}

impl<T> ApiArrayResponse<T> {
    pub fn success(data: Vec<T>, ctx: &RequestContext) -> Self {
        Self {
            status: 200,
            message: "success",
            total: data.len(),
            data,
            is_paged: false,
            page: 0,
            page_size: 0,
            page_count: 0,
            link: ctx.request_url.clone(),
            request: ResponseGeneric::new(ctx),
        }
    }

    /// `page_count` only counts the pages seen so far; there is no total row
    /// count query.
    pub fn ranged(data: Vec<T>, page: Page, ctx: &RequestContext) -> Self {
        Self {
            is_paged: true,
            page: page.number(),
            page_size: page.top,
            page_count: page.number() + 1,
            ..Self::success(data, ctx)
        }
    }
}

/// Shared shape of insert, update and delete acknowledgements.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIdResponse {
    pub status: u16,
    pub message: &'static str,
    pub id: String,
    pub request: ResponseGeneric,
}

pub type ApiInsertResponse = ApiIdResponse;
pub type ApiUpdateResponse = ApiIdResponse;
pub type ApiDeleteResponse = ApiIdResponse;

impl ApiIdResponse {
    pub fn success(id: String, ctx: &RequestContext) -> Self {
        Self {
            status: 200,
            message: "Success",
            id,
            request: ResponseGeneric::new(ctx),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLookupResponse {
    pub status: u16,
    pub message: &'static str,
    pub items: Vec<LookupItem>,
    pub link: String,
    pub request: ResponseGeneric,
}

impl ApiLookupResponse {
    pub fn success(items: Vec<LookupItem>, ctx: &RequestContext) -> Self {
        Self {
            status: 200,
            message: "success",
            items,
            link: ctx.request_url.clone(),
            request: ResponseGeneric::new(ctx),
        }
    }
}
