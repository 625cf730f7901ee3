use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{appresult::{AppError, Rejection}, db::DEFAULT_TENANT, db::upsert::new_id};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Who is calling, for which tenant. Built fresh for every request and handed
/// to [`crate::db::DatabaseAccess`] explicitly.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub tenant_id: Option<String>,
    pub user_id: String,
    pub user_email: Option<String>,
    pub role: Option<String>,
    pub request_id: String,
    pub request_url: String,
}

impl RequestContext {
    pub fn new(tenant_id: Option<&str>, user_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.map(str::to_owned),
            user_id: user_id.to_owned(),
            request_id: new_id(),
            ..Default::default()
        }
    }

    pub fn tenant(&self) -> &str {
        match self.tenant_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_TENANT,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role.as_deref(), Some("admin" | "superadmin"))
    }

    pub fn require_admin(&self) -> Result<(), Rejection> {
        if self.is_admin() { Ok(()) } else { Err(Rejection::Forbidden) }
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Identity comes from headers set by the authenticating proxy in front of
/// this service.
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(user_id) = header(parts, USER_ID_HEADER).filter(|id| !id.is_empty()) else {
            return Err(Rejection::Unauthenticated)?;
        };

        Ok(Self {
            tenant_id: header(parts, TENANT_HEADER),
            user_id,
            user_email: header(parts, USER_EMAIL_HEADER),
            role: header(parts, USER_ROLE_HEADER),
            request_id: header(parts, REQUEST_ID_HEADER).unwrap_or_else(new_id),
            request_url: parts.uri.to_string(),
        })
    }
}
