pub(crate) mod api_tokens;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sqlx::PgPool;
use std::future::Future;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Ceo,
    Admin,
    Coo,
    VentureHead,
    Auditor,
    Finance,
    HrAdmin,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Assigned,
}

impl Role {
    pub fn canonicalize(role: &str) -> Self {
        let trimmed = role.trim().to_uppercase().replace(['-', ' '], "_");
        match trimmed.as_str() {
            "CEO" => Self::Ceo,
            "ADMIN" => Self::Admin,
            "COO" | "DIRECTOR" => Self::Coo,
            "VENTURE_HEAD" => Self::VentureHead,
            "AUDITOR" => Self::Auditor,
            "FINANCE" => Self::Finance,
            "HR_ADMIN" => Self::HrAdmin,
            _ => Self::Other,
        }
    }

    pub fn venture_visibility(self) -> Visibility {
        match self {
            Self::Ceo | Self::Admin | Self::Coo | Self::Auditor | Self::Finance | Self::HrAdmin => {
                Visibility::All
            }
            Self::VentureHead | Self::Other => Visibility::Assigned,
        }
    }

    pub fn office_visibility(self) -> Visibility {
        match self {
            Self::VentureHead => Visibility::All,
            other => other.venture_visibility(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub venture_ids: Vec<i64>,
    pub office_ids: Vec<i64>,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    PgPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let db = PgPool::from_ref(state);
        let token_result = bearer_token(parts);

        async move {
            let token = token_result?;
            let user = api_tokens::resolve_api_token(&db, &token)
                .await?
                .ok_or_else(|| AppError::unauthorized("Missing or invalid token"))?;
            Ok(AuthUser(user))
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("Missing or invalid token"))
}
