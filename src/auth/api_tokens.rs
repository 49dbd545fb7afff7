use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, Role};
use crate::error::{internal_error, AppResult};

#[derive(sqlx::FromRow)]
struct ApiTokenUserRow {
    token_id: Uuid,
    user_id: i64,
    email: String,
    role: String,
    venture_ids: Vec<i64>,
    office_ids: Vec<i64>,
}

pub(crate) fn api_token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub(crate) async fn resolve_api_token(
    db: &PgPool,
    token: &str,
) -> AppResult<Option<AuthenticatedUser>> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }
    let token_hash = api_token_hash(token);

    let row: Option<ApiTokenUserRow> = sqlx::query_as(
        r#"
        SELECT t.id AS token_id,
               u.id AS user_id,
               u.email,
               u.role,
               COALESCE(u.venture_ids, '{}') AS venture_ids,
               COALESCE(u.office_ids, '{}') AS office_ids
        FROM api_tokens t
        JOIN users u ON u.id = t.user_id
        WHERE t.token_hash = $1
          AND t.revoked_at IS NULL
          AND (t.expires_at IS NULL OR t.expires_at > NOW())
        LIMIT 1
        "#,
    )
    .bind(token_hash)
    .fetch_optional(db)
    .await
    .map_err(internal_error)?;

    let Some(row) = row else {
        return Ok(None);
    };

    if let Err(err) = sqlx::query("UPDATE api_tokens SET last_used_at = $2 WHERE id = $1")
        .bind(row.token_id)
        .bind(Utc::now())
        .execute(db)
        .await
    {
        tracing::debug!(error = %err, "failed to record api token use");
    }

    Ok(Some(AuthenticatedUser {
        id: row.user_id,
        email: row.email,
        role: Role::canonicalize(&row.role),
        venture_ids: row.venture_ids,
        office_ids: row.office_ids,
        source: "api_token".to_string(),
    }))
}
