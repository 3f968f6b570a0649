use axum::{extract::State, Json};
use axum_extra::extract::Query;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    dtos::member::{EmbeddedMembers, MemberResponse},
    error::AppError,
    middleware::{require_any_scope, AuthUser},
    services::store,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct FindByEmailParams {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct FindByIdsParams {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `GET /api/members/search/findByEmail` — lookup by the canonical key.
/// Tied to elevated trust: requires `write` or `trust`, so a read-only guest
/// token is refused even though the operation itself is a read.
pub async fn find_by_email(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<FindByEmailParams>,
) -> Result<Json<MemberResponse>, AppError> {
    require_any_scope(&claims, &["write", "trust"])?;

    let member = store::with_timeout(
        state.store_timeout,
        state.members.find_by_email(&params.email),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("no member with email {}", params.email)))?;

    Ok(Json(MemberResponse::from(member)))
}

/// `GET /api/members/search/findByIds?ids=..&ids=..` — bulk lookup, `read`
/// scope. Ids with no match, including ones that fail to parse, are omitted
/// from the result; order is unspecified.
pub async fn find_by_ids(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<FindByIdsParams>,
) -> Result<Json<EmbeddedMembers>, AppError> {
    require_any_scope(&claims, &["read"])?;

    let ids: Vec<Uuid> = params
        .ids
        .iter()
        .filter_map(|id| id.parse().ok())
        .collect();
    let members =
        store::with_timeout(state.store_timeout, state.members.find_by_ids(&ids)).await?;

    Ok(Json(EmbeddedMembers::new(
        members.into_iter().map(MemberResponse::from).collect(),
    )))
}
