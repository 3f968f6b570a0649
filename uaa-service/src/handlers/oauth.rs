use axum::{
    extract::{Query, State},
    Form, Json,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};

use crate::{dtos::oauth::TokenParams, error::AppError, services::TokenResponse, AppState};

/// `POST /oauth/token` — resource-owner password grant.
///
/// The client authenticates with HTTP Basic; grant parameters may arrive in
/// the query string or as a form body. A missing or unparseable Basic header
/// is an unauthenticated client, not a bad grant.
pub async fn token(
    State(state): State<AppState>,
    authorization: Option<TypedHeader<Authorization<Basic>>>,
    Query(query): Query<TokenParams>,
    form: Option<Form<TokenParams>>,
) -> Result<Json<TokenResponse>, AppError> {
    let TypedHeader(authorization) = authorization.ok_or(AppError::InvalidClient)?;

    let params = match form {
        Some(Form(form)) if form.grant_type.is_some() => form,
        _ => query,
    };

    let grant_type = params
        .grant_type
        .as_deref()
        .ok_or_else(|| AppError::InvalidGrant("missing grant_type".to_string()))?;
    let username = params
        .username
        .as_deref()
        .ok_or_else(|| AppError::InvalidGrant("missing username".to_string()))?;
    let password = params
        .password
        .as_deref()
        .ok_or_else(|| AppError::InvalidGrant("missing password".to_string()))?;

    let response = state
        .oauth
        .issue_token(
            authorization.username(),
            authorization.password(),
            grant_type,
            username,
            password,
        )
        .await?;

    Ok(Json(response))
}
