//! Ledger route handlers. Bodies are JSON; every failure is `{"error": ...}`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use service::ledger::{
    input::{numeric, text_or_empty},
    AddUserInput, BalanceInput, IdInput, Ledger, LookupInput, ProfileView, UserInput,
};

use crate::{errors::ApiError, state::AppState};

const LOOKUP_FAILED: &str = "Failed to fetch Steam info";
const RESOLVE_FAILED: &str = "Failed to resolve Steam ID";

type Body<T> = Result<Json<T>, JsonRejection>;

#[derive(Serialize)]
pub struct Success {
    pub success: bool,
}

fn success() -> Json<Success> {
    Json(Success { success: true })
}

/// `POST /api/steam-info`
pub async fn steam_info(
    State(state): State<AppState>,
    body: Body<LookupInput>,
) -> Result<Json<ProfileView>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError { message: LOOKUP_FAILED.into(), ..ApiError::from(e) })?;
    // a missing URL fails the grammar like any other bad URL
    let url = input.profile_url().unwrap_or_default();
    let view = state
        .ledger
        .lookup(url)
        .await
        .map_err(|e| ApiError::collapse(e, LOOKUP_FAILED))?;
    info!(steam_id = %view.id, level = view.level, "profile lookup served");
    Ok(Json(view))
}

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Ledger>, ApiError> {
    Ok(Json(state.ledger.list().await?))
}

/// `POST /api/update-balance`
pub async fn update_balance(
    State(state): State<AppState>,
    body: Body<BalanceInput>,
) -> Result<Json<Success>, ApiError> {
    let Json(input) = body?;
    let (id, balance) = input.validate()?;
    state.ledger.set_balance(&id, balance).await?;
    Ok(success())
}

/// `POST /api/update-user`
pub async fn update_user(
    State(state): State<AppState>,
    body: Body<UserInput>,
) -> Result<Json<Success>, ApiError> {
    let Json(input) = body?;
    let id = input.require_id()?;
    state
        .ledger
        .set_user(&id, numeric(&input.balance), text_or_empty(&input.warning))
        .await?;
    Ok(success())
}

/// `POST /api/toggle-ban`
pub async fn toggle_ban(
    State(state): State<AppState>,
    body: Body<IdInput>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = body?;
    let banned = state.ledger.toggle_ban(&input.require_id()?).await?;
    Ok(Json(json!({ "banned": banned })))
}

/// `POST /api/get-warning`
pub async fn get_warning(
    State(state): State<AppState>,
    body: Body<IdInput>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = body?;
    let warning = state.ledger.warning(&input.require_id()?).await?;
    Ok(Json(json!({ "warning": warning })))
}

/// `POST /api/remove-user`
pub async fn remove_user(
    State(state): State<AppState>,
    body: Body<IdInput>,
) -> Result<Json<Success>, ApiError> {
    let Json(input) = body?;
    state.ledger.remove(&input.require_id()?).await?;
    Ok(success())
}

/// `POST /api/add-user`
pub async fn add_user(
    State(state): State<AppState>,
    body: Body<AddUserInput>,
) -> Result<Json<Success>, ApiError> {
    let Json(input) = body?;
    let url = input.require_profile_url()?;
    let steam_id = state
        .ledger
        .add_user(url, numeric(&input.balance), text_or_empty(&input.warning))
        .await
        .map_err(|e| ApiError::collapse(e, RESOLVE_FAILED))?;
    info!(%steam_id, "admin added user");
    Ok(success())
}
