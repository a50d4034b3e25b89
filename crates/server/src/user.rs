use axum::{Json, extract::State};

use crate::{
    ServerError, ServerState,
    extract::ApiJson,
    types::user::{Token, UserNew},
};
use engine::NewUser;

/// Registers an account and logs it in straight away.
pub(crate) async fn register(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<UserNew>,
) -> Result<Json<Token>, ServerError> {
    let user = state
        .engine
        .register_user(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    tracing::info!(user = %user.id, "new user registered");

    let token = state.tokens.issue(user.id)?;
    Ok(Json(Token { token }))
}
