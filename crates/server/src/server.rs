use axum::{
    Json, Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{TokenKeys, auth, records, types::Message, user};
use engine::{Engine, Expense, Transaction};

const WELCOME: &str = "Welcome to the expense tracker API";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: TokenKeys,
}

async fn welcome() -> Json<Message> {
    Json(Message::new(WELCOME))
}

/// Every route of the API.
///
/// Handlers taking an [`auth::AuthUser`] reject unauthenticated requests
/// before their body runs. The rest are public.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/users", post(user::register))
        .route("/api/auth", get(auth::current_user).post(auth::login))
        .route(
            "/api/expenses",
            get(records::list::<Expense>).post(records::create::<Expense>),
        )
        .route(
            "/api/expenses/{id}",
            put(records::update::<Expense>).delete(records::delete::<Expense>),
        )
        .route(
            "/api/transactions",
            get(records::list::<Transaction>).post(records::create::<Transaction>),
        )
        .route(
            "/api/transactions/{id}",
            put(records::update::<Transaction>).delete(records::delete::<Transaction>),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens,
    };

    axum::serve(listener, router(state)).await
}
