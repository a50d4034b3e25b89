use api_types::{FieldError, Message, ValidationErrors};
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use auth::TokenKeys;
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod extract;
mod records;
mod server;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{ExpenseNew, ExpenseUpdate, ExpenseView};
    }

    pub mod transaction {
        pub use api_types::transaction::{TransactionNew, TransactionUpdate, TransactionView};
    }

    pub mod user {
        pub use api_types::user::{Login, Token, UserNew, UserView};
    }

    pub use api_types::{FieldError, Message, ValidationErrors};
}

const SERVER_ERROR: &str = "server error";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Unauthorized(&'static str),
    /// The request body could not be read as the expected JSON.
    BadRequest(String),
    Internal(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_)
        | EngineError::ExistingKey(_)
        | EngineError::InvalidCredentials => StatusCode::BAD_REQUEST,
        EngineError::Hashing(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            SERVER_ERROR.to_string()
        }
        EngineError::Hashing(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            SERVER_ERROR.to_string()
        }
        EngineError::Forbidden(detail) => {
            tracing::debug!("forbidden: {detail}");
            EngineError::Forbidden(detail).to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            ServerError::Engine(EngineError::Validation(violations)) => {
                let errors = violations
                    .into_iter()
                    .map(|violation| FieldError {
                        param: violation.field.to_string(),
                        msg: violation.message.to_string(),
                    })
                    .collect();
                return (StatusCode::BAD_REQUEST, Json(ValidationErrors { errors }))
                    .into_response();
            }
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
        };

        (status, Json(Message::new(msg))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected body: {rejection}");
        Self::BadRequest(rejection.body_text())
    }
}
