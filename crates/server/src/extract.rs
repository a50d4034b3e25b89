use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::ServerError;

/// `Json` whose rejection is a `ServerError`, so malformed bodies get the
/// same `{msg}` shape as every other failure.
pub(crate) struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
