use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use tracing::{debug, error};

use crate::api::{
    storage::list_booklets,
    types::{Booklet, ErrorBody},
};

#[utoipa::path(
    get,
    path = "/booklets",
    responses(
        (status = 200, description = "Every booklet, unfiltered", body = [Booklet]),
        (status = 500, description = "Database failure", body = ErrorBody)
    ),
    tag = "booklets"
)]
// Not scoped to the caller: no session is required and every row is returned.
pub async fn booklets(pool: Extension<PgPool>) -> impl IntoResponse {
    match list_booklets(&pool).await {
        Ok(booklets) => {
            debug!(count = booklets.len(), "listed booklets");
            (StatusCode::OK, Json(booklets)).into_response()
        }
        Err(err) => {
            error!("Failed to list booklets: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
        }
    }
}
