use axum::{Json, response::IntoResponse};

use crate::api::types::Hello;

#[utoipa::path(
    get,
    path = "/hello",
    responses(
        (status = 200, description = "Gateway is up", body = Hello)
    ),
    tag = "vestly"
)]
// axum handler for hello
pub async fn hello() -> impl IntoResponse {
    Json(Hello::new())
}
