use crate::response::ResponseData;
use axum::response::IntoResponse;

pub async fn health_route() -> impl IntoResponse {
    ResponseData::Healthy
}
