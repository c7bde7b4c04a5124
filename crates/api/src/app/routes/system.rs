use axum::http::StatusCode;

pub async fn root() -> &'static str {
    "Server is running"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn public() -> &'static str {
    "This is a public route"
}
