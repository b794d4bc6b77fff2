use actix_web::{error::InternalError, http::StatusCode, HttpResponse};

/// Build an actix error whose response carries the JSON body every Nexa
/// endpoint uses: `{ "message": ..., "status": ... }`.
pub fn json_error(status: StatusCode, message: &str) -> actix_web::Error {
    let body = serde_json::json!({
        "message": message,
        "status": status.as_u16(),
    });
    InternalError::from_response(message.to_string(), HttpResponse::build(status).json(body))
        .into()
}
