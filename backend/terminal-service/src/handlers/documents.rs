/// Document handlers - template catalogue and DOCX generation
use actix_middleware::AuthUser;
use actix_web::{http::header, web, HttpResponse};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;
use crate::services::documents::DOCX_CONTENT_TYPE;
use crate::services::DocumentService;
use crate::state::AppState;

pub async fn list_templates(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(DocumentService::new(&state).templates())
}

pub async fn generate(
    state: web::Data<AppState>,
    user: AuthUser,
    template_id: web::Path<String>,
    form: web::Json<HashMap<String, Value>>,
) -> Result<HttpResponse> {
    let doc = DocumentService::new(&state)
        .generate(&user, &template_id, form.into_inner())
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(DOCX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.filename),
        ))
        .body(doc.bytes))
}
