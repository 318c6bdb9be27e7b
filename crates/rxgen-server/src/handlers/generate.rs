use actix_web::{web, HttpResponse};

use crate::dto::{GenerateRequest, GenerateResponse};
use crate::error::Result;
use crate::state::AppState;

pub async fn handler(
    state: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> Result<HttpResponse> {
    let outcome = state
        .generation_service
        .generate(req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        ok: true,
        text: outcome.text,
        extracted: outcome.extracted,
    }))
}
