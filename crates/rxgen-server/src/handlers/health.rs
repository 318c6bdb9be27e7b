use actix_web::{web, HttpResponse, Responder};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        generation_configured: state.generation_service.is_configured(),
    })
}
