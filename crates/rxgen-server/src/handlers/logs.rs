use actix_web::{web, HttpResponse};

use crate::dto::{DeletedResponse, LogListResponse, OkResponse};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let name = path.into_inner();
    let logs = state.profile_service.list_logs(&name).await?;

    Ok(HttpResponse::Ok().json(LogListResponse { ok: true, logs }))
}

pub async fn delete_one(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (name, log_id) = path.into_inner();
    state.profile_service.delete_log(&name, &log_id).await?;

    Ok(HttpResponse::Ok().json(OkResponse { ok: true }))
}

pub async fn delete_all(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let deleted = state.profile_service.delete_logs(&name).await?;

    Ok(HttpResponse::Ok().json(DeletedResponse { ok: true, deleted }))
}
