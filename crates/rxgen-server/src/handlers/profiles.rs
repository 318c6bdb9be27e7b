use actix_web::{web, HttpResponse};

use crate::dto::{CreateProfileRequest, ProfileListResponse, ProfileResponse};
use crate::error::Result;
use crate::state::AppState;

pub async fn create(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse> {
    let profile = state
        .profile_service
        .create_profile(req.name.as_deref(), req.master.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        ok: true,
        profile: profile.into(),
    }))
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let profiles = state.profile_service.list_profiles().await?;

    Ok(HttpResponse::Ok().json(ProfileListResponse {
        ok: true,
        profiles: profiles.into_iter().map(Into::into).collect(),
    }))
}
