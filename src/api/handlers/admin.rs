use actix_session::Session;
use actix_web::{web, HttpResponse};
use tracing::{info, warn};

use super::Store;
use crate::api::auth::{current_admin, sign_in, sign_out, AdminIdentity};
use crate::api::error::{validated, ApiError, ApiResult};
use crate::api::models::{Ack, AdminCreated, LoginRequest, LoginResponse, SessionStatus};
use crate::models::NewAdmin;
use crate::util::password::{hash_password, verify_password};

pub async fn login(
    store: Store,
    session: Session,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = body.into_inner();
    let admin = store
        .admin_by_username(username.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let stored_hash = admin.password_hash.clone();
    let verified = web::block(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    match verified {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::InvalidCredentials),
        Err(e) => {
            warn!(admin_id = admin.id, error = %e, "stored password hash is unusable");
            return Err(ApiError::InvalidCredentials);
        }
    }

    sign_in(&session, &admin)?;
    info!(admin_id = admin.id, "admin logged in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        username: admin.username,
    }))
}

pub async fn logout(session: Session) -> HttpResponse {
    sign_out(&session);
    HttpResponse::Ok().json(Ack::ok())
}

pub async fn session_status(session: Session) -> HttpResponse {
    let admin = current_admin(&session);
    HttpResponse::Ok().json(SessionStatus {
        authenticated: admin.is_some(),
        username: admin.map(|a| a.username),
    })
}

/// Open while the admins table is empty so the first account can be created;
/// afterwards only a signed-in admin may add accounts.
pub async fn create_admin(
    store: Store,
    session: Session,
    body: web::Json<NewAdmin>,
) -> ApiResult<HttpResponse> {
    if store.count_admins().await? > 0 && current_admin(&session).is_none() {
        return Err(ApiError::Unauthorized);
    }
    let input = validated(body.into_inner())?;

    let password = input.password;
    let hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(|e| ApiError::Internal(e.into()))?;

    let admin = store.create_admin(input.username.trim(), &hash).await?;
    info!(admin_id = admin.id, "admin account created via API");
    Ok(HttpResponse::Ok().json(AdminCreated {
        success: true,
        id: admin.id,
    }))
}

pub async fn dashboard(store: Store, admin: AdminIdentity) -> ApiResult<HttpResponse> {
    let counts = store.counts().await?;
    tracing::debug!(admin = %admin.username, "dashboard counts served");
    Ok(HttpResponse::Ok().json(counts))
}
