// Cookie-session admin gate for the dashboard API

use actix_session::{
    config::PersistentSession, storage::CookieSessionStore, Session, SessionExt,
    SessionMiddleware,
};
use actix_web::{
    body::{BoxBody, EitherBody},
    cookie::{time::Duration, Key, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpRequest, HttpResponse,
};
use futures::future::LocalBoxFuture;
use sha2::{Digest, Sha512};
use std::future::{ready, Ready};

use crate::api::error::ApiError;
use crate::models::Admin;

pub const SESSION_COOKIE: &str = "salamawy_session";
const ADMIN_ID_KEY: &str = "admin_id";
const USERNAME_KEY: &str = "username";
const SESSION_TTL_HOURS: i64 = 24;

/// Cookie key derived from `SESSION_SECRET`. SHA-512 gives the 64 bytes
/// `Key` needs for signing and encryption regardless of secret length.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_http_only(true)
        .cookie_secure(secure)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// The admin attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub id: i64,
    pub username: String,
}

pub fn current_admin(session: &Session) -> Option<AdminIdentity> {
    let id = session.get::<i64>(ADMIN_ID_KEY).ok().flatten()?;
    let username = session.get::<String>(USERNAME_KEY).ok().flatten()?;
    Some(AdminIdentity { id, username })
}

/// Stores the admin in a fresh session (new cookie value, no fixation).
pub fn sign_in(session: &Session, admin: &Admin) -> Result<(), ApiError> {
    session.renew();
    session
        .insert(ADMIN_ID_KEY, admin.id)
        .and_then(|_| session.insert(USERNAME_KEY, &admin.username))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("session insert failed: {e}")))
}

pub fn sign_out(session: &Session) {
    session.purge();
}

impl FromRequest for AdminIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_admin(&req.get_session()).ok_or(ApiError::Unauthorized))
    }
}

/// Rejects requests that carry no admin session with 401 JSON. Wrapped
/// around the admin scope, so it only sees requests the router already
/// matched there. Must run inside `SessionMiddleware`.
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminMiddleware { service }))
    }
}

pub struct RequireAdminMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAdminMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if current_admin(&req.get_session()).is_some() {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        tracing::debug!(method = %req.method(), path = %req.path(), "rejected unauthenticated admin request");
        Box::pin(async move {
            let response = HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "Unauthorized" }))
                .map_into_right_body();
            Ok(req.into_response(response))
        })
    }
}
