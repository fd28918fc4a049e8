use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::{found, Store};
use crate::api::auth::{current_admin, AdminIdentity};
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, ReviewsQuery};
use crate::models::NewReview;

/// Admins may filter by `?approved=true|false` or see everything; visitors
/// only ever get approved reviews whatever they ask for.
pub async fn list_reviews(
    store: Store,
    session: Session,
    query: web::Query<ReviewsQuery>,
) -> ApiResult<HttpResponse> {
    let approved = if current_admin(&session).is_some() {
        query.approved
    } else {
        Some(true)
    };
    Ok(HttpResponse::Ok().json(store.list_reviews(approved).await?))
}

/// Public submission; stored unapproved until moderated.
pub async fn create_review(store: Store, body: web::Json<NewReview>) -> ApiResult<HttpResponse> {
    let review = validated(body.into_inner().normalized())?;
    let created = store.create_review(&review).await?;
    tracing::info!(review_id = created.id, rating = created.rating, "review submitted");
    Ok(HttpResponse::Ok().json(created))
}

pub async fn approve_review(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let review = found(store.approve_review(path.into_inner()).await?, "Review")?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    store.delete_review(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}
