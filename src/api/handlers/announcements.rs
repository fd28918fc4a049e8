use actix_web::{web, HttpResponse};

use super::{found, Store};
use crate::api::auth::AdminIdentity;
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, AnnouncementsQuery};
use crate::models::{AnnouncementPatch, NewAnnouncement};

pub async fn list_announcements(
    store: Store,
    query: web::Query<AnnouncementsQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_announcements(query.active).await?))
}

pub async fn create_announcement(
    _admin: AdminIdentity,
    store: Store,
    body: web::Json<NewAnnouncement>,
) -> ApiResult<HttpResponse> {
    let input = validated(body.into_inner())?;
    Ok(HttpResponse::Ok().json(store.create_announcement(&input).await?))
}

pub async fn update_announcement(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
    body: web::Json<AnnouncementPatch>,
) -> ApiResult<HttpResponse> {
    let patch = validated(body.into_inner())?;
    let updated = store.update_announcement(path.into_inner(), &patch).await?;
    Ok(HttpResponse::Ok().json(found(updated, "Announcement")?))
}

pub async fn delete_announcement(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    store.delete_announcement(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}
