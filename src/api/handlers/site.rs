use actix_web::{web, HttpResponse};

use super::{found, SiteDefaults, Store};
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, MoveRequest};
use crate::models::{NewSocialLink, SiteSettings, SiteSettingsInput, SocialLinkPatch};

/// Saved settings, or the built-in defaults before the first save.
pub async fn get_site_settings(
    store: Store,
    defaults: web::Data<SiteDefaults>,
) -> ApiResult<HttpResponse> {
    let settings = store
        .site_settings()
        .await?
        .unwrap_or_else(|| SiteSettings::defaults(&defaults.whatsapp_number));
    Ok(HttpResponse::Ok().json(settings))
}

pub async fn update_site_settings(
    store: Store,
    body: web::Json<SiteSettingsInput>,
) -> ApiResult<HttpResponse> {
    let input = validated(body.into_inner().normalized())?;
    let saved = store.update_site_settings(&input).await?;
    tracing::info!("site settings updated");
    Ok(HttpResponse::Ok().json(saved))
}

/// Footer links: active only, in display order.
pub async fn list_active_social_links(store: Store) -> ApiResult<HttpResponse> {
    let links: Vec<_> = store
        .list_social_links()
        .await?
        .into_iter()
        .filter(|l| l.is_active)
        .collect();
    Ok(HttpResponse::Ok().json(links))
}

pub async fn list_social_links(store: Store) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_social_links().await?))
}

pub async fn create_social_link(
    store: Store,
    body: web::Json<NewSocialLink>,
) -> ApiResult<HttpResponse> {
    let input = validated(body.into_inner())?;
    Ok(HttpResponse::Created().json(store.create_social_link(&input).await?))
}

pub async fn update_social_link(
    store: Store,
    path: web::Path<i64>,
    body: web::Json<SocialLinkPatch>,
) -> ApiResult<HttpResponse> {
    let patch = validated(body.into_inner())?;
    let updated = store.update_social_link(path.into_inner(), &patch).await?;
    Ok(HttpResponse::Ok().json(found(updated, "Social link")?))
}

pub async fn delete_social_link(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    store.delete_social_link(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}

/// Swaps the link with its neighbour and returns the full reordered list.
pub async fn move_social_link(
    store: Store,
    path: web::Path<i64>,
    body: web::Json<MoveRequest>,
) -> ApiResult<HttpResponse> {
    let links = store
        .swap_social_link_order(path.into_inner(), body.direction)
        .await?;
    Ok(HttpResponse::Ok().json(found(links, "Social link")?))
}
