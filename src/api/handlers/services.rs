use actix_web::{web, HttpResponse};

use super::{found, Store};
use crate::api::auth::AdminIdentity;
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, CreateServiceRequest, UpdateServiceRequest};
use crate::models::catalog::validate_tiers;

pub async fn list_services(store: Store) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_services(true).await?))
}

pub async fn get_service(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let service = found(store.get_service(path.into_inner()).await?, "Service")?;
    Ok(HttpResponse::Ok().json(service))
}

pub async fn create_service(
    _admin: AdminIdentity,
    store: Store,
    body: web::Json<CreateServiceRequest>,
) -> ApiResult<HttpResponse> {
    let CreateServiceRequest { service, prices } = body.into_inner();
    let service = validated(service)?;
    let tiers = validate_tiers(&prices)?;

    let created = store.create_service(&service, &tiers).await?;
    tracing::info!(service_id = created.service.id, tiers = tiers.len(), "social media service created");
    Ok(HttpResponse::Ok().json(created))
}

pub async fn update_service(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
    body: web::Json<UpdateServiceRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let updated = match body.into_inner() {
        UpdateServiceRequest::WithPrices { service, prices } => {
            let patch = validated(service)?;
            let tiers = validate_tiers(&prices)?;
            store.update_service_with_prices(id, &patch, &tiers).await?
        }
        UpdateServiceRequest::Patch(patch) => {
            let patch = validated(patch)?;
            store.update_service(id, &patch).await?
        }
    };
    Ok(HttpResponse::Ok().json(found(updated, "Service")?))
}

pub async fn delete_service(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    store.delete_service(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}
