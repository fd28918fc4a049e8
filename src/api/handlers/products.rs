use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::{found, Store};
use crate::api::auth::{current_admin, AdminIdentity};
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, CreateProductRequest, ProductsQuery, UpdateProductRequest};
use crate::models::catalog::validate_tiers;

/// Active products for the storefront; `?all=true` adds inactive ones for admins.
pub async fn list_products(
    store: Store,
    session: Session,
    query: web::Query<ProductsQuery>,
) -> ApiResult<HttpResponse> {
    let include_inactive = query.all && current_admin(&session).is_some();
    let products = store.list_products(!include_inactive).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let product = found(store.get_product(path.into_inner()).await?, "Product")?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    _admin: AdminIdentity,
    store: Store,
    body: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse> {
    let CreateProductRequest { product, prices } = body.into_inner();
    let product = validated(product)?;
    let tiers = validate_tiers(&prices)?;

    let created = store.create_product(&product, &tiers).await?;
    tracing::info!(product_id = created.product.id, tiers = tiers.len(), "product created");
    Ok(HttpResponse::Ok().json(created))
}

pub async fn update_product(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
    body: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let updated = match body.into_inner() {
        UpdateProductRequest::WithPrices { product, prices } => {
            let patch = validated(product)?;
            let tiers = validate_tiers(&prices)?;
            store.update_product_with_prices(id, &patch, &tiers).await?
        }
        UpdateProductRequest::Patch(patch) => {
            let patch = validated(patch)?;
            store.update_product(id, &patch).await?
        }
    };
    Ok(HttpResponse::Ok().json(found(updated, "Product")?))
}

pub async fn delete_product(
    _admin: AdminIdentity,
    store: Store,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !store.delete_product(id).await? {
        tracing::debug!(product_id = id, "delete of missing product");
    }
    Ok(HttpResponse::Ok().json(Ack::ok()))
}
