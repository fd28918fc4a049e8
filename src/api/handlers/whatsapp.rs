// Checkout links: every "buy" button resolves to a wa.me URL

use actix_web::{web, HttpResponse};

use super::{found, SiteDefaults, Store};
use crate::api::error::ApiResult;
use crate::api::models::{LangQuery, LinkResponse, WhatsappQuery};
use crate::whatsapp::{deep_link, inquiry_message, order_message, service_message};

async fn store_number(store: &Store, defaults: &SiteDefaults) -> ApiResult<String> {
    Ok(store
        .site_settings()
        .await?
        .map(|s| s.whatsapp_number)
        .unwrap_or_else(|| defaults.whatsapp_number.clone()))
}

/// Label of the requested tier, or the cheapest one when none is named.
fn pick_label<'a, T>(
    tiers: &'a [T],
    price_id: Option<i64>,
    id_of: impl Fn(&T) -> i64,
    label_of: impl Fn(&'a T) -> &'a str,
) -> ApiResult<Option<&'a str>> {
    match price_id {
        Some(pid) => {
            let tier = found(tiers.iter().find(|t| id_of(*t) == pid), "Price")?;
            Ok(Some(label_of(tier)))
        }
        None => Ok(tiers.first().map(label_of)),
    }
}

pub async fn product_link(
    store: Store,
    defaults: web::Data<SiteDefaults>,
    path: web::Path<i64>,
    query: web::Query<WhatsappQuery>,
) -> ApiResult<HttpResponse> {
    let product = store
        .get_product(path.into_inner())
        .await?
        .filter(|p| p.product.is_active);
    let product = found(product, "Product")?;

    // tiers come sorted by value, so the first is the smallest pack
    let label = pick_label(&product.prices, query.price_id, |t| t.id, |t| t.label.as_str())?
        .unwrap_or(product.product.currency.as_str());
    let message = order_message(query.lang, &product.product.name, label);

    let url = deep_link(&store_number(&store, &defaults).await?, &message);
    Ok(HttpResponse::Ok().json(LinkResponse { url }))
}

pub async fn service_link(
    store: Store,
    defaults: web::Data<SiteDefaults>,
    path: web::Path<i64>,
    query: web::Query<WhatsappQuery>,
) -> ApiResult<HttpResponse> {
    let service = store
        .get_service(path.into_inner())
        .await?
        .filter(|s| s.service.is_active);
    let service = found(service, "Service")?;

    let label = pick_label(&service.prices, query.price_id, |t| t.id, |t| t.label.as_str())?
        .unwrap_or(service.service.service_type.as_str());
    let message = service_message(query.lang, &service.service.name, label);

    let url = deep_link(&store_number(&store, &defaults).await?, &message);
    Ok(HttpResponse::Ok().json(LinkResponse { url }))
}

pub async fn inquiry_link(
    store: Store,
    defaults: web::Data<SiteDefaults>,
    query: web::Query<LangQuery>,
) -> ApiResult<HttpResponse> {
    let url = deep_link(
        &store_number(&store, &defaults).await?,
        inquiry_message(query.lang),
    );
    Ok(HttpResponse::Ok().json(LinkResponse { url }))
}
