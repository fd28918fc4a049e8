// HTTP request handlers, one module per resource

pub mod admin;
pub mod announcements;
pub mod blog;
pub mod health;
pub mod products;
pub mod reviews;
pub mod services;
pub mod site;
pub mod whatsapp;

use actix_web::web;

use crate::api::error::{ApiError, ApiResult};
use crate::storage::Storage;

/// Storage handle shared by every worker.
pub type Store = web::Data<dyn Storage>;

/// Values used when the admin has not configured the site yet.
#[derive(Debug, Clone)]
pub struct SiteDefaults {
    pub whatsapp_number: String,
}

/// Turns a missing row into `404 {"error": "<entity> not found"}`.
pub(crate) fn found<T>(value: Option<T>, entity: &'static str) -> ApiResult<T> {
    value.ok_or(ApiError::NotFound(entity))
}
