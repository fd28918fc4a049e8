// API request/response models (DTOs) that are not schema entities

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    MoveDirection, NewProduct, NewProductPrice, NewSocialMediaPrice, NewSocialMediaService,
    ProductPatch, SocialMediaServicePatch,
};
use crate::whatsapp::Lang;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminCreated {
    pub success: bool,
    pub id: i64,
}

/// `{"success": true}` for deletes and logout.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Include inactive products; honoured for admins only.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub approved: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnnouncementsQuery {
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogImagesQuery {
    pub post_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsappQuery {
    /// Tier id; the cheapest tier is used when absent.
    pub price_id: Option<i64>,
    #[serde(default)]
    pub lang: Lang,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Lang,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product: NewProduct,
    #[serde(default)]
    pub prices: Vec<NewProductPrice>,
}

/// PUT body: `{product, prices}` replaces every tier, anything else is a
/// bare patch. The shape is picked by the presence of `prices` and then
/// decoded strictly, so a malformed tier list is a 400 and never a no-op.
#[derive(Debug)]
pub enum UpdateProductRequest {
    WithPrices {
        product: ProductPatch,
        prices: Vec<NewProductPrice>,
    },
    Patch(ProductPatch),
}

impl<'de> Deserialize<'de> for UpdateProductRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match decode_update(deserializer, "product")? {
            (product, Some(prices)) => Self::WithPrices { product, prices },
            (patch, None) => Self::Patch(patch),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub service: NewSocialMediaService,
    #[serde(default)]
    pub prices: Vec<NewSocialMediaPrice>,
}

/// Same shapes as `UpdateProductRequest`, keyed by `service`.
#[derive(Debug)]
pub enum UpdateServiceRequest {
    WithPrices {
        service: SocialMediaServicePatch,
        prices: Vec<NewSocialMediaPrice>,
    },
    Patch(SocialMediaServicePatch),
}

impl<'de> Deserialize<'de> for UpdateServiceRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match decode_update(deserializer, "service")? {
            (service, Some(prices)) => Self::WithPrices { service, prices },
            (patch, None) => Self::Patch(patch),
        })
    }
}

/// Splits an update body into the patch and, when `prices` is present, the
/// replacement tiers. With `prices` the patch sits under `owner`; without it
/// the whole body is the patch and a stray `owner` key is rejected.
fn decode_update<'de, D, P, T>(
    deserializer: D,
    owner: &str,
) -> Result<(P, Option<Vec<T>>), D::Error>
where
    D: Deserializer<'de>,
    P: DeserializeOwned,
    T: DeserializeOwned,
{
    let mut body = Value::deserialize(deserializer)?;
    let map = body
        .as_object_mut()
        .ok_or_else(|| D::Error::custom("expected a JSON object"))?;

    match map.remove("prices") {
        None | Some(Value::Null) => {
            if map.contains_key(owner) {
                return Err(D::Error::custom(format!("`{owner}` requires a `prices` list")));
            }
            let patch = serde_json::from_value(body).map_err(D::Error::custom)?;
            Ok((patch, None))
        }
        Some(prices) => {
            let patch = map
                .remove(owner)
                .ok_or_else(|| D::Error::missing_field("product or service"))?;
            let patch = serde_json::from_value(patch)
                .map_err(|e| D::Error::custom(format!("{owner}: {e}")))?;
            let prices = serde_json::from_value(prices)
                .map_err(|e| D::Error::custom(format!("prices: {e}")))?;
            Ok((patch, Some(prices)))
        }
    }
}
