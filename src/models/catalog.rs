//! Sellable catalog: game top-up products and social-media services, each
//! with its own list of price tiers.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{parse_price, FieldError, Validate, Validator};

fn default_category() -> String {
    "games".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit shown next to tier values ("UC", "Diamonds", "USD").
    pub currency: String,
    pub image: String,
    pub category: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub id: i64,
    pub product_id: i64,
    pub value: i32,
    pub label: String,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithPrices {
    #[serde(flatten)]
    pub product: Product,
    pub prices: Vec<ProductPrice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub currency: String,
    pub image: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("name", &self.name)
            .required("currency", &self.currency)
            .required("category", &self.category)
            .image("image", &self.image)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required_opt("name", self.name.as_deref())
            .required_opt("currency", self.currency.as_deref())
            .required_opt("category", self.category.as_deref());
        if let Some(image) = &self.image {
            v.image("image", image);
        }
        v.finish()
    }
}

/// A tier as submitted by the product form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductPrice {
    pub value: i32,
    pub label: String,
    pub price: String,
}

impl Validate for NewProductPrice {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .positive("value", self.value)
            .required("label", &self.label)
            .price("price", &self.price)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaService {
    pub id: i64,
    pub platform: String,
    pub service_type: String,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaPrice {
    pub id: i64,
    pub service_id: i64,
    pub quantity: i32,
    pub label: String,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaServiceWithPrices {
    #[serde(flatten)]
    pub service: SocialMediaService,
    pub prices: Vec<SocialMediaPrice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialMediaService {
    pub platform: String,
    pub service_type: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for NewSocialMediaService {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("platform", &self.platform)
            .required("serviceType", &self.service_type)
            .required("name", &self.name)
            .image("image", &self.image)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaServicePatch {
    pub platform: Option<String>,
    pub service_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for SocialMediaServicePatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required_opt("platform", self.platform.as_deref())
            .required_opt("serviceType", self.service_type.as_deref())
            .required_opt("name", self.name.as_deref());
        if let Some(image) = &self.image {
            v.image("image", image);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialMediaPrice {
    pub quantity: i32,
    pub label: String,
    pub price: String,
}

impl Validate for NewSocialMediaPrice {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .positive("quantity", self.quantity)
            .required("label", &self.label)
            .price("price", &self.price)
            .finish()
    }
}

/// A validated tier, common to products (`value`) and services (`quantity`).
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub amount: i32,
    pub label: String,
    pub price: BigDecimal,
}

impl TryFrom<&NewProductPrice> for Tier {
    type Error = &'static str;

    fn try_from(p: &NewProductPrice) -> Result<Self, Self::Error> {
        Ok(Tier {
            amount: p.value,
            label: p.label.trim().to_string(),
            price: parse_price(&p.price)?,
        })
    }
}

impl TryFrom<&NewSocialMediaPrice> for Tier {
    type Error = &'static str;

    fn try_from(p: &NewSocialMediaPrice) -> Result<Self, Self::Error> {
        Ok(Tier {
            amount: p.quantity,
            label: p.label.trim().to_string(),
            price: parse_price(&p.price)?,
        })
    }
}

/// Validates a list of submitted tiers and converts them for storage.
pub fn validate_tiers<'a, T>(tiers: &'a [T]) -> Result<Vec<Tier>, Vec<FieldError>>
where
    T: Validate,
    Tier: TryFrom<&'a T, Error = &'static str>,
{
    let mut v = Validator::new();
    for (i, tier) in tiers.iter().enumerate() {
        v.nested("prices", i, tier.validate());
    }
    v.finish()?;

    tiers
        .iter()
        .map(|t| Tier::try_from(t))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| {
            vec![FieldError {
                field: "prices".to_string(),
                message: message.to_string(),
            }]
        })
}
