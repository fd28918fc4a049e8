//! Editable site copy and the footer's social links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, Validate, Validator};

fn default_true() -> bool {
    true
}

/// Singleton row rendered into the public pages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_title: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub whatsapp_number: String,
    pub location: String,
    pub location_details: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SiteSettings {
    /// What the storefront shows before an admin has saved anything.
    pub fn defaults(whatsapp_number: &str) -> Self {
        Self {
            site_title: "Salamawy Store".to_string(),
            hero_title: "شحن ألعاب وخدمات سوشيال ميديا".to_string(),
            hero_subtitle: "Game top-ups, gift cards and social media services".to_string(),
            whatsapp_number: whatsapp_number.to_string(),
            location: "Egypt".to_string(),
            location_details: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsInput {
    pub site_title: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub whatsapp_number: String,
    pub location: String,
    #[serde(default)]
    pub location_details: Option<String>,
}

impl SiteSettingsInput {
    pub fn normalized(mut self) -> Self {
        self.whatsapp_number = self.whatsapp_number.trim().to_string();
        self.location_details = self.location_details.filter(|d| !d.trim().is_empty());
        self
    }
}

impl Validate for SiteSettingsInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("siteTitle", &self.site_title)
            .required("heroTitle", &self.hero_title)
            .required("heroSubtitle", &self.hero_subtitle)
            .whatsapp_number("whatsappNumber", &self.whatsapp_number)
            .required("location", &self.location)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: i64,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_active: bool,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "order", default)]
    pub sort_order: i32,
}

impl Validate for NewSocialLink {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("platform", &self.platform)
            .http_url("url", &self.url)
            .check("order", self.sort_order >= 0, "must not be negative")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkPatch {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl Validate for SocialLinkPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required_opt("platform", self.platform.as_deref());
        if let Some(url) = &self.url {
            v.http_url("url", url);
        }
        if let Some(order) = self.sort_order {
            v.check("order", order >= 0, "must not be negative");
        }
        v.finish()
    }
}

/// Which neighbour a social link trades places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Given links sorted by (order, id), finds the neighbour `id` swaps with.
/// Returns `None` when `id` is absent or already at the edge.
pub fn swap_partner(sorted: &[SocialLink], id: i64, direction: MoveDirection) -> Option<&SocialLink> {
    let pos = sorted.iter().position(|l| l.id == id)?;
    match direction {
        MoveDirection::Up => pos.checked_sub(1).and_then(|p| sorted.get(p)),
        MoveDirection::Down => sorted.get(pos + 1),
    }
}

/// New `order` values after moving `id` one step in `direction`.
///
/// Positions are compacted to `0..n` first so links sharing an `order` value
/// still move. Only links whose value changes are returned; `None` means `id`
/// is not in the list.
pub fn plan_move(sorted: &[SocialLink], id: i64, direction: MoveDirection) -> Option<Vec<(i64, i32)>> {
    let pos = sorted.iter().position(|l| l.id == id)?;
    let mut ids: Vec<i64> = sorted.iter().map(|l| l.id).collect();
    if let Some(partner) = swap_partner(sorted, id, direction) {
        let partner_pos = sorted.iter().position(|l| l.id == partner.id)?;
        ids.swap(pos, partner_pos);
    }

    let changes = ids
        .into_iter()
        .enumerate()
        .filter_map(|(idx, link_id)| {
            let new_order = idx as i32;
            let current = sorted.iter().find(|l| l.id == link_id)?.sort_order;
            (current != new_order).then_some((link_id, new_order))
        })
        .collect();
    Some(changes)
}
