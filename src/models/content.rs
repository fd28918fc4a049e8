//! Customer reviews, site-wide announcements and the blog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalization::slug::slugify;
use crate::validation::{FieldError, Validate, Validator};

fn default_true() -> bool {
    true
}

fn default_kind() -> String {
    "info".to_string()
}

/// Empty strings from optional form inputs mean "not provided".
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub game: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub game: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewReview {
    pub fn normalized(mut self) -> Self {
        self.email = blank_to_none(self.email).map(|e| e.trim().to_string());
        self.comment = blank_to_none(self.comment);
        self
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("name", &self.name)
            .required("game", &self.game)
            .rating("rating", self.rating)
            .email("email", self.email.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for NewAnnouncement {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("title", &self.title)
            .required("message", &self.message)
            .announcement_kind("type", &self.kind)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for AnnouncementPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required_opt("title", self.title.as_deref())
            .required_opt("message", self.message.as_deref());
        if let Some(kind) = &self.kind {
            v.announcement_kind("type", kind);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl NewBlogPost {
    /// Derives the slug from the title when the form left it empty, drops
    /// blank optionals and stamps `publishedAt` for posts created as published.
    pub fn normalized(mut self) -> Self {
        let slug = blank_to_none(self.slug.take())
            .map(|s| slugify(&s))
            .unwrap_or_else(|| slugify(&self.title));
        self.slug = Some(slug);
        self.excerpt = blank_to_none(self.excerpt);
        self.featured_image = blank_to_none(self.featured_image);
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        if !self.is_published {
            self.published_at = None;
        }
        self
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }
}

impl Validate for NewBlogPost {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required("title", &self.title)
            .required("content", &self.content)
            .check("slug", !self.slug().is_empty(), "is required");
        if let Some(image) = &self.featured_image {
            v.image("featuredImage", image);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    /// Absent keeps the stored value; a blank string clears it.
    pub excerpt: Option<String>,
    /// Same rule as `excerpt`.
    pub featured_image: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPostPatch {
    /// Slugifies an explicit slug, collapses blank optionals to `""` so storage
    /// stores NULL for them, and stamps `publishedAt` when publishing.
    pub fn normalized(mut self) -> Self {
        self.slug = self.slug.map(|s| slugify(&s));
        self.excerpt = self.excerpt.map(clear_if_blank);
        self.featured_image = self.featured_image.map(clear_if_blank);
        if self.is_published == Some(true) && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        self
    }
}

fn clear_if_blank(value: String) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        value
    }
}

impl Validate for BlogPostPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.required_opt("title", self.title.as_deref())
            .required_opt("content", self.content.as_deref())
            .required_opt("slug", self.slug.as_deref());
        if let Some(image) = self.featured_image.as_deref().filter(|i| !i.trim().is_empty()) {
            v.image("featuredImage", image);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogImage {
    pub id: i64,
    pub post_id: Option<i64>,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogImage {
    #[serde(default)]
    pub post_id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl Validate for NewBlogImage {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new().image("url", &self.url).finish()
    }
}
