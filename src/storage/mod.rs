//! Persistence seam. Handlers only see `dyn Storage`; production runs on
//! Postgres (`PgStore`), tests and local demos on the in-process `MemStore`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::*;
use crate::util::db::Db;
use crate::util::env::{db_url, env_opt, env_parse};

pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (duplicate slug, username, ...).
    #[error("{0} already exists")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("{0} does not exist")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    async fn admin_by_username(&self, username: &str) -> StoreResult<Option<Admin>>;
    async fn create_admin(&self, username: &str, password_hash: &str) -> StoreResult<Admin>;
    async fn count_admins(&self) -> StoreResult<i64>;

    async fn list_products(&self, active_only: bool) -> StoreResult<Vec<ProductWithPrices>>;
    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductWithPrices>>;
    /// Inserts the product and its tiers atomically.
    async fn create_product(&self, product: &NewProduct, tiers: &[Tier]) -> StoreResult<ProductWithPrices>;
    async fn update_product(&self, id: i64, patch: &ProductPatch) -> StoreResult<Option<ProductWithPrices>>;
    /// Applies the patch and replaces every tier in one transaction.
    async fn update_product_with_prices(
        &self,
        id: i64,
        patch: &ProductPatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<ProductWithPrices>>;
    async fn delete_product(&self, id: i64) -> StoreResult<bool>;

    /// Newest first. `None` returns every review.
    async fn list_reviews(&self, approved: Option<bool>) -> StoreResult<Vec<Review>>;
    async fn create_review(&self, review: &NewReview) -> StoreResult<Review>;
    async fn approve_review(&self, id: i64) -> StoreResult<Option<Review>>;
    async fn delete_review(&self, id: i64) -> StoreResult<bool>;

    async fn list_announcements(&self, active_only: bool) -> StoreResult<Vec<Announcement>>;
    async fn create_announcement(&self, announcement: &NewAnnouncement) -> StoreResult<Announcement>;
    async fn update_announcement(
        &self,
        id: i64,
        patch: &AnnouncementPatch,
    ) -> StoreResult<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> StoreResult<bool>;

    async fn list_services(&self, active_only: bool) -> StoreResult<Vec<SocialMediaServiceWithPrices>>;
    async fn get_service(&self, id: i64) -> StoreResult<Option<SocialMediaServiceWithPrices>>;
    async fn create_service(
        &self,
        service: &NewSocialMediaService,
        tiers: &[Tier],
    ) -> StoreResult<SocialMediaServiceWithPrices>;
    async fn update_service(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>>;
    async fn update_service_with_prices(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>>;
    async fn delete_service(&self, id: i64) -> StoreResult<bool>;

    /// `None` until an admin saves the settings form for the first time.
    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>>;
    async fn update_site_settings(&self, settings: &SiteSettingsInput) -> StoreResult<SiteSettings>;

    /// Ordered by (order, id).
    async fn list_social_links(&self) -> StoreResult<Vec<SocialLink>>;
    async fn create_social_link(&self, link: &NewSocialLink) -> StoreResult<SocialLink>;
    async fn update_social_link(&self, id: i64, patch: &SocialLinkPatch) -> StoreResult<Option<SocialLink>>;
    async fn delete_social_link(&self, id: i64) -> StoreResult<bool>;
    /// Trades `order` values with the neighbouring link in one transaction.
    /// Returns the reordered list, or `None` when `id` does not exist.
    /// Moving past either end leaves the order untouched.
    async fn swap_social_link_order(
        &self,
        id: i64,
        direction: MoveDirection,
    ) -> StoreResult<Option<Vec<SocialLink>>>;

    /// Published posts by `publishedAt` desc, or every post by `createdAt` desc.
    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>>;
    async fn blog_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>>;
    async fn get_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>>;
    async fn create_blog_post(&self, post: &NewBlogPost) -> StoreResult<BlogPost>;
    async fn update_blog_post(&self, id: i64, patch: &BlogPostPatch) -> StoreResult<Option<BlogPost>>;
    async fn delete_blog_post(&self, id: i64) -> StoreResult<bool>;
    /// Marks the post published, keeping an existing `publishedAt`.
    async fn publish_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>>;

    async fn list_blog_images(&self, post_id: Option<i64>) -> StoreResult<Vec<BlogImage>>;
    async fn create_blog_image(&self, image: &NewBlogImage) -> StoreResult<BlogImage>;
    async fn delete_blog_image(&self, id: i64) -> StoreResult<bool>;

    async fn counts(&self) -> StoreResult<StoreCounts>;
}

/// Opens the backend named by `STORAGE_BACKEND` (`postgres` unless set to `memory`).
pub async fn open_from_env() -> anyhow::Result<Arc<dyn Storage>> {
    let backend = env_opt("STORAGE_BACKEND").unwrap_or_else(|| "postgres".to_string());
    match backend.trim().to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => {
            let max_connections: u32 = env_parse("DB_MAX_CONNS", 10u32);
            let db = Db::connect(&db_url()?, max_connections).await?;
            Ok(Arc::new(PgStore::new(db)))
        }
        "memory" => {
            tracing::warn!("STORAGE_BACKEND=memory: data is lost on restart");
            Ok(Arc::new(MemStore::new()))
        }
        other => anyhow::bail!("unknown STORAGE_BACKEND {other:?} (expected postgres or memory)"),
    }
}
