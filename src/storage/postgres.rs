use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;
use tracing::{info, instrument};

use super::{Storage, StoreError, StoreResult};
use crate::models::site::plan_move;
use crate::models::*;
use crate::util::db::Db;

const PRODUCT_COLUMNS: &str =
    "id, name, currency, image, category, description, is_active, created_at, updated_at";
const PRODUCT_PRICE_COLUMNS: &str = "id, product_id, value, label, price, created_at";
const SERVICE_COLUMNS: &str = "id, platform, service_type, name, description, image, is_active, created_at, updated_at";
const SERVICE_PRICE_COLUMNS: &str = "id, service_id, quantity, label, price, created_at";
const REVIEW_COLUMNS: &str = "id, name, email, game, rating, comment, is_approved, created_at";
const ANNOUNCEMENT_COLUMNS: &str = "id, title, message, type, is_active, created_at, updated_at";
const SETTINGS_COLUMNS: &str = "site_title, hero_title, hero_subtitle, whatsapp_number, location, location_details, updated_at";
const SOCIAL_LINK_COLUMNS: &str = "id, platform, url, icon, is_active, sort_order, created_at";
const BLOG_POST_COLUMNS: &str = "id, title, slug, content, excerpt, featured_image, is_published, published_at, created_at, updated_at";
const BLOG_IMAGE_COLUMNS: &str = "id, post_id, url, alt_text, created_at";

/// Maps Postgres constraint violations onto domain errors.
fn classify(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => return StoreError::Conflict(what.to_string()),
            // foreign_key_violation
            Some("23503") => return StoreError::MissingReference(what.to_string()),
            _ => {}
        }
    }
    StoreError::Database(err)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self { pool: db.pool }
    }

    async fn product_prices(&self, ids: &[i64]) -> StoreResult<HashMap<i64, Vec<ProductPrice>>> {
        let sql = format!(
            "SELECT {PRODUCT_PRICE_COLUMNS} FROM product_prices WHERE product_id = ANY($1) ORDER BY product_id, value, id"
        );
        let rows: Vec<ProductPrice> = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;
        let mut grouped: HashMap<i64, Vec<ProductPrice>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn service_prices(&self, ids: &[i64]) -> StoreResult<HashMap<i64, Vec<SocialMediaPrice>>> {
        let sql = format!(
            "SELECT {SERVICE_PRICE_COLUMNS} FROM social_media_prices WHERE service_id = ANY($1) ORDER BY service_id, quantity, id"
        );
        let rows: Vec<SocialMediaPrice> = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;
        let mut grouped: HashMap<i64, Vec<SocialMediaPrice>> = HashMap::new();
        for row in rows {
            grouped.entry(row.service_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn attach_product_prices(&self, products: Vec<Product>) -> StoreResult<Vec<ProductWithPrices>> {
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let mut prices = self.product_prices(&ids).await?;
        Ok(products
            .into_iter()
            .map(|product| ProductWithPrices {
                prices: prices.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    async fn attach_service_prices(
        &self,
        services: Vec<SocialMediaService>,
    ) -> StoreResult<Vec<SocialMediaServiceWithPrices>> {
        let ids: Vec<i64> = services.iter().map(|s| s.id).collect();
        let mut prices = self.service_prices(&ids).await?;
        Ok(services
            .into_iter()
            .map(|service| SocialMediaServiceWithPrices {
                prices: prices.remove(&service.id).unwrap_or_default(),
                service,
            })
            .collect())
    }

    async fn insert_tiers(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        owner_column: &str,
        amount_column: &str,
        owner_id: i64,
        tiers: &[Tier],
    ) -> StoreResult<()> {
        if tiers.is_empty() {
            return Ok(());
        }
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {table} ({owner_column}, {amount_column}, label, price) "
        ));
        qb.push_values(tiers, |mut b, t| {
            b.push_bind(owner_id)
                .push_bind(t.amount)
                .push_bind(&t.label)
                .push_bind(&t.price);
        });
        qb.build().execute(&mut **tx).await?;
        Ok(())
    }

    async fn patch_product(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        patch: &ProductPatch,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET
                name = COALESCE($2, name),
                currency = COALESCE($3, currency),
                image = COALESCE($4, image),
                category = COALESCE($5, category),
                description = COALESCE($6, description),
                is_active = COALESCE($7, is_active),
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.currency.as_deref())
        .bind(patch.image.as_deref())
        .bind(patch.category.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.is_active)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn patch_service(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        patch: &SocialMediaServicePatch,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE social_media_services SET
                platform = COALESCE($2, platform),
                service_type = COALESCE($3, service_type),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                image = COALESCE($6, image),
                is_active = COALESCE($7, is_active),
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.platform.as_deref())
        .bind(patch.service_type.as_deref())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .bind(patch.is_active)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, bool>("SELECT true")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn admin_by_username(&self, username: &str) -> StoreResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    #[instrument(skip(self, password_hash))]
    async fn create_admin(&self, username: &str, password_hash: &str) -> StoreResult<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "admin username"))?;
        info!(admin_id = admin.id, "admin created");
        Ok(admin)
    }

    async fn count_admins(&self) -> StoreResult<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn list_products(&self, active_only: bool) -> StoreResult<Vec<ProductWithPrices>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE ($1 = false OR is_active) ORDER BY created_at, id"
        );
        let products: Vec<Product> = sqlx::query_as(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        self.attach_product_prices(products).await
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductWithPrices>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product: Option<Product> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match product {
            Some(p) => Ok(self.attach_product_prices(vec![p]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, product, tiers), fields(name = %product.name, tiers = tiers.len()))]
    async fn create_product(&self, product: &NewProduct, tiers: &[Tier]) -> StoreResult<ProductWithPrices> {
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, currency, image, category, description, is_active)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&product.name)
        .bind(&product.currency)
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.description.as_deref())
        .bind(product.is_active)
        .fetch_one(&mut *tx)
        .await?;
        Self::insert_tiers(&mut tx, "product_prices", "product_id", "value", id, tiers).await?;
        tx.commit().await?;

        self.get_product(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    #[instrument(skip(self, patch))]
    async fn update_product(&self, id: i64, patch: &ProductPatch) -> StoreResult<Option<ProductWithPrices>> {
        let mut tx = self.pool.begin().await?;
        let found = Self::patch_product(&mut tx, id, patch).await?;
        tx.commit().await?;
        if !found {
            return Ok(None);
        }
        self.get_product(id).await
    }

    #[instrument(skip(self, patch, tiers), fields(tiers = tiers.len()))]
    async fn update_product_with_prices(
        &self,
        id: i64,
        patch: &ProductPatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<ProductWithPrices>> {
        let mut tx = self.pool.begin().await?;
        if !Self::patch_product(&mut tx, id, patch).await? {
            return Ok(None);
        }
        sqlx::query("DELETE FROM product_prices WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_tiers(&mut tx, "product_prices", "product_id", "value", id, tiers).await?;
        tx.commit().await?;
        self.get_product(id).await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        // product_prices cascade
        self.delete_by_id("products", id).await
    }

    async fn list_reviews(&self, approved: Option<bool>) -> StoreResult<Vec<Review>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE ($1::boolean IS NULL OR is_approved = $1)
             ORDER BY created_at DESC, id DESC"
        );
        let reviews = sqlx::query_as(&sql)
            .bind(approved)
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }

    #[instrument(skip(self, review), fields(game = %review.game, rating = review.rating))]
    async fn create_review(&self, review: &NewReview) -> StoreResult<Review> {
        let sql = format!(
            "INSERT INTO reviews (name, email, game, rating, comment, is_approved)
             VALUES ($1, $2, $3, $4, $5, false) RETURNING {REVIEW_COLUMNS}"
        );
        let created = sqlx::query_as(&sql)
            .bind(&review.name)
            .bind(review.email.as_deref())
            .bind(&review.game)
            .bind(review.rating)
            .bind(review.comment.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn approve_review(&self, id: i64) -> StoreResult<Option<Review>> {
        let sql = format!("UPDATE reviews SET is_approved = true WHERE id = $1 RETURNING {REVIEW_COLUMNS}");
        let review = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn delete_review(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("reviews", id).await
    }

    async fn list_announcements(&self, active_only: bool) -> StoreResult<Vec<Announcement>> {
        let sql = format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE ($1 = false OR is_active)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self, announcement), fields(kind = %announcement.kind))]
    async fn create_announcement(&self, announcement: &NewAnnouncement) -> StoreResult<Announcement> {
        let sql = format!(
            "INSERT INTO announcements (title, message, type, is_active)
             VALUES ($1, $2, $3, $4) RETURNING {ANNOUNCEMENT_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(&announcement.title)
            .bind(&announcement.message)
            .bind(&announcement.kind)
            .bind(announcement.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self, patch))]
    async fn update_announcement(
        &self,
        id: i64,
        patch: &AnnouncementPatch,
    ) -> StoreResult<Option<Announcement>> {
        let sql = format!(
            "UPDATE announcements SET
                title = COALESCE($2, title),
                message = COALESCE($3, message),
                type = COALESCE($4, type),
                is_active = COALESCE($5, is_active),
                updated_at = now()
             WHERE id = $1 RETURNING {ANNOUNCEMENT_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.message.as_deref())
            .bind(patch.kind.as_deref())
            .bind(patch.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete_announcement(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("announcements", id).await
    }

    async fn list_services(&self, active_only: bool) -> StoreResult<Vec<SocialMediaServiceWithPrices>> {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS} FROM social_media_services WHERE ($1 = false OR is_active)
             ORDER BY platform, created_at, id"
        );
        let services: Vec<SocialMediaService> = sqlx::query_as(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        self.attach_service_prices(services).await
    }

    async fn get_service(&self, id: i64) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM social_media_services WHERE id = $1");
        let service: Option<SocialMediaService> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match service {
            Some(s) => Ok(self.attach_service_prices(vec![s]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, service, tiers), fields(platform = %service.platform, tiers = tiers.len()))]
    async fn create_service(
        &self,
        service: &NewSocialMediaService,
        tiers: &[Tier],
    ) -> StoreResult<SocialMediaServiceWithPrices> {
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO social_media_services (platform, service_type, name, description, image, is_active)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&service.platform)
        .bind(&service.service_type)
        .bind(&service.name)
        .bind(service.description.as_deref())
        .bind(&service.image)
        .bind(service.is_active)
        .fetch_one(&mut *tx)
        .await?;
        Self::insert_tiers(&mut tx, "social_media_prices", "service_id", "quantity", id, tiers).await?;
        tx.commit().await?;

        self.get_service(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    #[instrument(skip(self, patch))]
    async fn update_service(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let mut tx = self.pool.begin().await?;
        let found = Self::patch_service(&mut tx, id, patch).await?;
        tx.commit().await?;
        if !found {
            return Ok(None);
        }
        self.get_service(id).await
    }

    #[instrument(skip(self, patch, tiers), fields(tiers = tiers.len()))]
    async fn update_service_with_prices(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let mut tx = self.pool.begin().await?;
        if !Self::patch_service(&mut tx, id, patch).await? {
            return Ok(None);
        }
        sqlx::query("DELETE FROM social_media_prices WHERE service_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_tiers(&mut tx, "social_media_prices", "service_id", "quantity", id, tiers).await?;
        tx.commit().await?;
        self.get_service(id).await
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("social_media_services", id).await
    }

    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE id = 1");
        let row = sqlx::query_as(&sql).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    #[instrument(skip(self, settings))]
    async fn update_site_settings(&self, settings: &SiteSettingsInput) -> StoreResult<SiteSettings> {
        let sql = format!(
            "INSERT INTO site_settings (id, site_title, hero_title, hero_subtitle, whatsapp_number, location, location_details, updated_at)
             VALUES (1, $1, $2, $3, $4, $5, $6, now())
             ON CONFLICT (id) DO UPDATE SET
                site_title = EXCLUDED.site_title,
                hero_title = EXCLUDED.hero_title,
                hero_subtitle = EXCLUDED.hero_subtitle,
                whatsapp_number = EXCLUDED.whatsapp_number,
                location = EXCLUDED.location,
                location_details = EXCLUDED.location_details,
                updated_at = now()
             RETURNING {SETTINGS_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(&settings.site_title)
            .bind(&settings.hero_title)
            .bind(&settings.hero_subtitle)
            .bind(&settings.whatsapp_number)
            .bind(&settings.location)
            .bind(settings.location_details.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_social_links(&self) -> StoreResult<Vec<SocialLink>> {
        let sql = format!("SELECT {SOCIAL_LINK_COLUMNS} FROM social_links ORDER BY sort_order, id");
        let rows = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    #[instrument(skip(self, link), fields(platform = %link.platform))]
    async fn create_social_link(&self, link: &NewSocialLink) -> StoreResult<SocialLink> {
        let sql = format!(
            "INSERT INTO social_links (platform, url, icon, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5) RETURNING {SOCIAL_LINK_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(&link.platform)
            .bind(&link.url)
            .bind(link.icon.as_deref())
            .bind(link.is_active)
            .bind(link.sort_order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self, patch))]
    async fn update_social_link(&self, id: i64, patch: &SocialLinkPatch) -> StoreResult<Option<SocialLink>> {
        let sql = format!(
            "UPDATE social_links SET
                platform = COALESCE($2, platform),
                url = COALESCE($3, url),
                icon = COALESCE($4, icon),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order)
             WHERE id = $1 RETURNING {SOCIAL_LINK_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.platform.as_deref())
            .bind(patch.url.as_deref())
            .bind(patch.icon.as_deref())
            .bind(patch.is_active)
            .bind(patch.sort_order)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete_social_link(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("social_links", id).await
    }

    #[instrument(skip(self))]
    async fn swap_social_link_order(
        &self,
        id: i64,
        direction: MoveDirection,
    ) -> StoreResult<Option<Vec<SocialLink>>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!("SELECT {SOCIAL_LINK_COLUMNS} FROM social_links ORDER BY sort_order, id FOR UPDATE");
        let links: Vec<SocialLink> = sqlx::query_as(&sql).fetch_all(&mut *tx).await?;

        let Some(changes) = plan_move(&links, id, direction) else {
            return Ok(None);
        };
        for (link_id, order) in &changes {
            sqlx::query("UPDATE social_links SET sort_order = $2 WHERE id = $1")
                .bind(link_id)
                .bind(order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!(changed = changes.len(), "social links reordered");

        self.list_social_links().await.map(Some)
    }

    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let sql = if published_only {
            format!(
                "SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE is_published
                 ORDER BY published_at DESC NULLS LAST, id DESC"
            )
        } else {
            format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC, id DESC")
        };
        let rows = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn blog_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE slug = $1");
        let row = sqlx::query_as(&sql).bind(slug).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn get_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE id = $1");
        let row = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    #[instrument(skip(self, post), fields(slug = %post.slug()))]
    async fn create_blog_post(&self, post: &NewBlogPost) -> StoreResult<BlogPost> {
        let sql = format!(
            "INSERT INTO blog_posts (title, slug, content, excerpt, featured_image, is_published, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BLOG_POST_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(&post.title)
            .bind(post.slug())
            .bind(&post.content)
            .bind(post.excerpt.as_deref())
            .bind(post.featured_image.as_deref())
            .bind(post.is_published)
            .bind(post.published_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "blog post slug"))?;
        Ok(row)
    }

    #[instrument(skip(self, patch))]
    async fn update_blog_post(&self, id: i64, patch: &BlogPostPatch) -> StoreResult<Option<BlogPost>> {
        let sql = format!(
            "UPDATE blog_posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                excerpt = CASE WHEN $5::text IS NULL THEN excerpt ELSE NULLIF($5, '') END,
                featured_image = CASE WHEN $6::text IS NULL THEN featured_image ELSE NULLIF($6, '') END,
                is_published = COALESCE($7, is_published),
                published_at = CASE
                    WHEN $7 = false THEN NULL
                    ELSE COALESCE(published_at, $8)
                END,
                updated_at = now()
             WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.slug.as_deref())
            .bind(patch.content.as_deref())
            .bind(patch.excerpt.as_deref())
            .bind(patch.featured_image.as_deref())
            .bind(patch.is_published)
            .bind(patch.published_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "blog post slug"))?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete_blog_post(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("blog_posts", id).await
    }

    #[instrument(skip(self))]
    async fn publish_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        let sql = format!(
            "UPDATE blog_posts SET is_published = true, published_at = COALESCE(published_at, now()), updated_at = now()
             WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
        );
        let row = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn list_blog_images(&self, post_id: Option<i64>) -> StoreResult<Vec<BlogImage>> {
        let sql = format!(
            "SELECT {BLOG_IMAGE_COLUMNS} FROM blog_images WHERE ($1::bigint IS NULL OR post_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as(&sql).bind(post_id).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    #[instrument(skip(self, image), fields(post_id = ?image.post_id))]
    async fn create_blog_image(&self, image: &NewBlogImage) -> StoreResult<BlogImage> {
        let sql = format!(
            "INSERT INTO blog_images (post_id, url, alt_text) VALUES ($1, $2, $3) RETURNING {BLOG_IMAGE_COLUMNS}"
        );
        let row = sqlx::query_as(&sql)
            .bind(image.post_id)
            .bind(&image.url)
            .bind(image.alt_text.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "blog post"))?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete_blog_image(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("blog_images", id).await
    }

    async fn counts(&self) -> StoreResult<StoreCounts> {
        let row: (i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM products),
                (SELECT COUNT(*) FROM social_media_services),
                (SELECT COUNT(*) FROM reviews),
                (SELECT COUNT(*) FROM reviews WHERE NOT is_approved),
                (SELECT COUNT(*) FROM announcements),
                (SELECT COUNT(*) FROM blog_posts),
                (SELECT COUNT(*) FROM blog_posts WHERE is_published),
                (SELECT COUNT(*) FROM social_links)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(StoreCounts {
            products: row.0,
            social_media_services: row.1,
            reviews: row.2,
            pending_reviews: row.3,
            announcements: row.4,
            blog_posts: row.5,
            published_blog_posts: row.6,
            social_links: row.7,
        })
    }
}
