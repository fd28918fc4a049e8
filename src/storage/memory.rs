use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Storage, StoreError, StoreResult};
use crate::models::site::plan_move;
use crate::models::*;

#[derive(Default)]
struct State {
    next_id: i64,
    admins: Vec<Admin>,
    products: Vec<Product>,
    product_prices: Vec<ProductPrice>,
    services: Vec<SocialMediaService>,
    service_prices: Vec<SocialMediaPrice>,
    reviews: Vec<Review>,
    announcements: Vec<Announcement>,
    settings: Option<SiteSettings>,
    social_links: Vec<SocialLink>,
    blog_posts: Vec<BlogPost>,
    blog_images: Vec<BlogImage>,
}

impl State {
    /// Single sequence shared by every table; ids only need to be unique per table.
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn product_with_prices(&self, product: &Product) -> ProductWithPrices {
        let mut prices: Vec<ProductPrice> = self
            .product_prices
            .iter()
            .filter(|p| p.product_id == product.id)
            .cloned()
            .collect();
        prices.sort_by_key(|p| (p.value, p.id));
        ProductWithPrices { product: product.clone(), prices }
    }

    fn service_with_prices(&self, service: &SocialMediaService) -> SocialMediaServiceWithPrices {
        let mut prices: Vec<SocialMediaPrice> = self
            .service_prices
            .iter()
            .filter(|p| p.service_id == service.id)
            .cloned()
            .collect();
        prices.sort_by_key(|p| (p.quantity, p.id));
        SocialMediaServiceWithPrices { service: service.clone(), prices }
    }

    fn replace_product_prices(&mut self, product_id: i64, tiers: &[Tier]) {
        self.product_prices.retain(|p| p.product_id != product_id);
        for tier in tiers {
            let id = self.id();
            self.product_prices.push(ProductPrice {
                id,
                product_id,
                value: tier.amount,
                label: tier.label.clone(),
                price: tier.price.clone(),
                created_at: Utc::now(),
            });
        }
    }

    fn replace_service_prices(&mut self, service_id: i64, tiers: &[Tier]) {
        self.service_prices.retain(|p| p.service_id != service_id);
        for tier in tiers {
            let id = self.id();
            self.service_prices.push(SocialMediaPrice {
                id,
                service_id,
                quantity: tier.amount,
                label: tier.label.clone(),
                price: tier.price.clone(),
                created_at: Utc::now(),
            });
        }
    }

    fn patch_product(&mut self, id: i64, patch: &ProductPatch) -> Option<Product> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        apply(&mut product.name, &patch.name);
        apply(&mut product.currency, &patch.currency);
        apply(&mut product.image, &patch.image);
        apply(&mut product.category, &patch.category);
        if patch.description.is_some() {
            product.description = patch.description.clone();
        }
        apply(&mut product.is_active, &patch.is_active);
        product.updated_at = Utc::now();
        Some(product.clone())
    }

    fn patch_service(&mut self, id: i64, patch: &SocialMediaServicePatch) -> Option<SocialMediaService> {
        let service = self.services.iter_mut().find(|s| s.id == id)?;
        apply(&mut service.platform, &patch.platform);
        apply(&mut service.service_type, &patch.service_type);
        apply(&mut service.name, &patch.name);
        if patch.description.is_some() {
            service.description = patch.description.clone();
        }
        apply(&mut service.image, &patch.image);
        apply(&mut service.is_active, &patch.is_active);
        service.updated_at = Utc::now();
        Some(service.clone())
    }

    fn sorted_links(&self) -> Vec<SocialLink> {
        let mut links = self.social_links.clone();
        links.sort_by_key(|l| (l.sort_order, l.id));
        links
    }
}

fn apply<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// In-process store with the same semantics as `PgStore`. Backs the HTTP
/// tests and `STORAGE_BACKEND=memory` demos; nothing survives a restart.
#[derive(Default)]
pub struct MemStore {
    state: RwLock<State>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn admin_by_username(&self, username: &str) -> StoreResult<Option<Admin>> {
        let state = self.state.read().await;
        Ok(state.admins.iter().find(|a| a.username == username).cloned())
    }

    async fn create_admin(&self, username: &str, password_hash: &str) -> StoreResult<Admin> {
        let mut state = self.state.write().await;
        if state.admins.iter().any(|a| a.username == username) {
            return Err(StoreError::Conflict("admin username".to_string()));
        }
        let admin = Admin {
            id: state.id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn count_admins(&self) -> StoreResult<i64> {
        Ok(self.state.read().await.admins.len() as i64)
    }

    async fn list_products(&self, active_only: bool) -> StoreResult<Vec<ProductWithPrices>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|p| !active_only || p.is_active)
            .map(|p| state.product_with_prices(p))
            .collect())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductWithPrices>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.product_with_prices(p)))
    }

    async fn create_product(&self, product: &NewProduct, tiers: &[Tier]) -> StoreResult<ProductWithPrices> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let created = Product {
            id: state.id(),
            name: product.name.clone(),
            currency: product.currency.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            is_active: product.is_active,
            created_at: now,
            updated_at: now,
        };
        state.replace_product_prices(created.id, tiers);
        state.products.push(created.clone());
        Ok(state.product_with_prices(&created))
    }

    async fn update_product(&self, id: i64, patch: &ProductPatch) -> StoreResult<Option<ProductWithPrices>> {
        let mut state = self.state.write().await;
        Ok(state
            .patch_product(id, patch)
            .map(|p| state.product_with_prices(&p)))
    }

    async fn update_product_with_prices(
        &self,
        id: i64,
        patch: &ProductPatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<ProductWithPrices>> {
        // patch and tier replacement share one write guard
        let mut state = self.state.write().await;
        let Some(product) = state.patch_product(id, patch) else {
            return Ok(None);
        };
        state.replace_product_prices(id, tiers);
        Ok(Some(state.product_with_prices(&product)))
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        state.product_prices.retain(|p| p.product_id != id);
        Ok(state.products.len() != before)
    }

    async fn list_reviews(&self, approved: Option<bool>) -> StoreResult<Vec<Review>> {
        let state = self.state.read().await;
        let mut reviews: Vec<Review> = state
            .reviews
            .iter()
            .filter(|r| approved.map_or(true, |a| r.is_approved == a))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reviews)
    }

    async fn create_review(&self, review: &NewReview) -> StoreResult<Review> {
        let mut state = self.state.write().await;
        let created = Review {
            id: state.id(),
            name: review.name.clone(),
            email: review.email.clone(),
            game: review.game.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            is_approved: false,
            created_at: Utc::now(),
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    async fn approve_review(&self, id: i64) -> StoreResult<Option<Review>> {
        let mut state = self.state.write().await;
        Ok(state.reviews.iter_mut().find(|r| r.id == id).map(|r| {
            r.is_approved = true;
            r.clone()
        }))
    }

    async fn delete_review(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        Ok(state.reviews.len() != before)
    }

    async fn list_announcements(&self, active_only: bool) -> StoreResult<Vec<Announcement>> {
        let state = self.state.read().await;
        let mut rows: Vec<Announcement> = state
            .announcements
            .iter()
            .filter(|a| !active_only || a.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn create_announcement(&self, announcement: &NewAnnouncement) -> StoreResult<Announcement> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let created = Announcement {
            id: state.id(),
            title: announcement.title.clone(),
            message: announcement.message.clone(),
            kind: announcement.kind.clone(),
            is_active: announcement.is_active,
            created_at: now,
            updated_at: now,
        };
        state.announcements.push(created.clone());
        Ok(created)
    }

    async fn update_announcement(
        &self,
        id: i64,
        patch: &AnnouncementPatch,
    ) -> StoreResult<Option<Announcement>> {
        let mut state = self.state.write().await;
        Ok(state.announcements.iter_mut().find(|a| a.id == id).map(|a| {
            apply(&mut a.title, &patch.title);
            apply(&mut a.message, &patch.message);
            apply(&mut a.kind, &patch.kind);
            apply(&mut a.is_active, &patch.is_active);
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn delete_announcement(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.announcements.len();
        state.announcements.retain(|a| a.id != id);
        Ok(state.announcements.len() != before)
    }

    async fn list_services(&self, active_only: bool) -> StoreResult<Vec<SocialMediaServiceWithPrices>> {
        let state = self.state.read().await;
        let mut services: Vec<&SocialMediaService> = state
            .services
            .iter()
            .filter(|s| !active_only || s.is_active)
            .collect();
        services.sort_by(|a, b| (&a.platform, a.created_at, a.id).cmp(&(&b.platform, b.created_at, b.id)));
        Ok(services.into_iter().map(|s| state.service_with_prices(s)).collect())
    }

    async fn get_service(&self, id: i64) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let state = self.state.read().await;
        Ok(state
            .services
            .iter()
            .find(|s| s.id == id)
            .map(|s| state.service_with_prices(s)))
    }

    async fn create_service(
        &self,
        service: &NewSocialMediaService,
        tiers: &[Tier],
    ) -> StoreResult<SocialMediaServiceWithPrices> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let created = SocialMediaService {
            id: state.id(),
            platform: service.platform.clone(),
            service_type: service.service_type.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            image: service.image.clone(),
            is_active: service.is_active,
            created_at: now,
            updated_at: now,
        };
        state.replace_service_prices(created.id, tiers);
        state.services.push(created.clone());
        Ok(state.service_with_prices(&created))
    }

    async fn update_service(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let mut state = self.state.write().await;
        Ok(state
            .patch_service(id, patch)
            .map(|s| state.service_with_prices(&s)))
    }

    async fn update_service_with_prices(
        &self,
        id: i64,
        patch: &SocialMediaServicePatch,
        tiers: &[Tier],
    ) -> StoreResult<Option<SocialMediaServiceWithPrices>> {
        let mut state = self.state.write().await;
        let Some(service) = state.patch_service(id, patch) else {
            return Ok(None);
        };
        state.replace_service_prices(id, tiers);
        Ok(Some(state.service_with_prices(&service)))
    }

    async fn delete_service(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        state.service_prices.retain(|p| p.service_id != id);
        Ok(state.services.len() != before)
    }

    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn update_site_settings(&self, settings: &SiteSettingsInput) -> StoreResult<SiteSettings> {
        let saved = SiteSettings {
            site_title: settings.site_title.clone(),
            hero_title: settings.hero_title.clone(),
            hero_subtitle: settings.hero_subtitle.clone(),
            whatsapp_number: settings.whatsapp_number.clone(),
            location: settings.location.clone(),
            location_details: settings.location_details.clone(),
            updated_at: Utc::now(),
        };
        self.state.write().await.settings = Some(saved.clone());
        Ok(saved)
    }

    async fn list_social_links(&self) -> StoreResult<Vec<SocialLink>> {
        Ok(self.state.read().await.sorted_links())
    }

    async fn create_social_link(&self, link: &NewSocialLink) -> StoreResult<SocialLink> {
        let mut state = self.state.write().await;
        let created = SocialLink {
            id: state.id(),
            platform: link.platform.clone(),
            url: link.url.clone(),
            icon: link.icon.clone(),
            is_active: link.is_active,
            sort_order: link.sort_order,
            created_at: Utc::now(),
        };
        state.social_links.push(created.clone());
        Ok(created)
    }

    async fn update_social_link(&self, id: i64, patch: &SocialLinkPatch) -> StoreResult<Option<SocialLink>> {
        let mut state = self.state.write().await;
        Ok(state.social_links.iter_mut().find(|l| l.id == id).map(|l| {
            apply(&mut l.platform, &patch.platform);
            apply(&mut l.url, &patch.url);
            if patch.icon.is_some() {
                l.icon = patch.icon.clone();
            }
            apply(&mut l.is_active, &patch.is_active);
            apply(&mut l.sort_order, &patch.sort_order);
            l.clone()
        }))
    }

    async fn delete_social_link(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.social_links.len();
        state.social_links.retain(|l| l.id != id);
        Ok(state.social_links.len() != before)
    }

    async fn swap_social_link_order(
        &self,
        id: i64,
        direction: MoveDirection,
    ) -> StoreResult<Option<Vec<SocialLink>>> {
        let mut state = self.state.write().await;
        let Some(changes) = plan_move(&state.sorted_links(), id, direction) else {
            return Ok(None);
        };
        for (link_id, order) in changes {
            if let Some(link) = state.social_links.iter_mut().find(|l| l.id == link_id) {
                link.sort_order = order;
            }
        }
        Ok(Some(state.sorted_links()))
    }

    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let state = self.state.read().await;
        let mut posts: Vec<BlogPost> = state
            .blog_posts
            .iter()
            .filter(|p| !published_only || p.is_published)
            .cloned()
            .collect();
        if published_only {
            posts.sort_by(|a, b| (b.published_at, b.id).cmp(&(a.published_at, a.id)));
        } else {
            posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        }
        Ok(posts)
    }

    async fn blog_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        let state = self.state.read().await;
        Ok(state.blog_posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn get_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        let state = self.state.read().await;
        Ok(state.blog_posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_blog_post(&self, post: &NewBlogPost) -> StoreResult<BlogPost> {
        let mut state = self.state.write().await;
        if state.blog_posts.iter().any(|p| p.slug == post.slug()) {
            return Err(StoreError::Conflict("blog post slug".to_string()));
        }
        let now = Utc::now();
        let created = BlogPost {
            id: state.id(),
            title: post.title.clone(),
            slug: post.slug().to_string(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            is_published: post.is_published,
            published_at: post.published_at,
            created_at: now,
            updated_at: now,
        };
        state.blog_posts.push(created.clone());
        Ok(created)
    }

    async fn update_blog_post(&self, id: i64, patch: &BlogPostPatch) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        if let Some(slug) = &patch.slug {
            if state.blog_posts.iter().any(|p| p.id != id && &p.slug == slug) {
                return Err(StoreError::Conflict("blog post slug".to_string()));
            }
        }
        Ok(state.blog_posts.iter_mut().find(|p| p.id == id).map(|p| {
            apply(&mut p.title, &patch.title);
            apply(&mut p.slug, &patch.slug);
            apply(&mut p.content, &patch.content);
            if let Some(excerpt) = &patch.excerpt {
                p.excerpt = Some(excerpt.clone()).filter(|s| !s.is_empty());
            }
            if let Some(image) = &patch.featured_image {
                p.featured_image = Some(image.clone()).filter(|s| !s.is_empty());
            }
            apply(&mut p.is_published, &patch.is_published);
            if patch.is_published == Some(false) {
                p.published_at = None;
            } else if p.published_at.is_none() {
                p.published_at = patch.published_at;
            }
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete_blog_post(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.blog_posts.len();
        state.blog_posts.retain(|p| p.id != id);
        // blog_images.post_id is ON DELETE SET NULL
        for image in state.blog_images.iter_mut().filter(|i| i.post_id == Some(id)) {
            image.post_id = None;
        }
        Ok(state.blog_posts.len() != before)
    }

    async fn publish_blog_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        Ok(state.blog_posts.iter_mut().find(|p| p.id == id).map(|p| {
            let now = Utc::now();
            p.is_published = true;
            p.published_at.get_or_insert(now);
            p.updated_at = now;
            p.clone()
        }))
    }

    async fn list_blog_images(&self, post_id: Option<i64>) -> StoreResult<Vec<BlogImage>> {
        let state = self.state.read().await;
        let mut images: Vec<BlogImage> = state
            .blog_images
            .iter()
            .filter(|i| post_id.is_none() || i.post_id == post_id)
            .cloned()
            .collect();
        images.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(images)
    }

    async fn create_blog_image(&self, image: &NewBlogImage) -> StoreResult<BlogImage> {
        let mut state = self.state.write().await;
        if let Some(post_id) = image.post_id {
            if !state.blog_posts.iter().any(|p| p.id == post_id) {
                return Err(StoreError::MissingReference("blog post".to_string()));
            }
        }
        let created = BlogImage {
            id: state.id(),
            post_id: image.post_id,
            url: image.url.clone(),
            alt_text: image.alt_text.clone(),
            created_at: Utc::now(),
        };
        state.blog_images.push(created.clone());
        Ok(created)
    }

    async fn delete_blog_image(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.blog_images.len();
        state.blog_images.retain(|i| i.id != id);
        Ok(state.blog_images.len() != before)
    }

    async fn counts(&self) -> StoreResult<StoreCounts> {
        let state = self.state.read().await;
        Ok(StoreCounts {
            products: state.products.len() as i64,
            social_media_services: state.services.len() as i64,
            reviews: state.reviews.len() as i64,
            pending_reviews: state.reviews.iter().filter(|r| !r.is_approved).count() as i64,
            announcements: state.announcements.len() as i64,
            blog_posts: state.blog_posts.len() as i64,
            published_blog_posts: state.blog_posts.iter().filter(|p| p.is_published).count() as i64,
            social_links: state.social_links.len() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn tier(amount: i32, price: &str) -> Tier {
        Tier {
            amount,
            label: format!("{amount}"),
            price: BigDecimal::from_str(price).unwrap(),
        }
    }

    fn new_product(name: &str, active: bool) -> NewProduct {
        NewProduct {
            name: name.into(),
            currency: "UC".into(),
            image: "https://cdn.example.com/p.png".into(),
            category: "games".into(),
            description: None,
            is_active: active,
        }
    }

    fn new_link(platform: &str, order: i32) -> NewSocialLink {
        NewSocialLink {
            platform: platform.into(),
            url: format!("https://{platform}.com/salamawy"),
            icon: None,
            is_active: true,
            sort_order: order,
        }
    }

    #[tokio::test]
    async fn product_prices_are_sorted_and_replaced() {
        let store = MemStore::new();
        let p = store
            .create_product(&new_product("PUBG", true), &[tier(660, "9.99"), tier(60, "0.99")])
            .await
            .unwrap();
        let values: Vec<i32> = p.prices.iter().map(|t| t.value).collect();
        assert_eq!(values, [60, 660]);

        let updated = store
            .update_product_with_prices(p.product.id, &ProductPatch::default(), &[tier(325, "4.99")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.prices.len(), 1);
        assert_eq!(updated.prices[0].value, 325);
    }

    #[tokio::test]
    async fn inactive_products_hidden_from_active_listing() {
        let store = MemStore::new();
        store.create_product(&new_product("A", true), &[]).await.unwrap();
        store.create_product(&new_product("B", false), &[]).await.unwrap();
        assert_eq!(store.list_products(true).await.unwrap().len(), 1);
        assert_eq!(store.list_products(false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_product_drops_prices() {
        let store = MemStore::new();
        let p = store.create_product(&new_product("A", true), &[tier(1, "1")]).await.unwrap();
        assert!(store.delete_product(p.product.id).await.unwrap());
        assert!(!store.delete_product(p.product.id).await.unwrap());
        assert!(store.state.read().await.product_prices.is_empty());
    }

    #[tokio::test]
    async fn reviews_start_pending() {
        let store = MemStore::new();
        let r = store
            .create_review(&NewReview {
                name: "Omar".into(),
                email: None,
                game: "PUBG".into(),
                rating: 5,
                comment: None,
            })
            .await
            .unwrap();
        assert!(!r.is_approved);
        assert!(store.list_reviews(Some(true)).await.unwrap().is_empty());
        store.approve_review(r.id).await.unwrap();
        assert_eq!(store.list_reviews(Some(true)).await.unwrap().len(), 1);
        assert_eq!(store.counts().await.unwrap().pending_reviews, 0);
    }

    #[tokio::test]
    async fn duplicate_admin_username_conflicts() {
        let store = MemStore::new();
        store.create_admin("admin", "hash").await.unwrap();
        let err = store.create_admin("admin", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn social_link_move_swaps_neighbours() {
        let store = MemStore::new();
        let a = store.create_social_link(&new_link("facebook", 0)).await.unwrap();
        let b = store.create_social_link(&new_link("instagram", 1)).await.unwrap();
        let links = store
            .swap_social_link_order(b.id, MoveDirection::Up)
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        assert_eq!(ids, [b.id, a.id]);
        assert!(store.swap_social_link_order(999, MoveDirection::Up).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blog_slug_is_unique() {
        let store = MemStore::new();
        let post = NewBlogPost {
            title: "Hello".into(),
            slug: None,
            content: "body".into(),
            excerpt: None,
            featured_image: None,
            is_published: false,
            published_at: None,
        }
        .normalized();
        store.create_blog_post(&post).await.unwrap();
        let err = store.create_blog_post(&post).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn blank_patch_clears_excerpt_and_absent_keeps_it() {
        let store = MemStore::new();
        let post = NewBlogPost {
            title: "Guide".into(),
            slug: None,
            content: "body".into(),
            excerpt: Some("short".into()),
            featured_image: Some("https://cdn.example.com/g.png".into()),
            is_published: false,
            published_at: None,
        }
        .normalized();
        let created = store.create_blog_post(&post).await.unwrap();

        let rename = BlogPostPatch {
            title: Some("Guide 2".into()),
            ..Default::default()
        };
        let kept = store
            .update_blog_post(created.id, &rename)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.excerpt.as_deref(), Some("short"));

        let patch = BlogPostPatch {
            excerpt: Some(String::new()),
            featured_image: Some(" ".into()),
            ..Default::default()
        }
        .normalized();
        let cleared = store.update_blog_post(created.id, &patch).await.unwrap().unwrap();
        assert!(cleared.excerpt.is_none());
        assert!(cleared.featured_image.is_none());
        assert_eq!(cleared.title, "Guide 2");
    }

    #[tokio::test]
    async fn publish_keeps_first_timestamp_and_images_survive_post_delete() {
        let store = MemStore::new();
        let post = NewBlogPost {
            title: "Launch".into(),
            slug: None,
            content: "body".into(),
            excerpt: None,
            featured_image: None,
            is_published: true,
            published_at: None,
        }
        .normalized();
        let created = store.create_blog_post(&post).await.unwrap();
        let published = store.publish_blog_post(created.id).await.unwrap().unwrap();
        assert_eq!(published.published_at, created.published_at);

        let image = store
            .create_blog_image(&NewBlogImage {
                post_id: Some(created.id),
                url: "https://cdn.example.com/a.png".into(),
                alt_text: None,
            })
            .await
            .unwrap();
        store.delete_blog_post(created.id).await.unwrap();
        let images = store.list_blog_images(None).await.unwrap();
        assert_eq!(images[0].id, image.id);
        assert!(images[0].post_id.is_none());
    }

    #[tokio::test]
    async fn image_for_missing_post_is_rejected() {
        let store = MemStore::new();
        let err = store
            .create_blog_image(&NewBlogImage {
                post_id: Some(42),
                url: "https://cdn.example.com/a.png".into(),
                alt_text: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_delete_never_leaves_orphan_tiers() {
        let store = Arc::new(MemStore::new());
        for _ in 0..50 {
            let created = store
                .create_product(&new_product("PUBG", true), &[tier(60, "0.99")])
                .await
                .unwrap();
            let id = created.product.id;

            let updater = {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .update_product_with_prices(id, &ProductPatch::default(), &[tier(325, "4.99")])
                        .await
                        .unwrap()
                })
            };
            let deleter = {
                let store = store.clone();
                tokio::spawn(async move { store.delete_product(id).await.unwrap() })
            };
            updater.await.unwrap();
            assert!(deleter.await.unwrap());

            let state = store.state.read().await;
            assert!(state.product_prices.iter().all(|t| t.product_id != id));
        }
    }

    #[tokio::test]
    async fn service_tier_replacement_is_all_or_nothing() {
        let store = MemStore::new();
        let missing = store
            .update_service_with_prices(99, &SocialMediaServicePatch::default(), &[tier(1000, "3.00")])
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(store.state.read().await.service_prices.is_empty());
    }
}
