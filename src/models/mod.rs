//! Schema entities (as stored and served) and the inputs that create or patch them.

pub mod admin;
pub mod catalog;
pub mod content;
pub mod site;

pub use admin::{Admin, NewAdmin};
pub use catalog::{
    NewProduct, NewProductPrice, NewSocialMediaPrice, NewSocialMediaService, Product,
    ProductPatch, ProductPrice, ProductWithPrices, SocialMediaPrice, SocialMediaService,
    SocialMediaServicePatch, SocialMediaServiceWithPrices, Tier,
};
pub use content::{
    Announcement, AnnouncementPatch, BlogImage, BlogPost, BlogPostPatch, NewAnnouncement,
    NewBlogImage, NewBlogPost, NewReview, Review,
};
pub use site::{MoveDirection, NewSocialLink, SiteSettings, SiteSettingsInput, SocialLink, SocialLinkPatch};

use serde::Serialize;

/// Row counts shown on the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub products: i64,
    pub social_media_services: i64,
    pub reviews: i64,
    pub pending_reviews: i64,
    pub announcements: i64,
    pub blog_posts: i64,
    pub published_blog_posts: i64,
    pub social_links: i64,
}
