// API route configuration

use crate::api::auth::RequireAdmin;
use crate::api::handlers::{
    admin, announcements, blog, health, products, reviews, services, site, whatsapp,
};
use actix_web::{web, HttpResponse};

/// Every route of the storefront and dashboard API. The `/api/admin` scope is
/// wrapped in `RequireAdmin`; writes on the shared catalog resources take an
/// `AdminIdentity` instead, so access follows what the router matched.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Session; matched before the guarded admin scope
                .route("/admin/login", web::post().to(admin::login))
                .route("/admin/logout", web::post().to(admin::logout))
                .route("/admin/session", web::get().to(admin::session_status))
                .route("/admin/create", web::post().to(admin::create_admin))
                // Catalog
                .service(
                    web::resource("/products")
                        .route(web::get().to(products::list_products))
                        .route(web::post().to(products::create_product)),
                )
                .service(
                    web::resource("/products/{id}")
                        .route(web::get().to(products::get_product))
                        .route(web::put().to(products::update_product))
                        .route(web::delete().to(products::delete_product)),
                )
                .route("/products/{id}/whatsapp", web::get().to(whatsapp::product_link))
                .service(
                    web::resource("/social-media-services")
                        .route(web::get().to(services::list_services))
                        .route(web::post().to(services::create_service)),
                )
                .service(
                    web::resource("/social-media-services/{id}")
                        .route(web::get().to(services::get_service))
                        .route(web::put().to(services::update_service))
                        .route(web::delete().to(services::delete_service)),
                )
                .route(
                    "/social-media-services/{id}/whatsapp",
                    web::get().to(whatsapp::service_link),
                )
                .route("/whatsapp/inquiry", web::get().to(whatsapp::inquiry_link))
                // Reviews
                .service(
                    web::resource("/reviews")
                        .route(web::get().to(reviews::list_reviews))
                        .route(web::post().to(reviews::create_review)),
                )
                .route("/reviews/{id}", web::delete().to(reviews::delete_review))
                .route("/reviews/{id}/approve", web::post().to(reviews::approve_review))
                // Announcements
                .service(
                    web::resource("/announcements")
                        .route(web::get().to(announcements::list_announcements))
                        .route(web::post().to(announcements::create_announcement)),
                )
                .service(
                    web::resource("/announcements/{id}")
                        .route(web::put().to(announcements::update_announcement))
                        .route(web::delete().to(announcements::delete_announcement)),
                )
                // Public site content
                .route("/site-settings", web::get().to(site::get_site_settings))
                .route("/social-links", web::get().to(site::list_active_social_links))
                .route("/blog-posts", web::get().to(blog::list_published_posts))
                .route("/blog-posts/{slug}", web::get().to(blog::get_published_post))
                .service(admin_scope())
                .default_service(web::to(api_not_found)),
        );
}

/// Unknown API paths answer JSON instead of falling through to the SPA.
async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}

fn admin_scope() -> impl actix_web::dev::HttpServiceFactory {
    web::scope("/admin")
        .wrap(RequireAdmin)
        .route("/dashboard", web::get().to(admin::dashboard))
        // Site configuration
        .service(
            web::resource("/site-settings")
                .route(web::get().to(site::get_site_settings))
                .route(web::put().to(site::update_site_settings)),
        )
        .service(
            web::resource("/social-links")
                .route(web::get().to(site::list_social_links))
                .route(web::post().to(site::create_social_link)),
        )
        .service(
            web::resource("/social-links/{id}")
                .route(web::put().to(site::update_social_link))
                .route(web::delete().to(site::delete_social_link)),
        )
        .route("/social-links/{id}/move", web::post().to(site::move_social_link))
        // Blog
        .service(
            web::resource("/blog-posts")
                .route(web::get().to(blog::list_posts))
                .route(web::post().to(blog::create_post)),
        )
        .service(
            web::resource("/blog-posts/{id}")
                .route(web::get().to(blog::get_post))
                .route(web::put().to(blog::update_post))
                .route(web::delete().to(blog::delete_post)),
        )
        .route("/blog-posts/{id}/publish", web::post().to(blog::publish_post))
        .service(
            web::resource("/blog-images")
                .route(web::get().to(blog::list_images))
                .route(web::post().to(blog::create_image)),
        )
        .route("/blog-images/{id}", web::delete().to(blog::delete_image))
}
