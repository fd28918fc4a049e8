use actix_web::{web, HttpResponse};
use std::collections::HashSet;

use super::{found, Store};
use crate::api::error::{validated, ApiResult};
use crate::api::models::{Ack, BlogImagesQuery};
use crate::models::{BlogPostPatch, NewBlogImage, NewBlogPost};
use crate::normalization::slug::unique_slug;

pub async fn list_published_posts(store: Store) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_blog_posts(true).await?))
}

/// Drafts are indistinguishable from missing posts on the public site.
pub async fn get_published_post(store: Store, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let post = store
        .blog_post_by_slug(&path.into_inner())
        .await?
        .filter(|p| p.is_published);
    Ok(HttpResponse::Ok().json(found(post, "Blog post")?))
}

pub async fn list_posts(store: Store) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_blog_posts(false).await?))
}

pub async fn get_post(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let post = found(store.get_blog_post(path.into_inner()).await?, "Blog post")?;
    Ok(HttpResponse::Ok().json(post))
}

/// A slug derived from the title gets a numeric suffix when taken; an
/// explicit slug that collides is a 409.
pub async fn create_post(store: Store, body: web::Json<NewBlogPost>) -> ApiResult<HttpResponse> {
    let raw = body.into_inner();
    let slug_was_given = raw.slug.as_deref().is_some_and(|s| !s.trim().is_empty());
    let mut post = validated(raw.normalized())?;

    if !slug_was_given {
        let taken: HashSet<String> = store
            .list_blog_posts(false)
            .await?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        post.slug = Some(unique_slug(post.slug(), &taken));
    }

    let created = store.create_blog_post(&post).await?;
    tracing::info!(post_id = created.id, slug = %created.slug, "blog post created");
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_post(
    store: Store,
    path: web::Path<i64>,
    body: web::Json<BlogPostPatch>,
) -> ApiResult<HttpResponse> {
    let patch = validated(body.into_inner().normalized())?;
    let updated = store.update_blog_post(path.into_inner(), &patch).await?;
    Ok(HttpResponse::Ok().json(found(updated, "Blog post")?))
}

pub async fn delete_post(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    store.delete_blog_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}

pub async fn publish_post(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let post = found(store.publish_blog_post(path.into_inner()).await?, "Blog post")?;
    tracing::info!(post_id = post.id, "blog post published");
    Ok(HttpResponse::Ok().json(post))
}

pub async fn list_images(
    store: Store,
    query: web::Query<BlogImagesQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_blog_images(query.post_id).await?))
}

pub async fn create_image(store: Store, body: web::Json<NewBlogImage>) -> ApiResult<HttpResponse> {
    let mut image = validated(body.into_inner())?;
    image.alt_text = image.alt_text.filter(|a| !a.trim().is_empty());
    Ok(HttpResponse::Created().json(store.create_blog_image(&image).await?))
}

pub async fn delete_image(store: Store, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    store.delete_blog_image(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Ack::ok()))
}
