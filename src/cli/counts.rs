use anyhow::Result;

use crate::models::StoreCounts;
use crate::storage::Storage;

/// Two-column table of row counts, one table per line.
pub fn render(counts: &StoreCounts) -> String {
    let rows = [
        ("products", counts.products),
        ("social_media_services", counts.social_media_services),
        ("reviews", counts.reviews),
        ("  pending", counts.pending_reviews),
        ("announcements", counts.announcements),
        ("blog_posts", counts.blog_posts),
        ("  published", counts.published_blog_posts),
        ("social_links", counts.social_links),
    ];
    let mut out = String::new();
    for (name, n) in rows {
        out.push_str(&format!("{name:<24}{n:>8}\n"));
    }
    out
}

pub async fn run(store: &dyn Storage) -> Result<String> {
    Ok(render(&store.counts().await?))
}
