use chrono::NaiveDate;
use serde_json::json;

use crate::post::Post;

/// Canonical URL of a post's detail page.
pub fn canonical_url(base_url: &str, slug: &str) -> String {
    format!("{}/posts/{}", base_url.trim_end_matches('/'), slug)
}

/// Image used for social sharing cards: the post cover when present,
/// otherwise the site-wide fallback image.
pub fn share_image(base_url: &str, cover_image: Option<&str>) -> String {
    match cover_image {
        Some(url) => url.to_string(),
        None => format!(
            "{}/public/opengraph-image.png",
            base_url.trim_end_matches('/')
        ),
    }
}

pub fn published_iso(date: &NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// BlogPosting structured data embedded in detail pages for search
/// engines. `datePublished` is present only when the record carries a
/// publication date.
pub fn blog_posting_json_ld(post: &Post, base_url: &str, publisher: &str) -> String {
    let canonical = canonical_url(base_url, &post.slug);
    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.description,
        "image": share_image(base_url, post.cover_image.as_deref()),
        "author": {
            "@type": "Person",
            "name": post.author.as_deref().unwrap_or("Guest Author"),
        },
        "publisher": {
            "@type": "Organization",
            "name": publisher,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/public/logo.png", base_url.trim_end_matches('/')),
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": canonical,
        },
    });
    if let Some(ref date) = post.date {
        ld["datePublished"] = json!(published_iso(date));
    }
    ld.to_string()
}
