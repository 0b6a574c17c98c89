use thiserror::Error;

use crate::notion::client::{schema, SourceError};
use crate::notion::types::PageObject;
use crate::post::{Post, RecordId};
use crate::text_utils::{derive_description, parse_source_date};

const DEFAULT_TITLE: &str = "Untitled";

/// Why one record produced no Post. Callers log these and drop the
/// record; they never cross the per-record boundary.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("record has no usable slug")]
    MissingSlug,
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Maps a retrieved record to a Post.
///
/// The slug is required: a record without one is rejected as a whole.
/// Every other field falls back to its documented default, applied here
/// and nowhere else.
pub fn normalize(page: &PageObject, content: String) -> Result<Post, NormalizeError> {
    let slug = page
        .rich_text(schema::SLUG)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(NormalizeError::MissingSlug)?;

    let description = derive_description(&content);

    Ok(Post {
        id: RecordId(page.id.clone()),
        title: page
            .title_text(schema::TITLE)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        slug,
        cover_image: page.url(schema::FEATURED_IMAGE),
        description,
        date: page
            .date_start(schema::PUBLISHED_DATE)
            .and_then(|start| parse_source_date(&start)),
        content,
        author: page.person_name(schema::AUTHOR),
        tags: page.multi_select_names(schema::TAGS),
        category: page.select_name(schema::CATEGORY),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn page(value: serde_json::Value) -> PageObject {
        serde_json::from_value(value).unwrap()
    }

    fn full_page() -> PageObject {
        page(json!({
            "id": "rec-1",
            "properties": {
                "Title": { "type": "title", "title": [ { "plain_text": "Welcome" } ] },
                "Slug": { "type": "rich_text", "rich_text": [ { "plain_text": "  welcome  " } ] },
                "Featured Image": { "type": "url", "url": "https://img.example/w.png" },
                "Published Date": { "type": "date", "date": { "start": "2024-05-22" } },
                "Author": { "type": "people", "people": [ { "name": "Ana" } ] },
                "Tags": { "type": "multi_select", "multi_select": [
                    { "name": "news" }, { "name": "notice" }
                ]},
                "Category": { "type": "select", "select": { "name": "Updates" } }
            }
        }))
    }

    #[test]
    fn test_normalize_full_record() {
        let content = "\n\nHello world\nSecond line".to_string();
        let post = normalize(&full_page(), content.clone()).unwrap();

        assert_eq!(post.id, RecordId("rec-1".to_string()));
        assert_eq!(post.title, "Welcome");
        assert_eq!(post.slug, "welcome");
        assert_eq!(post.cover_image.as_deref(), Some("https://img.example/w.png"));
        assert_eq!(post.description, "Hello world");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 5, 22));
        assert_eq!(post.content, content);
        assert_eq!(post.author.as_deref(), Some("Ana"));
        assert_eq!(post.tags, vec!["news", "notice"]);
        assert_eq!(post.category.as_deref(), Some("Updates"));
    }

    #[test]
    fn test_missing_slug_rejects_the_record() {
        let no_slug = page(json!({
            "id": "rec-2",
            "properties": {
                "Title": { "type": "title", "title": [ { "plain_text": "Welcome" } ] }
            }
        }));
        let res = normalize(&no_slug, "body".to_string());
        assert!(matches!(res, Err(NormalizeError::MissingSlug)));
    }

    #[test]
    fn test_blank_slug_rejects_the_record() {
        let blank_slug = page(json!({
            "id": "rec-3",
            "properties": {
                "Slug": { "type": "rich_text", "rich_text": [ { "plain_text": "   " } ] }
            }
        }));
        let res = normalize(&blank_slug, "body".to_string());
        assert!(matches!(res, Err(NormalizeError::MissingSlug)));
    }

    #[test]
    fn test_defaults_for_absent_properties() {
        let minimal = page(json!({
            "id": "rec-4",
            "properties": {
                "Slug": { "type": "rich_text", "rich_text": [ { "plain_text": "bare" } ] }
            }
        }));
        let post = normalize(&minimal, String::new()).unwrap();

        assert_eq!(post.title, "Untitled");
        assert_eq!(post.cover_image, None);
        assert_eq!(post.description, "");
        assert_eq!(post.date, None);
        assert_eq!(post.author, None);
        assert!(post.tags.is_empty());
        assert_eq!(post.category, None);
    }

    #[test]
    fn test_unparseable_date_becomes_none() {
        let odd_date = page(json!({
            "id": "rec-5",
            "properties": {
                "Slug": { "type": "rich_text", "rich_text": [ { "plain_text": "odd" } ] },
                "Published Date": { "type": "date", "date": { "start": "someday" } }
            }
        }));
        let post = normalize(&odd_date, String::new()).unwrap();
        assert_eq!(post.date, None);
    }

    #[test]
    fn test_long_first_line_is_truncated_with_ellipsis() {
        let line = "a".repeat(200);
        let post = normalize(&full_page(), line.clone()).unwrap();
        assert_eq!(post.description, format!("{}...", "a".repeat(160)));
        // The body itself is untouched
        assert_eq!(post.content, line);
    }
}
