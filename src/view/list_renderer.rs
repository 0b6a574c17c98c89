use std::io;
use std::io::ErrorKind;
use std::sync::Arc;

use ramhorns::Template;

use crate::config::Site;
use crate::post::Post;
use crate::text_utils::{format_date, reading_time, word_count};

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    site_title: &'a str,
    tagline: &'a str,
    cards: Vec<Card>,
    has_posts: bool,
}

#[derive(ramhorns::Content)]
struct Card {
    link: String,
    title: String,
    description: String,
    date: String,
    has_date: bool,
    author: String,
    has_author: bool,
    category: String,
    has_category: bool,
    tags: Vec<ViewTag>,
    reading_time: String,
    show_reading_time: bool,
}

#[derive(ramhorns::Content)]
struct ViewTag {
    tag: String,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing list template: {}", e),
                ));
            }
        };

        Ok(ListRenderer { template })
    }

    pub fn render(&self, site: &Site, posts: &[Arc<Post>]) -> String {
        let mut cards = vec![];
        for post in posts {
            let date = post.date.as_ref().map(format_date).unwrap_or_default();
            let tags = post
                .tags
                .iter()
                .map(|t| ViewTag { tag: t.clone() })
                .collect();

            cards.push(Card {
                link: format!("/posts/{}", post.slug),
                title: post.title.clone(),
                description: post.description.clone(),
                has_date: !date.is_empty(),
                date,
                author: post.author.clone().unwrap_or_default(),
                has_author: post.author.is_some(),
                category: post.category.clone().unwrap_or_default(),
                has_category: post.category.is_some(),
                tags,
                reading_time: reading_time(word_count(&post.content)),
                show_reading_time: site.show_reading_time,
            });
        }

        self.template.render(&ListPage {
            site_title: &site.title,
            tagline: &site.tagline,
            has_posts: !cards.is_empty(),
            cards,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::post::RecordId;

    use super::*;

    fn site() -> Site {
        Site {
            base_url: None,
            title: "My Center".to_string(),
            tagline: "Warm like family".to_string(),
            publisher: None,
            show_reading_time: false,
        }
    }

    fn post(slug: &str, title: &str) -> Arc<Post> {
        Arc::new(Post {
            id: RecordId(format!("id-{}", slug)),
            title: title.to_string(),
            slug: slug.to_string(),
            cover_image: None,
            description: "A short summary".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 22),
            content: "A short summary\n\nAnd more".to_string(),
            author: Some("Ana".to_string()),
            tags: vec!["news".to_string()],
            category: Some("Notice".to_string()),
        })
    }

    #[test]
    fn test_render_cards() {
        let template_src = r##"{{site_title}}|{{tagline}}{{#cards}}
[{{title}}]({{link}}) {{date}} {{description}} by {{author}} TAGS={{#tags}}({{tag}}){{/tags}}{{/cards}}"##;
        let renderer = ListRenderer::new(template_src).unwrap();
        let posts = vec![post("first", "First post"), post("second", "Second post")];

        let res = renderer.render(&site(), &posts);
        assert_eq!(
            res,
            "My Center|Warm like family\n[First post](/posts/first) 2024. 05. 22 A short summary by Ana TAGS=(news)\n[Second post](/posts/second) 2024. 05. 22 A short summary by Ana TAGS=(news)"
        );
    }

    #[test]
    fn test_reading_time_is_gated_by_config() {
        let template_src = "{{#cards}}{{#show_reading_time}}{{reading_time}}{{/show_reading_time}}{{/cards}}";
        let renderer = ListRenderer::new(template_src).unwrap();
        let posts = vec![post("first", "First post")];

        assert_eq!(renderer.render(&site(), &posts), "");

        let mut site = site();
        site.show_reading_time = true;
        assert_eq!(renderer.render(&site, &posts), "1 min read");
    }

    #[test]
    fn test_empty_list() {
        let template_src = "{{^has_posts}}nothing yet{{/has_posts}}";
        let renderer = ListRenderer::new(template_src).unwrap();
        assert_eq!(renderer.render(&site(), &[]), "nothing yet");
    }
}
