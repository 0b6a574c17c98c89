use std::io;
use std::io::ErrorKind;

use markdown::Options;
use ramhorns::Template;

use crate::config::Site;
use crate::post::Post;
use crate::text_utils::{format_date, reading_time, word_count};
use crate::view::seo;

#[derive(ramhorns::Content)]
struct PostPage<'a> {
    site_title: &'a str,
    title: &'a str,
    description: &'a str,
    canonical_url: String,
    share_image: String,
    json_ld: String,
    cover_image: String,
    has_cover: bool,
    date: String,
    has_date: bool,
    author: String,
    has_author: bool,
    category: String,
    has_category: bool,
    tags: Vec<ViewTag>,
    reading_time: String,
    show_reading_time: bool,
    post_content: String,
}

#[derive(ramhorns::Content)]
struct ViewTag {
    tag: String,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing post view template: {}", e),
                ));
            }
        };

        Ok(PostRenderer { template })
    }

    pub fn render(&self, site: &Site, post: &Post) -> io::Result<String> {
        let post_content = render_markdown(&post.content)?;
        let date = post.date.as_ref().map(format_date).unwrap_or_default();
        let tags = post
            .tags
            .iter()
            .map(|t| ViewTag { tag: t.clone() })
            .collect();

        let base_url = site.base_url();
        let rendered_page = self.template.render(&PostPage {
            site_title: &site.title,
            title: &post.title,
            description: &post.description,
            canonical_url: seo::canonical_url(base_url, &post.slug),
            share_image: seo::share_image(base_url, post.cover_image.as_deref()),
            json_ld: seo::blog_posting_json_ld(post, base_url, site.publisher()),
            cover_image: post.cover_image.clone().unwrap_or_default(),
            has_cover: post.cover_image.is_some(),
            has_date: !date.is_empty(),
            date,
            author: post.author.clone().unwrap_or_default(),
            has_author: post.author.is_some(),
            category: post.category.clone().unwrap_or_default(),
            has_category: post.category.is_some(),
            tags,
            reading_time: reading_time(word_count(&post.content)),
            show_reading_time: site.show_reading_time,
            post_content,
        });

        Ok(rendered_page)
    }
}

fn render_markdown(md_text: &str) -> io::Result<String> {
    match markdown::to_html_with_options(md_text, &Options::gfm()) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}
