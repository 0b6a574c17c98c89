use std::io::Cursor;
use std::sync::Arc;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::post::Post;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const CHANGE_FREQ: &str = "weekly";
const PRIORITY: &str = "0.7";

/* Example
<?xml version="1.0" encoding="UTF-8" ?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://blog.example/</loc>
    <changefreq>weekly</changefreq>
    <priority>0.7</priority>
  </url>
  <url>
    <loc>https://blog.example/posts/welcome</loc>
    <lastmod>2024-05-22</lastmod>
    <changefreq>weekly</changefreq>
    <priority>0.7</priority>
  </url>
</urlset>
*/

pub struct Sitemap<'a> {
    pub base_url: &'a str,
}

impl Sitemap<'_> {
    pub fn render(&self, posts: &[Arc<Post>]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        let base = self.base_url.trim_end_matches('/');

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NS));
        writer.write_event(Event::Start(urlset))?;

        push_url(&mut writer, &format!("{}/", base), None)?;
        for post in posts {
            let loc = format!("{}/posts/{}", base, post.slug);
            let lastmod = post.date.map(|d| d.format("%Y-%m-%d").to_string());
            push_url(&mut writer, &loc, lastmod.as_deref())?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn push_url(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    loc: &str,
    lastmod: Option<&str>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;
    push_text(writer, "loc", loc)?;
    if let Some(lastmod) = lastmod {
        push_text(writer, "lastmod", lastmod)?;
    }
    push_text(writer, "changefreq", CHANGE_FREQ)?;
    push_text(writer, "priority", PRIORITY)?;
    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
