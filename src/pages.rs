use std::path::PathBuf;
use std::{fs, io};

use anyhow::Result;
use ntex::web;
use ntex::web::Error;
use ntex_files::NamedFile;
use ramhorns::Template;
use spdlog::info;

use crate::config::Config;
use crate::provider::{PostProvider, RecordSource};
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::sitemap_renderer::Sitemap;

#[derive(ramhorns::Content)]
struct NotFoundPage<'a> {
    site_title: &'a str,
    slug: &'a str,
}

pub fn read_template(tpl_dir: &PathBuf, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    fs::read_to_string(full_path)
}

pub async fn build_list<S: RecordSource>(
    config: &Config,
    provider: &PostProvider<'_, S>,
) -> Result<String> {
    let posts = provider.published().await?;
    info!("Rendering list page with {} posts", posts.len());

    let template_src = read_template(&config.paths.template_dir, "postlist.tpl")?;
    let renderer = ListRenderer::new(&template_src)?;
    Ok(renderer.render(&config.site, &posts))
}

pub async fn build_post<S: RecordSource>(
    config: &Config,
    provider: &PostProvider<'_, S>,
    slug: &str,
) -> Result<Option<String>> {
    let Some(post) = provider.post_by_slug(slug).await? else {
        return Ok(None);
    };

    let template_src = read_template(&config.paths.template_dir, "view.tpl")?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(Some(renderer.render(&config.site, &post)?))
}

pub fn build_not_found(config: &Config, slug: &str) -> Result<String> {
    let template_src = read_template(&config.paths.template_dir, "notfound.tpl")?;
    let template = Template::new(template_src.as_str())?;
    Ok(template.render(&NotFoundPage {
        site_title: &config.site.title,
        slug,
    }))
}

pub async fn build_sitemap<S: RecordSource>(
    config: &Config,
    provider: &PostProvider<'_, S>,
) -> Result<Vec<u8>> {
    let posts = provider.published().await?;
    let sitemap = Sitemap {
        base_url: config.site.base_url(),
    };
    Ok(sitemap.render(&posts)?)
}

pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

pub fn get_file(root_dir: &PathBuf, file: String) -> Result<NamedFile, Error> {
    if file.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = root_dir.join(file);
    Ok(NamedFile::open(file_path)?)
}
