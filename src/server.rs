use std::io;
use std::io::ErrorKind;
use std::sync::Arc;

use ntex::web;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::config::Config;
use crate::notion::client::NotionClient;
use crate::pages;
use crate::provider::PostProvider;

struct AppState {
    config: Config,
    client: NotionClient,
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let provider = PostProvider::new(&state.client);

    match pages::build_list(&state.config, &provider).await {
        Ok(html) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            error!("Error rendering post list: {}", e);
            web::HttpResponse::InternalServerError().body("Error listing posts")
        }
    }
}

#[web::get("/posts/{slug}")]
async fn view_post(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let slug = path.into_inner();
    let provider = PostProvider::new(&state.client);

    match pages::build_post(&state.config, &provider, &slug).await {
        Ok(Some(html)) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Ok(None) => {
            info!("No published post with slug {}", slug);
            not_found_response(&state.config, &slug)
        }
        Err(e) => {
            error!("Error loading post {}: {}", slug, e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error loading post {}", slug))
        }
    }
}

fn not_found_response(config: &Config, slug: &str) -> web::HttpResponse {
    match pages::build_not_found(config, slug) {
        Ok(html) => web::HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            error!("Error rendering not-found page: {}", e);
            web::HttpResponse::NotFound().body("Post not found")
        }
    }
}

#[web::get("/sitemap.xml")]
async fn sitemap(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let provider = PostProvider::new(&state.client);

    match pages::build_sitemap(&state.config, &provider).await {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml),
        Err(e) => {
            error!("Error rendering sitemap: {}", e);
            web::HttpResponse::InternalServerError().body("Error rendering sitemap")
        }
    }
}

#[web::get("/robots.txt")]
async fn robots(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(pages::robots_txt(state.config.site.base_url()))
}

#[web::get("/public/{file_name}")]
async fn public_files(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> Result<NamedFile, web::Error> {
    pages::get_file(&state.config.paths.public_dir, path.into_inner())
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let client = match NotionClient::new(&config.notion) {
        Ok(client) => client,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::Other,
                format!("Error creating content source client: {}", e),
            ));
        }
    };

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { config, client });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(view_post)
            .service(sitemap)
            .service(robots)
            .service(public_files)
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await
}
