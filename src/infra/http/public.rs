use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use time::OffsetDateTime;
use tracing::error;

use crate::{
    application::{
        error::ErrorReport,
        page::{PageService, SiteRoute},
        sitemap::SitemapService,
    },
    domain::locale::Locale,
    infra::{
        assets::{file_response, serve_public},
        media::{MediaError, MediaStore},
    },
};

use super::middleware::{locale_redirect, log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub pages: Arc<PageService>,
    pub sitemap: Arc<SitemapService>,
    pub media: Option<Arc<MediaStore>>,
    /// Consult the `i18nlang` cookie and `Accept-Language` before redirecting.
    pub negotiate: bool,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots_txt))
        .route("/static/public/{*path}", get(serve_public))
        .route("/{lang}", get(localized_root))
        .route("/{lang}/", get(localized_root))
        .route("/{lang}/{*rest}", get(localized_path))
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            locale_redirect,
        ))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn localized_root(
    State(state): State<HttpState>,
    Path(lang): Path<String>,
    uri: Uri,
) -> Response {
    match Locale::parse(&lang) {
        Some(locale) => state.pages.render(locale, &SiteRoute::Home).into_response(),
        None => unlocalized(&state, uri.path()).await,
    }
}

async fn localized_path(
    State(state): State<HttpState>,
    Path((lang, rest)): Path<(String, String)>,
    uri: Uri,
) -> Response {
    match Locale::parse(&lang) {
        Some(locale) => {
            let route = SiteRoute::parse(&rest);
            state.pages.render(locale, &route).into_response()
        }
        None => unlocalized(&state, uri.path()).await,
    }
}

async fn fallback(State(state): State<HttpState>, uri: Uri) -> Response {
    unlocalized(&state, uri.path()).await
}

/// Paths the redirect middleware let through without a locale: media files
/// when a media directory is configured, otherwise the default-locale 404.
async fn unlocalized(state: &HttpState, path: &str) -> Response {
    if let Some(media) = state.media.as_ref() {
        match media.read(path).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(path).first_or_octet_stream();
                return file_response(bytes, &mime);
            }
            Err(MediaError::NotFound | MediaError::InvalidPath) => {}
            Err(err) => {
                error!(
                    target = "onepointstar::http::media",
                    path = path,
                    error = %err,
                    "failed to read media file"
                );
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                ErrorReport::from_error(
                    "infra::http::public::media",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &err,
                )
                .attach(&mut response);
                return response;
            }
        }
    }

    state
        .pages
        .not_found(Locale::DEFAULT, path)
        .into_response()
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    let body = state.sitemap.sitemap_xml(OffsetDateTime::now_utc());
    text_response(body, "application/xml")
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    text_response(state.sitemap.robots_txt(), "text/plain; charset=utf-8")
}

fn text_response(body: String, content_type: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
