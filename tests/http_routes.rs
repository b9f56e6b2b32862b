use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use onepointstar::{
    application::{
        blog::BlogService, chrome::ChromeService, dictionary::DictionaryCatalog,
        page::PageService, sitemap::SitemapService,
    },
    config::Settings,
    infra::{
        http::{HttpState, build_router},
        media::MediaStore,
    },
};
use tower::ServiceExt;

fn router_with(negotiate: bool, media: Option<MediaStore>) -> Router {
    router_from(Settings::default(), negotiate, media)
}

fn router_from(settings: Settings, negotiate: bool, media: Option<MediaStore>) -> Router {
    let dictionaries = Arc::new(DictionaryCatalog::load().expect("dictionaries should parse"));
    let blog = BlogService::shipped().expect("post table should validate");
    let chrome = ChromeService::new(dictionaries.clone(), &settings);
    let pages = PageService::new(
        chrome,
        dictionaries,
        blog,
        settings.site.contact_email.clone(),
    );
    let sitemap = SitemapService::new(settings.site.base_url.clone(), blog);

    build_router(HttpState {
        pages: Arc::new(pages),
        sitemap: Arc::new(sitemap),
        media: media.map(Arc::new),
        negotiate,
    })
}

fn router() -> Router {
    router_with(false, None)
}

fn integrated_router() -> Router {
    let mut settings = Settings::default();
    settings.ads.enabled = true;
    settings.analytics.enabled = true;
    router_from(settings, false, None)
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("router should respond")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

fn header_value<'a>(response: &'a axum::response::Response, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn unprefixed_path_redirects_to_default_locale() {
    let response = get(router(), "/about").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(header_value(&response, header::LOCATION), "/en/about");
    assert_eq!(
        header_value(&response, header::SET_COOKIE),
        "i18nlang=en; Path=/"
    );
}

#[tokio::test]
async fn root_redirect_preserves_query() {
    let response = get(router(), "/").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(header_value(&response, header::LOCATION), "/en/");

    let response = get(router(), "/blog?ref=newsletter").await;
    assert_eq!(
        header_value(&response, header::LOCATION),
        "/en/blog?ref=newsletter"
    );
}

#[tokio::test]
async fn negotiation_prefers_cookie_then_accept_language() {
    let request = Request::builder()
        .uri("/tools")
        .header(header::ACCEPT_LANGUAGE, "fr;q=1.0, zh-CN;q=0.9, en;q=0.5")
        .body(Body::empty())
        .expect("request should build");
    let response = router_with(true, None)
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(header_value(&response, header::LOCATION), "/zh/tools");
    assert_eq!(
        header_value(&response, header::SET_COOKIE),
        "i18nlang=zh; Path=/"
    );

    let request = Request::builder()
        .uri("/tools")
        .header(header::COOKIE, "theme=dark; i18nlang=en")
        .header(header::ACCEPT_LANGUAGE, "zh-CN")
        .body(Body::empty())
        .expect("request should build");
    let response = router_with(true, None)
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(header_value(&response, header::LOCATION), "/en/tools");
}

#[tokio::test]
async fn localized_paths_pass_through() {
    for uri in ["/zh", "/en/", "/en/blog/", "/zh/tools", "/en/privacy", "/zh/terms"] {
        let response = get(router(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn chinese_post_renders_translated_fields() {
    let response = get(router(), "/zh/blog/2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Indie Kickoff第一个月的总结"));
    assert!(html.contains("第一步永远最难，但也是最有力量的一步。"));
    assert!(!html.contains("The first step is always the hardest"));
    assert!(html.contains("lang=\"zh\""));
    assert!(html.contains("hreflang=\"en\" href=\"https://www.onepointstar.com/en/blog/2\""));
    assert!(html.contains("\"@type\":\"Article\""));
}

#[tokio::test]
async fn unknown_or_malformed_post_ids_are_not_found() {
    for uri in ["/en/blog/999", "/en/blog/abc", "/zh/nowhere"] {
        let response = get(router(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let html = body_text(get(router(), "/en/blog/999").await).await;
    assert!(html.contains("Page Not Found"));
    assert!(html.contains("href=\"/en\""));
}

#[tokio::test]
async fn embedded_assets_are_served() {
    let response = get(router(), "/static/public/css/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "text/css");

    let response = get(router(), "/static/public/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dotted_paths_are_not_redirected() {
    let response = get(router(), "/favicon.ico").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn media_directory_serves_post_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("blog")).expect("mkdir");
    std::fs::write(dir.path().join("blog/blog2.jpg"), b"jpeg-bytes").expect("write");

    let app = router_with(false, Some(MediaStore::new(dir.path())));
    let response = get(app.clone(), "/blog/blog2.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "image/jpeg");
    assert_eq!(body_text(response).await, "jpeg-bytes");

    let response = get(app, "/blog/missing.jpg").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sitemap_and_robots_are_served() {
    let response = get(router(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CONTENT_TYPE),
        "application/xml"
    );
    let xml = body_text(response).await;
    let posts = BlogService::shipped().expect("valid").len();
    assert_eq!(xml.matches("<url>").count(), 12 + 2 * posts);

    let robots = body_text(get(router(), "/robots.txt").await).await;
    assert!(robots.contains("Sitemap: https://www.onepointstar.com/sitemap.xml"));
}

#[tokio::test]
async fn tools_page_lists_dictionary_tools() {
    let html = body_text(get(router(), "/en/tools").await).await;
    assert!(html.contains("class=\"tool-card\""));
    assert!(html.contains("TinyPNG"));
    assert!(html.contains("Frequently Asked Questions"));
    assert!(html.contains("\"@type\":\"ItemList\""));
}

#[tokio::test]
async fn enabled_integrations_render_ads_and_analytics() {
    let response = get(integrated_router(), "/en/blog/2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains(
        "<script async src=\"https://www.googletagmanager.com/gtag/js?id=G-M5337L4H8R\"></script>"
    ));
    assert!(html.contains("data-ga-id=\"G-M5337L4H8R\""));
    assert!(html.contains("data-track-action=\"read_article\""));
    assert!(html.contains("data-track-params=\""));
    assert!(html.contains("data-track-language=\""));

    assert!(html.contains("data-ads-config=\""));
    assert!(html.contains("[600,1100,1600,2100]"));
    assert_eq!(html.matches("class=\"adsbygoogle\"").count(), 3);
    for placement in ["home_banner", "in_article", "article_bottom"] {
        assert!(
            html.contains(&format!("data-ad-placement=\"{placement}\"")),
            "missing {placement}"
        );
    }
    assert!(html.contains("data-ad-client=\"ca-pub-123456\""));
    assert!(html.contains("data-ad-slot=\"3951498119\""));
    assert!(html.contains("data-ad-slot=\"9012253107\""));
    assert!(html.contains("data-ad-timeout=\"4000\""));
}

#[tokio::test]
async fn enabled_analytics_tags_tool_links() {
    let response = get(integrated_router(), "/en/tools").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-track-action=\"view_tools\""));
    assert!(html.contains("data-track-click=\""));
}

#[tokio::test]
async fn disabled_integrations_emit_no_third_party_markup() {
    for uri in ["/en", "/en/blog", "/en/blog/2", "/zh/tools"] {
        let response = get(router(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let html = body_text(response).await;
        for marker in [
            "googletagmanager",
            "googlesyndication",
            "adsbygoogle",
            "ad-container",
            "data-ads-config",
            "data-ga-id",
            "data-track-",
        ] {
            assert!(!html.contains(marker), "{uri} carries {marker}");
        }
    }
}
