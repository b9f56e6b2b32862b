use crate::application::{
    analytics::AnalyticsClientConfig,
    dictionary::FaqItem,
    error::{ErrorReport, HttpError},
};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

/// A rendered page and the status it should be served with.
#[derive(Debug)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub html: String,
}

impl RenderedPage {
    pub fn ok(html: Html<String>) -> Self {
        Self {
            status: StatusCode::OK,
            html: html.0,
        }
    }

    pub fn not_found(html: Html<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            html: html.0,
        }
    }
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Html(self.html)).into_response();
        if status == StatusCode::NOT_FOUND {
            ErrorReport::from_message(
                "presentation::views::RenderedPage",
                StatusCode::NOT_FOUND,
                "Resource not found",
            )
            .attach(&mut response);
        }
        response
    }
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
    pub logo_src: &'static str,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct LanguageOptionView {
    pub code: &'static str,
    pub label: &'static str,
    pub href: String,
    pub is_current: bool,
    pub track_params: String,
}

#[derive(Clone)]
pub struct LanguageSwitcherView {
    pub current_label: &'static str,
    pub options: Vec<LanguageOptionView>,
}

#[derive(Clone)]
pub struct FooterLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
    pub links: Vec<FooterLinkView>,
}

#[derive(Clone)]
pub struct AlternateLinkView {
    pub hreflang: &'static str,
    pub href: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_type: &'static str,
    pub og_locale: &'static str,
    pub og_image: Option<String>,
    pub site_name: String,
    pub canonical: String,
    pub alternates: Vec<AlternateLinkView>,
    pub x_default: String,
    pub website_ld_json: String,
    pub page_ld_json: Option<String>,
}

/// Client-side integrations; absent entries are not emitted at all.
#[derive(Clone)]
pub struct ScriptsView {
    pub analytics: Option<AnalyticsClientConfig>,
    pub ads_config_json: Option<String>,
    pub page_event: Option<TrackView>,
}

impl ScriptsView {
    /// Whether `data-track-*` hooks are emitted; they only exist alongside gtag.
    pub fn tracks(&self) -> bool {
        self.analytics.is_some()
    }
}

#[derive(Clone)]
pub struct TrackView {
    pub action: &'static str,
    pub params_json: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub lang: &'static str,
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub language: LanguageSwitcherView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub scripts: ScriptsView,
}

impl LayoutChrome {
    pub fn with_title(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        let title = title.into();
        let description = description.into();
        self.meta.og_title = title.clone();
        self.meta.og_description = description.clone();
        self.meta.title = title;
        self.meta.description = description;
        self
    }

    pub fn with_article(mut self, image: Option<String>, ld_json: String) -> Self {
        self.meta.og_type = "article";
        self.meta.og_image = image;
        self.meta.page_ld_json = Some(ld_json);
        self
    }

    pub fn with_page_ld_json(mut self, ld_json: String) -> Self {
        self.meta.page_ld_json = Some(ld_json);
        self
    }

    pub fn with_page_event(mut self, event: TrackView) -> Self {
        if self.scripts.tracks() {
            self.scripts.page_event = Some(event);
        }
        self
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub lang: &'static str,
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub language: LanguageSwitcherView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub scripts: ScriptsView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            lang: chrome.lang,
            brand: chrome.brand,
            navigation: chrome.navigation,
            language: chrome.language,
            footer: chrome.footer,
            meta: chrome.meta,
            scripts: chrome.scripts,
            content,
        }
    }
}

#[derive(Clone)]
pub struct AdSlotView {
    pub placement: &'static str,
    pub publisher_id: String,
    pub slot: &'static str,
    pub format: &'static str,
    pub layout: Option<&'static str>,
    pub responsive: &'static str,
    pub style: &'static str,
    pub timeout_ms: u64,
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub summary: String,
    pub iso_date: String,
    pub published: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct FeatureView {
    pub icon: String,
    pub title: String,
    pub description: String,
}

pub struct HomeView {
    pub hero_title: String,
    pub description: String,
    pub read_blog: String,
    pub blog_href: String,
    pub explore_tools: String,
    pub tools_href: String,
    pub features: Vec<FeatureView>,
    pub latest_label: String,
    pub latest: Option<PostCard>,
    pub read_more: String,
    pub banner: Option<AdSlotView>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeView>,
}

pub struct BlogListView {
    pub title: String,
    pub description: String,
    pub posts: Vec<PostCard>,
    pub no_posts: String,
    pub read_more: String,
    pub published_on: String,
    pub banner: Option<AdSlotView>,
    pub sidebar: Option<AdSlotView>,
}

#[derive(Template)]
#[template(path = "blog_list.html")]
pub struct BlogListTemplate {
    pub view: LayoutContext<BlogListView>,
}

pub struct BlogPostView {
    pub title: String,
    pub summary: String,
    pub content_html: String,
    pub has_content: bool,
    pub iso_date: String,
    pub published: String,
    pub published_on: String,
    pub author: Option<String>,
    pub author_label: String,
    pub tags: Vec<String>,
    pub tags_label: String,
    pub image: Option<String>,
    pub back_label: String,
    pub back_href: String,
    pub top: Option<AdSlotView>,
    pub in_article: Option<AdSlotView>,
    pub bottom: Option<AdSlotView>,
}

#[derive(Template)]
#[template(path = "blog_post.html")]
pub struct BlogPostTemplate {
    pub view: LayoutContext<BlogPostView>,
}

pub struct ToolCardView {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon: String,
    pub logo: Option<String>,
    pub visit_label: String,
    pub track_params: String,
}

pub struct ToolsView {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub tools: Vec<ToolCardView>,
    pub note: String,
    pub seo_content: String,
    pub faq_title: String,
    pub faq: Vec<FaqItem>,
}

#[derive(Template)]
#[template(path = "tools.html")]
pub struct ToolsTemplate {
    pub view: LayoutContext<ToolsView>,
}

pub struct StaticPageView {
    pub kind: &'static str,
    pub title: String,
    pub subtitle: String,
    pub body_html: String,
    pub contact_email: String,
}

#[derive(Template)]
#[template(path = "static_page.html")]
pub struct StaticPageTemplate {
    pub view: LayoutContext<StaticPageView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectTemplate {
    pub target: String,
}

/// Serialises a JSON-LD document for embedding inside `<script>`.
pub fn ld_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub fn title_case(tag: &str) -> String {
    let mut words = Vec::new();
    for segment in tag.split(['-', '_', ' ']) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            let mut word = String::new();
            word.extend(first.to_uppercase());
            word.push_str(chars.as_str());
            words.push(word);
        }
    }

    if words.is_empty() {
        tag.to_string()
    } else {
        words.join(" ")
    }
}
