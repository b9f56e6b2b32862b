//! Page composition shared by the HTTP handlers and the static exporter.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::application::{
    ads::AdPlacement,
    analytics::AnalyticsEvent,
    blog::{BlogService, LocalizedPost},
    chrome::{ChromeService, NavTab, localized_href},
    dictionary::{Dictionary, DictionaryCatalog},
    error::HttpError,
};
use crate::domain::{locale::Locale, pages::PageKind};
use crate::infra::telemetry::{METRIC_NOT_FOUND_TOTAL, METRIC_PAGE_RENDER_TOTAL};
use crate::presentation::views::{
    BlogListTemplate, BlogListView, BlogPostTemplate, BlogPostView, ErrorAction, ErrorPageView,
    ErrorTemplate, FeatureView, HomeView, IndexTemplate, LayoutContext, PostCard, RenderedPage,
    StaticPageTemplate, StaticPageView, ToolCardView, ToolsTemplate, ToolsView, TrackView,
    ld_json, render_template, title_case,
};

/// A locale-relative route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteRoute {
    Home,
    BlogList,
    BlogPost(u32),
    Tools,
    Static(PageKind),
    NotFound(String),
}

impl SiteRoute {
    /// Parses the path after `/{lang}`; a trailing slash is ignored.
    pub fn parse(rest: &str) -> Self {
        let trimmed = rest.trim_matches('/');
        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => SiteRoute::Home,
            (Some("blog"), None, None) => SiteRoute::BlogList,
            (Some("blog"), Some(id), None) => match id.parse::<u32>() {
                Ok(id) => SiteRoute::BlogPost(id),
                Err(_) => SiteRoute::NotFound(format!("/{trimmed}")),
            },
            (Some("tools"), None, None) => SiteRoute::Tools,
            (Some(segment), None, None) => match PageKind::from_segment(segment) {
                Some(kind) => SiteRoute::Static(kind),
                None => SiteRoute::NotFound(format!("/{trimmed}")),
            },
            _ => SiteRoute::NotFound(format!("/{trimmed}")),
        }
    }

    /// Path under `/{lang}` without a trailing slash (`""` for the home page).
    pub fn path(&self) -> String {
        match self {
            SiteRoute::Home => String::new(),
            SiteRoute::BlogList => "/blog".to_string(),
            SiteRoute::BlogPost(id) => format!("/blog/{id}"),
            SiteRoute::Tools => "/tools".to_string(),
            SiteRoute::Static(kind) => format!("/{}", kind.segment()),
            SiteRoute::NotFound(path) => path.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SiteRoute::Home => "home",
            SiteRoute::BlogList => "blog_list",
            SiteRoute::BlogPost(_) => "blog_post",
            SiteRoute::Tools => "tools",
            SiteRoute::Static(PageKind::About) => "about",
            SiteRoute::Static(PageKind::Privacy) => "privacy",
            SiteRoute::Static(PageKind::Terms) => "terms",
            SiteRoute::NotFound(_) => "not_found",
        }
    }
}

#[derive(Clone)]
pub struct PageService {
    chrome: ChromeService,
    dictionaries: Arc<DictionaryCatalog>,
    blog: BlogService,
    contact_email: String,
}

impl PageService {
    pub fn new(
        chrome: ChromeService,
        dictionaries: Arc<DictionaryCatalog>,
        blog: BlogService,
        contact_email: impl Into<String>,
    ) -> Self {
        Self {
            chrome,
            dictionaries,
            blog,
            contact_email: contact_email.into(),
        }
    }

    pub fn blog(&self) -> &BlogService {
        &self.blog
    }

    /// Every route with content, in the order the exporter writes them.
    pub fn routes(&self) -> Vec<SiteRoute> {
        let mut routes = vec![SiteRoute::Home, SiteRoute::BlogList, SiteRoute::Tools];
        routes.extend(PageKind::ALL.into_iter().map(SiteRoute::Static));
        routes.extend(self.blog.ids().map(SiteRoute::BlogPost));
        routes
    }

    pub fn render(&self, locale: Locale, route: &SiteRoute) -> Result<RenderedPage, HttpError> {
        let rendered = match route {
            SiteRoute::Home => self.home(locale).map(Some),
            SiteRoute::BlogList => self.blog_list(locale).map(Some),
            SiteRoute::BlogPost(id) => self.blog_post(locale, *id),
            SiteRoute::Tools => self.tools(locale).map(Some),
            SiteRoute::Static(kind) => self.static_page(locale, *kind).map(Some),
            SiteRoute::NotFound(_) => Ok(None),
        }?;

        match rendered {
            Some(page) => {
                counter!(
                    METRIC_PAGE_RENDER_TOTAL,
                    "page" => route.name(),
                    "locale" => locale.code()
                )
                .increment(1);
                Ok(page)
            }
            None => self.not_found(locale, &route.path()),
        }
    }

    pub fn not_found(&self, locale: Locale, path: &str) -> Result<RenderedPage, HttpError> {
        counter!(METRIC_NOT_FOUND_TOTAL, "locale" => locale.code()).increment(1);

        let dictionary = self.dictionaries.get(locale);
        let chrome = self
            .chrome
            .load(locale, None, path)
            .with_title(
                format!("{} - {}", dictionary.not_found.title, dictionary.page_title),
                dictionary.not_found.message.clone(),
            );
        let content = ErrorPageView {
            title: dictionary.not_found.title.clone(),
            message: dictionary.not_found.message.clone(),
            primary_action: Some(ErrorAction {
                href: localized_href(locale, ""),
                label: dictionary.not_found.back_home.clone(),
            }),
        };
        let view = LayoutContext::new(chrome, content);
        render_template(ErrorTemplate { view }).map(RenderedPage::not_found)
    }

    fn home(&self, locale: Locale) -> Result<RenderedPage, HttpError> {
        let dictionary = self.dictionaries.get(locale);
        let chrome = self.chrome.load(locale, Some(NavTab::Home), "");

        let content = HomeView {
            hero_title: dictionary.home.hero_title.clone(),
            description: dictionary.description.clone(),
            read_blog: dictionary.home.read_blog.clone(),
            blog_href: localized_href(locale, "/blog"),
            explore_tools: dictionary.home.explore_tools.clone(),
            tools_href: localized_href(locale, "/tools"),
            features: dictionary
                .home
                .features
                .iter()
                .map(|feature| FeatureView {
                    icon: feature.icon.clone(),
                    title: feature.title.clone(),
                    description: feature.description.clone(),
                })
                .collect(),
            latest_label: dictionary.home.latest_article.clone(),
            latest: self.blog.latest(locale).map(|post| post_card(&post)),
            read_more: dictionary.home.read_more_arrow.clone(),
            banner: self.chrome.ad_slot(AdPlacement::HomeBanner),
        };

        let view = LayoutContext::new(chrome, content);
        render_template(IndexTemplate { view }).map(RenderedPage::ok)
    }

    fn blog_list(&self, locale: Locale) -> Result<RenderedPage, HttpError> {
        let dictionary = self.dictionaries.get(locale);
        let chrome = self
            .chrome
            .load(locale, Some(NavTab::Blog), "/blog")
            .with_title(
                format!("{} - {}", dictionary.blog_title, dictionary.page_title),
                dictionary.blog_description.clone(),
            );

        let content = BlogListView {
            title: dictionary.blog_title.clone(),
            description: dictionary.blog_description.clone(),
            posts: self.blog.list_posts(locale).iter().map(post_card).collect(),
            no_posts: dictionary.no_posts.clone(),
            read_more: dictionary.read_more.clone(),
            published_on: dictionary.published_on.clone(),
            banner: self.chrome.ad_slot(AdPlacement::HomeBanner),
            sidebar: self.chrome.ad_slot(AdPlacement::Sidebar),
        };

        let view = LayoutContext::new(chrome, content);
        render_template(BlogListTemplate { view }).map(RenderedPage::ok)
    }

    fn blog_post(&self, locale: Locale, id: u32) -> Result<Option<RenderedPage>, HttpError> {
        let Some(post) = self.blog.get_post(id, locale) else {
            return Ok(None);
        };
        let dictionary = self.dictionaries.get(locale);
        let path = format!("/blog/{id}");
        let url = self.chrome.canonical_url(locale, &path);
        let image = post.image.map(|image| self.chrome.absolute(image));
        let iso_date = iso_date(&post);

        let article = json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": post.title,
            "description": post.summary,
            "image": image,
            "author": {
                "@type": "Person",
                "name": post
                    .author
                    .map(str::to_string)
                    .unwrap_or_else(|| dictionary.page_title.clone()),
            },
            "publisher": {
                "@type": "Organization",
                "name": dictionary.page_title,
                "logo": {
                    "@type": "ImageObject",
                    "url": self.chrome.absolute(crate::application::chrome::LOGO_SRC),
                },
            },
            "datePublished": iso_date,
            "dateModified": iso_date,
            "mainEntityOfPage": { "@type": "WebPage", "@id": url },
            "url": url,
            "inLanguage": locale.language_tag(),
            "keywords": post.tags.join(", "),
            "articleSection": "Technology",
            "wordCount": word_count(post.content),
        });

        let chrome = self
            .chrome
            .load(locale, Some(NavTab::Blog), &path)
            .with_title(
                format!("{} - {}", post.title, dictionary.page_title),
                post.summary,
            )
            .with_article(image, ld_json(&article))
            .with_page_event(track(AnalyticsEvent::ReadArticle {
                post_id: post.id,
                title: post.title.to_string(),
            }));

        let content = BlogPostView {
            title: post.title.to_string(),
            summary: post.summary.to_string(),
            content_html: post.content.to_string(),
            has_content: !post.content.trim().is_empty(),
            iso_date,
            published: locale.format_date(post.published_at.date()),
            published_on: dictionary.published_on.clone(),
            author: post.author.map(str::to_string),
            author_label: dictionary.author_label.clone(),
            tags: post.tags.iter().map(|tag| title_case(tag)).collect(),
            tags_label: dictionary.tags_label.clone(),
            image: post.image.map(str::to_string),
            back_label: dictionary.back_to_blog.clone(),
            back_href: localized_href(locale, "/blog"),
            top: self.chrome.ad_slot(AdPlacement::HomeBanner),
            in_article: self.chrome.ad_slot(AdPlacement::InArticle),
            bottom: self.chrome.ad_slot(AdPlacement::ArticleBottom),
        };

        let view = LayoutContext::new(chrome, content);
        render_template(BlogPostTemplate { view })
            .map(RenderedPage::ok)
            .map(Some)
    }

    fn tools(&self, locale: Locale) -> Result<RenderedPage, HttpError> {
        let dictionary = self.dictionaries.get(locale);
        let path = "/tools";
        let item_list = json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
            "name": dictionary.tools_page_title,
            "description": dictionary.tools_page_description,
            "url": self.chrome.canonical_url(locale, path),
            "mainEntity": {
                "@type": "ItemList",
                "name": dictionary.related_tools_title,
                "itemListElement": dictionary
                    .related_tools
                    .iter()
                    .enumerate()
                    .map(|(index, tool)| json!({
                        "@type": "ListItem",
                        "position": index + 1,
                        "name": tool.name,
                        "description": tool.description,
                        "url": tool.url,
                    }))
                    .collect::<Vec<_>>(),
            },
        });

        let chrome = self
            .chrome
            .load(locale, Some(NavTab::Tools), path)
            .with_title(
                format!("{} - {}", dictionary.tools_page_title, dictionary.page_title),
                dictionary.tools_page_description.clone(),
            )
            .with_page_ld_json(ld_json(&item_list))
            .with_page_event(track(AnalyticsEvent::ViewTools { tool: None }));

        let view = LayoutContext::new(chrome, tools_view(dictionary));
        render_template(ToolsTemplate { view }).map(RenderedPage::ok)
    }

    fn static_page(&self, locale: Locale, kind: PageKind) -> Result<RenderedPage, HttpError> {
        let dictionary = self.dictionaries.get(locale);
        let page = kind.page();
        let active = (kind == PageKind::About).then_some(NavTab::About);
        let chrome = self
            .chrome
            .load(locale, active, &format!("/{}", kind.segment()))
            .with_title(
                format!("{} - {}", page.title(locale), dictionary.page_title),
                page.description(locale),
            );

        let content = StaticPageView {
            kind: kind.segment(),
            title: page.title(locale).to_string(),
            subtitle: page.description(locale).to_string(),
            body_html: page.body(locale).to_string(),
            contact_email: self.contact_email.clone(),
        };

        let view = LayoutContext::new(chrome, content);
        render_template(StaticPageTemplate { view }).map(RenderedPage::ok)
    }
}

fn tools_view(dictionary: &Dictionary) -> ToolsView {
    ToolsView {
        title: dictionary.tools_page_title.clone(),
        subtitle: dictionary.tools_page_subtitle.clone(),
        description: dictionary.tools_page_description.clone(),
        tools: dictionary
            .related_tools
            .iter()
            .map(|tool| ToolCardView {
                name: tool.name.clone(),
                description: tool.description.clone(),
                url: tool.url.clone(),
                icon: tool.icon.clone(),
                logo: tool.logo.clone(),
                visit_label: format!("{} {}", dictionary.visit_tool, tool.name),
                track_params: AnalyticsEvent::ClickExternalLink {
                    url: tool.url.clone(),
                    text: Some(tool.name.clone()),
                }
                .params_json(),
            })
            .collect(),
        note: dictionary.related_tools_note.clone(),
        seo_content: dictionary.seo_content.clone(),
        faq_title: dictionary.faq_title.clone(),
        faq: dictionary.faq(),
    }
}

fn track(event: AnalyticsEvent) -> TrackView {
    TrackView {
        action: event.action(),
        params_json: event.params_json(),
    }
}

fn post_card(post: &LocalizedPost) -> PostCard {
    PostCard {
        href: localized_href(post.locale, &format!("/blog/{}", post.id)),
        title: post.title.to_string(),
        summary: post.summary.to_string(),
        iso_date: iso_date(post),
        published: post.locale.format_date(post.published_at.date()),
        image: post.image.map(str::to_string),
        tags: post.tags.iter().map(|tag| title_case(tag)).collect(),
    }
}

fn iso_date(post: &LocalizedPost) -> String {
    post.published_at.format(&Rfc3339).unwrap_or_default()
}

fn word_count(html: &str) -> usize {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_parse_with_and_without_trailing_slash() {
        assert_eq!(SiteRoute::parse(""), SiteRoute::Home);
        assert_eq!(SiteRoute::parse("/"), SiteRoute::Home);
        assert_eq!(SiteRoute::parse("blog"), SiteRoute::BlogList);
        assert_eq!(SiteRoute::parse("blog/"), SiteRoute::BlogList);
        assert_eq!(SiteRoute::parse("blog/3/"), SiteRoute::BlogPost(3));
        assert_eq!(SiteRoute::parse("tools"), SiteRoute::Tools);
        assert_eq!(
            SiteRoute::parse("privacy"),
            SiteRoute::Static(PageKind::Privacy)
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(
            SiteRoute::parse("blog/abc"),
            SiteRoute::NotFound("/blog/abc".to_string())
        );
        assert_eq!(
            SiteRoute::parse("missing"),
            SiteRoute::NotFound("/missing".to_string())
        );
        assert_eq!(
            SiteRoute::parse("blog/1/extra"),
            SiteRoute::NotFound("/blog/1/extra".to_string())
        );
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            SiteRoute::Home,
            SiteRoute::BlogList,
            SiteRoute::BlogPost(2),
            SiteRoute::Tools,
            SiteRoute::Static(PageKind::Terms),
        ] {
            assert_eq!(SiteRoute::parse(&route.path()), route);
        }
    }

    fn service(catalog: DictionaryCatalog) -> PageService {
        let settings = crate::config::Settings::default();
        let dictionaries = Arc::new(catalog);
        let chrome = ChromeService::new(dictionaries.clone(), &settings);
        let blog = BlogService::shipped().expect("valid table");
        PageService::new(chrome, dictionaries, blog, settings.site.contact_email)
    }

    #[test]
    fn empty_tool_list_still_renders_faq() {
        let catalog = DictionaryCatalog::load().expect("dictionaries");
        let mut english = catalog.get(Locale::En).clone();
        english.related_tools.clear();
        let pages = service(catalog.with_dictionary(Locale::En, english));

        let page = pages
            .render(Locale::En, &SiteRoute::Tools)
            .expect("tools render");
        assert_eq!(page.status, axum::http::StatusCode::OK);
        assert!(page.html.contains("Frequently Asked Questions"));
        assert!(page.html.contains("Can I suggest additional tools?"));
        assert!(!page.html.contains("class=\"tool-card\""));
    }

    #[test]
    fn unknown_post_renders_localized_not_found() {
        let pages = service(DictionaryCatalog::load().expect("dictionaries"));
        let page = pages
            .render(Locale::Zh, &SiteRoute::BlogPost(999))
            .expect("not found renders");
        assert_eq!(page.status, axum::http::StatusCode::NOT_FOUND);
        assert!(page.html.contains("lang=\"zh\""));
    }

    #[test]
    fn routes_cover_every_post() {
        let pages = service(DictionaryCatalog::load().expect("dictionaries"));
        let routes = pages.routes();
        assert_eq!(routes.len(), 6 + pages.blog().len());
        assert!(routes.contains(&SiteRoute::BlogPost(1)));
    }

    #[test]
    fn word_count_ignores_markup() {
        assert_eq!(word_count("<p>Hello <b>indie</b> world</p>"), 3);
        assert_eq!(word_count(""), 0);
    }
}
