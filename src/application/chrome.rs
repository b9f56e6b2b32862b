use std::sync::Arc;

use serde_json::json;

use crate::application::{
    ads::{AdPlacement, AdsClientConfig, timeout_ms},
    analytics::{AnalyticsClientConfig, AnalyticsEvent},
    dictionary::DictionaryCatalog,
};
use crate::config::Settings;
use crate::domain::locale::Locale;
use crate::presentation::views::{
    AdSlotView, AlternateLinkView, BrandView, FooterLinkView, FooterView, LanguageOptionView,
    LanguageSwitcherView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
    ScriptsView, ld_json,
};

pub const LOGO_SRC: &str = "/static/public/logo.svg";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTab {
    Home,
    Blog,
    Tools,
    About,
}

/// Builds the per-locale page frame: navigation, language switcher, footer, meta.
#[derive(Clone)]
pub struct ChromeService {
    dictionaries: Arc<DictionaryCatalog>,
    base_url: String,
    site_name: String,
    analytics: Option<AnalyticsClientConfig>,
    ads: Option<AdsClientConfig>,
}

impl ChromeService {
    pub fn new(dictionaries: Arc<DictionaryCatalog>, settings: &Settings) -> Self {
        Self {
            dictionaries,
            base_url: settings.site.base_url.clone(),
            site_name: settings.site.name.clone(),
            analytics: AnalyticsClientConfig::from_settings(&settings.analytics),
            ads: settings
                .ads
                .enabled
                .then(|| AdsClientConfig::from_settings(&settings.ads)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` is the locale-relative route (`""`, `/blog`, `/blog/3`).
    pub fn load(&self, locale: Locale, active: Option<NavTab>, path: &str) -> LayoutChrome {
        let dictionary = self.dictionaries.get(locale);
        let home = localized_href(locale, "");

        let nav = [
            (NavTab::Home, &dictionary.home_tab, ""),
            (NavTab::Blog, &dictionary.blog_tab, "/blog"),
            (NavTab::Tools, &dictionary.related_tools_title, "/tools"),
            (NavTab::About, &dictionary.about_tab, "/about"),
        ];
        let entries = nav
            .into_iter()
            .map(|(tab, label, suffix)| NavigationLinkView {
                label: label.clone(),
                href: localized_href(locale, suffix),
                is_active: active == Some(tab),
            })
            .collect();

        let options = Locale::ALL
            .into_iter()
            .map(|target| LanguageOptionView {
                code: target.code(),
                label: target.display_name(),
                href: localized_href(target, path),
                is_current: target == locale,
                track_params: AnalyticsEvent::LanguageSwitch {
                    from: locale,
                    to: target,
                }
                .params_json(),
            })
            .collect();

        let footer_links = [
            (&dictionary.privacy_policy, "/privacy"),
            (&dictionary.terms_of_service, "/terms"),
            (&dictionary.related_tools_title, "/tools"),
        ]
        .into_iter()
        .map(|(label, suffix)| FooterLinkView {
            label: label.clone(),
            href: localized_href(locale, suffix),
        })
        .collect();

        let alternates = Locale::ALL
            .into_iter()
            .map(|target| AlternateLinkView {
                hreflang: target.code(),
                href: self.canonical_url(target, path),
            })
            .collect();

        let website = json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": dictionary.title,
            "description": dictionary.description,
            "url": self.base_url,
            "inLanguage": locale.language_tag(),
            "creator": { "@type": "Organization", "name": self.site_name },
        });

        LayoutChrome {
            lang: locale.code(),
            brand: BrandView {
                title: dictionary.page_title.clone(),
                href: home,
                logo_src: LOGO_SRC,
            },
            navigation: NavigationView { entries },
            language: LanguageSwitcherView {
                current_label: locale.short_label(),
                options,
            },
            footer: FooterView {
                copy: dictionary.copyright.clone(),
                links: footer_links,
            },
            meta: PageMetaView {
                title: dictionary.title.clone(),
                description: dictionary.description.clone(),
                og_title: dictionary.title.clone(),
                og_description: dictionary.description.clone(),
                og_type: "website",
                og_locale: locale.og_locale(),
                og_image: None,
                site_name: self.site_name.clone(),
                canonical: self.canonical_url(locale, path),
                alternates,
                x_default: self.canonical_url(Locale::DEFAULT, path),
                website_ld_json: ld_json(&website),
                page_ld_json: None,
            },
            scripts: ScriptsView {
                analytics: self.analytics.clone(),
                ads_config_json: self
                    .ads
                    .as_ref()
                    .and_then(|ads| serde_json::to_string(ads).ok()),
                page_event: None,
            },
        }
    }

    pub fn canonical_url(&self, locale: Locale, path: &str) -> String {
        canonical_url(&self.base_url, &localized_href(locale, path))
    }

    /// `None` when ads are disabled.
    pub fn ad_slot(&self, placement: AdPlacement) -> Option<AdSlotView> {
        let ads = self.ads.as_ref()?;
        let unit = placement.unit();
        Some(AdSlotView {
            placement: placement.name(),
            publisher_id: ads.publisher_id.clone(),
            slot: unit.slot,
            format: unit.format,
            layout: unit.layout,
            responsive: if unit.responsive { "true" } else { "false" },
            style: unit.style,
            timeout_ms: timeout_ms(unit),
        })
    }

    /// Absolute URL for a site-relative asset path.
    pub fn absolute(&self, path: &str) -> String {
        canonical_url(&self.base_url, path)
    }
}

pub fn localized_href(locale: Locale, path: &str) -> String {
    format!("/{}{}", locale.code(), path)
}

pub fn canonical_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path == "/" {
        base.to_string()
    } else {
        format!("{base}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(settings: &Settings) -> ChromeService {
        let dictionaries = Arc::new(DictionaryCatalog::load().expect("dictionaries"));
        ChromeService::new(dictionaries, settings)
    }

    #[test]
    fn language_switcher_keeps_the_current_path() {
        let chrome = service(&Settings::default()).load(Locale::Zh, Some(NavTab::Blog), "/blog/2");
        let hrefs: Vec<&str> = chrome
            .language
            .options
            .iter()
            .map(|option| option.href.as_str())
            .collect();
        assert_eq!(hrefs, vec!["/en/blog/2", "/zh/blog/2"]);
        assert_eq!(chrome.lang, "zh");
        assert_eq!(
            chrome.meta.canonical,
            "https://www.onepointstar.com/zh/blog/2"
        );
        assert_eq!(
            chrome.meta.x_default,
            "https://www.onepointstar.com/en/blog/2"
        );
    }

    #[test]
    fn active_tab_is_marked() {
        let chrome = service(&Settings::default()).load(Locale::En, Some(NavTab::Tools), "/tools");
        let active: Vec<&str> = chrome
            .navigation
            .entries
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.href.as_str())
            .collect();
        assert_eq!(active, vec!["/en/tools"]);
        assert_eq!(chrome.footer.links.len(), 3);
    }

    #[test]
    fn integrations_follow_settings() {
        let mut settings = Settings::default();
        let disabled = service(&settings);
        assert!(disabled.ad_slot(AdPlacement::Sidebar).is_none());
        let chrome = disabled.load(Locale::En, None, "");
        assert!(chrome.scripts.analytics.is_none());
        assert!(chrome.scripts.ads_config_json.is_none());

        settings.ads.enabled = true;
        settings.analytics.enabled = true;
        let enabled = service(&settings);
        let slot = enabled.ad_slot(AdPlacement::Sidebar).expect("ads on");
        assert_eq!(slot.timeout_ms, 4000);
        let chrome = enabled.load(Locale::En, None, "");
        assert!(chrome.scripts.analytics.is_some());
        assert!(chrome.scripts.ads_config_json.is_some());
    }
}
