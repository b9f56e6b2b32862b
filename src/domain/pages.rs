//! Long-form static pages (about, privacy, terms).

use super::{locale::Locale, posts::Localized};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    About,
    Privacy,
    Terms,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::About, PageKind::Privacy, PageKind::Terms];

    /// Path segment under `/{lang}`.
    pub fn segment(self) -> &'static str {
        match self {
            PageKind::About => "about",
            PageKind::Privacy => "privacy",
            PageKind::Terms => "terms",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.segment() == segment)
    }

    pub fn page(self) -> &'static StaticPage {
        match self {
            PageKind::About => &ABOUT,
            PageKind::Privacy => &PRIVACY,
            PageKind::Terms => &TERMS,
        }
    }
}

#[derive(Debug)]
pub struct StaticPage {
    pub kind: PageKind,
    pub title: Localized,
    pub description: Localized,
    pub body: Localized,
}

impl StaticPage {
    pub fn title(&self, locale: Locale) -> &'static str {
        self.title.get(locale)
    }

    pub fn description(&self, locale: Locale) -> &'static str {
        self.description.get(locale)
    }

    pub fn body(&self, locale: Locale) -> &'static str {
        self.body.get(locale)
    }
}

static ABOUT: StaticPage = StaticPage {
    kind: PageKind::About,
    title: Localized::new(
        "About The Global Hub for Indie Hackers",
        "关于独立开发者全球聚集地",
    ),
    description: Localized::new(
        "Connecting Indie Hackers Worldwide",
        "连接全球独立开发者，分享经验与资源",
    ),
    body: Localized::new(
        include_str!("../../content/pages/about.en.html"),
        include_str!("../../content/pages/about.zh.html"),
    ),
};

static PRIVACY: StaticPage = StaticPage {
    kind: PageKind::Privacy,
    title: Localized::new("Privacy Policy", "隐私政策"),
    description: Localized::new(
        "Our privacy policy explaining how we collect, use and protect your personal information.",
        "本网站的隐私政策，说明我们如何收集、使用和保护您的个人信息。",
    ),
    body: Localized::new(
        include_str!("../../content/pages/privacy.en.html"),
        include_str!("../../content/pages/privacy.zh.html"),
    ),
};

static TERMS: StaticPage = StaticPage {
    kind: PageKind::Terms,
    title: Localized::new("Terms of Service", "服务条款"),
    description: Localized::new(
        "Terms of service for using our website and its features.",
        "本网站的服务条款，说明使用本网站服务的条件和规则。",
    ),
    body: Localized::new(
        include_str!("../../content/pages/terms.en.html"),
        include_str!("../../content/pages/terms.zh.html"),
    ),
};
