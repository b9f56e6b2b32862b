//! Per-locale string bundles, parsed from the embedded TOML files at startup.

use serde::Deserialize;

use crate::{domain::locale::Locale, infra::error::InfraError};

const EN_SOURCE: &str = include_str!("../../locales/en.toml");
const ZH_SOURCE: &str = include_str!("../../locales/zh.toml");

#[derive(Clone, Debug, Deserialize)]
pub struct Dictionary {
    pub title: String,
    pub description: String,
    pub page_title: String,
    pub home_tab: String,
    pub blog_tab: String,
    pub about_tab: String,
    pub related_tools_title: String,
    pub related_tools_note: String,
    pub blog_title: String,
    pub blog_description: String,
    pub no_posts: String,
    pub read_more: String,
    pub published_on: String,
    pub back_to_blog: String,
    pub author_label: String,
    pub tags_label: String,
    pub copyright: String,
    pub privacy_policy: String,
    pub terms_of_service: String,
    pub tools_page_title: String,
    pub tools_page_subtitle: String,
    pub tools_page_description: String,
    pub seo_content: String,
    pub visit_tool: String,
    pub faq_title: String,
    pub home: HomeStrings,
    pub not_found: NotFoundStrings,
    #[serde(default)]
    pub related_tools: Vec<Tool>,
    #[serde(default)]
    pub faq_items: Vec<FaqItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HomeStrings {
    pub hero_title: String,
    pub read_blog: String,
    pub explore_tools: String,
    pub latest_article: String,
    pub read_more_arrow: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NotFoundStrings {
    pub title: String,
    pub message: String,
    pub back_home: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

impl Dictionary {
    pub fn parse(locale: Locale, source: &str) -> Result<Self, InfraError> {
        toml::from_str(source).map_err(|err| InfraError::dictionary(locale.code(), err.to_string()))
    }

    /// The dictionary's FAQ entries, or the three stock questions when it has none.
    pub fn faq(&self) -> Vec<FaqItem> {
        if self.faq_items.is_empty() {
            default_faq()
        } else {
            self.faq_items.clone()
        }
    }
}

fn default_faq() -> Vec<FaqItem> {
    [
        (
            "How do I use these tools with your platform?",
            "These tools are designed to complement our image comparison platform. You can use them to prepare, edit, or enhance your images before uploading them to our platform for comparison.",
        ),
        (
            "Are these tools free to use?",
            "Most of the tools listed offer free versions or free tiers. Some may have premium features available for advanced users. Please check each tool's website for detailed pricing information.",
        ),
        (
            "Can I suggest additional tools?",
            "Absolutely! We're always looking for new tools to add to our collection. If you know of a great tool that would benefit our community, please contact us and we'll consider adding it.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| FaqItem {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

#[derive(Clone, Debug)]
pub struct DictionaryCatalog {
    en: Dictionary,
    zh: Dictionary,
}

impl DictionaryCatalog {
    /// Parses the dictionaries compiled into the binary.
    pub fn load() -> Result<Self, InfraError> {
        Self::from_sources(EN_SOURCE, ZH_SOURCE)
    }

    pub fn from_sources(en: &str, zh: &str) -> Result<Self, InfraError> {
        Ok(Self {
            en: Dictionary::parse(Locale::En, en)?,
            zh: Dictionary::parse(Locale::Zh, zh)?,
        })
    }

    pub fn get(&self, locale: Locale) -> &Dictionary {
        match locale {
            Locale::En => &self.en,
            Locale::Zh => &self.zh,
        }
    }

    /// Looks a dictionary up by raw code; unsupported codes get the default.
    pub fn load_dictionary(&self, code: &str) -> &Dictionary {
        self.get(Locale::resolve(code))
    }

    /// Replaces one locale's dictionary.
    pub fn with_dictionary(mut self, locale: Locale, dictionary: Dictionary) -> Self {
        match locale {
            Locale::En => self.en = dictionary,
            Locale::Zh => self.zh = dictionary,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dictionaries_parse() {
        let catalog = DictionaryCatalog::load().expect("dictionaries parse");
        assert_eq!(catalog.get(Locale::En).blog_tab, "Blog");
        assert_eq!(catalog.get(Locale::Zh).home.features.len(), 3);
        assert!(!catalog.get(Locale::Zh).related_tools.is_empty());
    }

    #[test]
    fn unsupported_code_falls_back_to_default() {
        let catalog = DictionaryCatalog::load().expect("dictionaries parse");
        assert_eq!(
            catalog.load_dictionary("fr").title,
            catalog.get(Locale::En).title
        );
        assert_eq!(
            catalog.load_dictionary("zh").title,
            catalog.get(Locale::Zh).title
        );
    }

    #[test]
    fn empty_faq_uses_stock_entries() {
        let catalog = DictionaryCatalog::load().expect("dictionaries parse");
        let mut dictionary = catalog.get(Locale::En).clone();
        dictionary.faq_items.clear();
        let faq = dictionary.faq();
        assert_eq!(faq.len(), 3);
        assert_eq!(faq[1].question, "Are these tools free to use?");
    }

    #[test]
    fn malformed_source_names_its_locale() {
        let err = DictionaryCatalog::from_sources(EN_SOURCE, "title = ").expect_err("invalid toml");
        assert!(matches!(err, InfraError::Dictionary { locale: "zh", .. }));
    }
}
