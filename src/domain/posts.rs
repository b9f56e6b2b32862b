mod data;

use std::collections::BTreeSet;

use time::OffsetDateTime;

pub use data::POSTS;

use super::{error::DomainError, locale::Locale};

/// A string with a mandatory default-locale entry and optional translations.
#[derive(Clone, Copy, Debug)]
pub struct Localized {
    pub en: &'static str,
    pub zh: Option<&'static str>,
}

impl Localized {
    pub const fn new(en: &'static str, zh: &'static str) -> Self {
        Self { en, zh: Some(zh) }
    }

    pub const fn only_default(en: &'static str) -> Self {
        Self { en, zh: None }
    }

    /// Returns the entry for `locale`, falling back to the default entry when
    /// the translation is missing or blank.
    pub fn get(&self, locale: Locale) -> &'static str {
        let translated = match locale {
            Locale::En => Some(self.en),
            Locale::Zh => self.zh,
        };
        translated
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(self.en)
    }

    pub fn has_default(&self) -> bool {
        !self.en.trim().is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct BlogPost {
    pub id: u32,
    pub title: Localized,
    pub summary: Localized,
    pub content: Localized,
    pub published_at: OffsetDateTime,
    pub author: Option<&'static str>,
    pub tags: &'static [&'static str],
    pub image: Option<&'static str>,
}

pub fn all() -> &'static [BlogPost] {
    &POSTS
}

pub fn find_by_id(id: u32) -> Option<&'static BlogPost> {
    POSTS.iter().find(|post| post.id == id)
}

/// Newest first; ties keep the table order.
pub fn sorted(posts: &[BlogPost]) -> Vec<&BlogPost> {
    let mut sorted: Vec<&BlogPost> = posts.iter().collect();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted
}

/// Checks the table once at startup: ids are unique and every localized field
/// carries its default entry.
pub fn validate(posts: &[BlogPost]) -> Result<(), DomainError> {
    let mut seen = BTreeSet::new();
    for post in posts {
        if !seen.insert(post.id) {
            return Err(DomainError::invariant(format!(
                "duplicate blog post id {}",
                post.id
            )));
        }

        for (field, value) in [
            ("title", &post.title),
            ("summary", &post.summary),
            ("content", &post.content),
        ] {
            if !value.has_default() {
                return Err(DomainError::validation(format!(
                    "blog post {} is missing its default {field}",
                    post.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn post(id: u32, title: Localized, published_at: OffsetDateTime) -> BlogPost {
        BlogPost {
            id,
            title,
            summary: Localized::only_default("summary"),
            content: Localized::only_default("<p>body</p>"),
            published_at,
            author: None,
            tags: &[],
            image: None,
        }
    }

    #[test]
    fn missing_translation_falls_back_to_default() {
        let value = Localized::only_default("Hello");
        assert_eq!(value.get(Locale::Zh), "Hello");

        let blank = Localized::new("Hello", "  ");
        assert_eq!(blank.get(Locale::Zh), "Hello");

        let translated = Localized::new("Hello", "你好");
        assert_eq!(translated.get(Locale::Zh), "你好");
        assert_eq!(translated.get(Locale::En), "Hello");
    }

    #[test]
    fn static_table_is_valid() {
        validate(all()).expect("shipped posts validate");
        assert!(find_by_id(2).is_some());
        assert!(find_by_id(999).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let at = datetime!(2025-01-01 0:00 UTC);
        let posts = [
            post(1, Localized::only_default("a"), at),
            post(1, Localized::only_default("b"), at),
        ];
        assert!(matches!(
            validate(&posts),
            Err(DomainError::Invariant { .. })
        ));
    }

    #[test]
    fn blank_default_entry_is_rejected() {
        let posts = [post(
            7,
            Localized::new("", "标题"),
            datetime!(2025-01-01 0:00 UTC),
        )];
        assert!(matches!(
            validate(&posts),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn sorted_is_newest_first() {
        let ids: Vec<u32> = sorted(all()).iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
