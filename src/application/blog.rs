//! Locale projections over the static blog table.

use time::OffsetDateTime;

use crate::domain::{
    error::DomainError,
    locale::Locale,
    posts::{self, BlogPost},
};

/// A blog post flattened onto one locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalizedPost {
    pub id: u32,
    pub locale: Locale,
    pub title: &'static str,
    pub summary: &'static str,
    pub content: &'static str,
    pub published_at: OffsetDateTime,
    pub author: Option<&'static str>,
    pub tags: &'static [&'static str],
    pub image: Option<&'static str>,
}

impl LocalizedPost {
    fn project(post: &BlogPost, locale: Locale) -> Self {
        Self {
            id: post.id,
            locale,
            title: post.title.get(locale),
            summary: post.summary.get(locale),
            content: post.content.get(locale),
            published_at: post.published_at,
            author: post.author,
            tags: post.tags,
            image: post.image,
        }
    }
}

#[derive(Clone, Copy)]
pub struct BlogService {
    posts: &'static [BlogPost],
}

impl BlogService {
    /// Validates the table before exposing it.
    pub fn new(posts: &'static [BlogPost]) -> Result<Self, DomainError> {
        posts::validate(posts)?;
        Ok(Self { posts })
    }

    pub fn shipped() -> Result<Self, DomainError> {
        Self::new(posts::all())
    }

    pub fn list_posts(&self, locale: Locale) -> Vec<LocalizedPost> {
        posts::sorted(self.posts)
            .into_iter()
            .map(|post| LocalizedPost::project(post, locale))
            .collect()
    }

    pub fn get_post(&self, id: u32, locale: Locale) -> Option<LocalizedPost> {
        self.posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| LocalizedPost::project(post, locale))
    }

    pub fn latest(&self, locale: Locale) -> Option<LocalizedPost> {
        self.list_posts(locale).into_iter().next()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.posts.iter().map(|post| post.id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::Localized;
    use time::macros::datetime;

    static PARTIAL: [BlogPost; 1] = [BlogPost {
        id: 42,
        title: Localized::only_default("English only"),
        summary: Localized::new("Summary", "摘要"),
        content: Localized::only_default("<p>Body</p>"),
        published_at: datetime!(2024-06-01 8:00 UTC),
        author: None,
        tags: &[],
        image: None,
    }];

    #[test]
    fn every_post_is_complete_in_every_locale() {
        let service = BlogService::shipped().expect("valid table");
        for locale in Locale::ALL {
            for id in service.ids() {
                let post = service.get_post(id, locale).expect("post exists");
                assert!(!post.title.is_empty());
                assert!(!post.summary.is_empty());
                assert!(!post.content.is_empty());
            }
        }
    }

    #[test]
    fn list_is_sorted_newest_first() {
        let service = BlogService::shipped().expect("valid table");
        for locale in Locale::ALL {
            let posts = service.list_posts(locale);
            assert_eq!(posts.len(), service.len());
            assert!(
                posts
                    .windows(2)
                    .all(|pair| pair[0].published_at >= pair[1].published_at)
            );
        }
    }

    #[test]
    fn chinese_projection_uses_translations() {
        let service = BlogService::shipped().expect("valid table");
        let post = service.get_post(2, Locale::Zh).expect("post 2");
        assert_eq!(post.title, "Indie Kickoff第一个月的总结");
        assert_eq!(post.summary, "第一步永远最难，但也是最有力量的一步。");
    }

    #[test]
    fn unknown_id_is_none() {
        let service = BlogService::shipped().expect("valid table");
        assert!(service.get_post(999, Locale::En).is_none());
    }

    #[test]
    fn fallback_applies_field_by_field() {
        let service = BlogService::new(&PARTIAL).expect("valid table");
        let post = service.get_post(42, Locale::Zh).expect("post");
        assert_eq!(post.title, "English only");
        assert_eq!(post.summary, "摘要");
        assert_eq!(post.content, "<p>Body</p>");
    }
}
