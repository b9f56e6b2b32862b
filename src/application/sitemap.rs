//! Sitemap service for sitemap.xml and robots.txt generation.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::{blog::BlogService, chrome::canonical_url};
use crate::domain::locale::Locale;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: OffsetDateTime,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
}

const STATIC_PAGES: [(&str, ChangeFrequency, f32); 6] = [
    ("", ChangeFrequency::Daily, 1.0),
    ("/about", ChangeFrequency::Monthly, 0.7),
    ("/blog", ChangeFrequency::Weekly, 0.8),
    ("/tools", ChangeFrequency::Weekly, 0.8),
    ("/privacy", ChangeFrequency::Monthly, 0.7),
    ("/terms", ChangeFrequency::Monthly, 0.7),
];

#[derive(Clone)]
pub struct SitemapService {
    base_url: String,
    blog: BlogService,
}

impl SitemapService {
    pub fn new(base_url: impl Into<String>, blog: BlogService) -> Self {
        Self {
            base_url: base_url.into(),
            blog,
        }
    }

    /// Static pages carry `generated_at` as lastmod; posts carry their publish time.
    pub fn entries(&self, generated_at: OffsetDateTime) -> Vec<SitemapEntry> {
        let mut entries = Vec::new();

        for (page, changefreq, priority) in STATIC_PAGES {
            for locale in Locale::ALL {
                entries.push(SitemapEntry {
                    loc: canonical_url(&self.base_url, &format!("/{}{page}", locale.code())),
                    lastmod: generated_at,
                    changefreq,
                    priority,
                });
            }
        }

        for locale in Locale::ALL {
            for post in self.blog.list_posts(locale) {
                entries.push(SitemapEntry {
                    loc: canonical_url(
                        &self.base_url,
                        &format!("/{}/blog/{}", locale.code(), post.id),
                    ),
                    lastmod: post.published_at,
                    changefreq: ChangeFrequency::Monthly,
                    priority: 0.6,
                });
            }
        }

        entries
    }

    pub fn sitemap_xml(&self, generated_at: OffsetDateTime) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in self.entries(generated_at) {
            xml.push_str(&sitemap_entry(&entry));
        }
        xml.push_str("</urlset>\n");
        xml
    }

    pub fn robots_txt(&self) -> String {
        let sitemap_url = canonical_url(&self.base_url, "/sitemap.xml");
        format!("User-agent: *\nAllow: /\nSitemap: {sitemap_url}\n")
    }
}

fn sitemap_entry(entry: &SitemapEntry) -> String {
    let lastmod = entry.lastmod.format(&Rfc3339).unwrap_or_default();
    format!(
        "  <url><loc>{}</loc><lastmod>{lastmod}</lastmod><changefreq>{}</changefreq><priority>{:.1}</priority></url>\n",
        entry.loc,
        entry.changefreq.as_str(),
        entry.priority
    )
}
