use std::{fs, sync::Arc};

use onepointstar::{
    application::{
        blog::BlogService, chrome::ChromeService, dictionary::DictionaryCatalog,
        page::PageService, site::export_site, sitemap::SitemapService,
    },
    config::Settings,
};

#[test]
fn export_writes_every_locale_route_and_assets() {
    let settings = Settings::default();
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

    let dir = tempfile::tempdir().expect("tempdir");
    let summary = export_site(&pages, &sitemap, dir.path()).expect("export succeeds");

    assert_eq!(summary.pages, 2 * (6 + blog.len()));
    assert!(summary.assets >= 3);

    let root = dir.path();
    for relative in [
        "index.html",
        "sitemap.xml",
        "robots.txt",
        "en/index.html",
        "en/blog/index.html",
        "zh/blog/2/index.html",
        "zh/tools/index.html",
        "en/privacy/index.html",
        "en/404.html",
        "static/public/css/site.css",
        "static/public/js/site.js",
        "static/public/logo.svg",
    ] {
        assert!(root.join(relative).is_file(), "missing {relative}");
    }

    let redirect = fs::read_to_string(root.join("index.html")).expect("read root");
    assert!(redirect.contains("url=/en/"));

    let post = fs::read_to_string(root.join("zh/blog/2/index.html")).expect("read post");
    assert!(post.contains("Indie Kickoff第一个月的总结"));

    let not_found = fs::read_to_string(root.join("zh/404.html")).expect("read 404");
    assert!(not_found.contains("lang=\"zh\""));
}
