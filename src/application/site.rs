//! Static export of the whole site into a directory tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    application::{
        error::{AppError, HttpError},
        page::{PageService, SiteRoute},
        sitemap::SitemapService,
    },
    domain::locale::Locale,
    infra::{assets, error::InfraError},
    presentation::views::{RedirectTemplate, render_template},
};

/// Counts of what an export wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub assets: usize,
}

/// Renders every route in every locale to `{dir}/{lang}{path}/index.html`
/// and writes the sitemap, robots file, public assets and a root redirect.
pub fn export_site(
    pages: &PageService,
    sitemap: &SitemapService,
    dir: &Path,
) -> Result<ExportSummary, AppError> {
    let mut summary = ExportSummary::default();

    for locale in Locale::ALL {
        for route in pages.routes() {
            let rendered = pages
                .render(locale, &route)
                .map_err(|err| render_failure(locale, &route, &err))?;
            let target = page_path(dir, locale, &route);
            write_file(&target, rendered.html.as_bytes())?;
            debug!(
                target = "onepointstar::export",
                path = %target.display(),
                status = rendered.status.as_u16(),
                "page written"
            );
            summary.pages += 1;
        }

        let not_found = pages
            .not_found(locale, "/404")
            .map_err(|err| render_failure(locale, &SiteRoute::NotFound("/404".into()), &err))?;
        write_file(
            &dir.join(locale.code()).join("404.html"),
            not_found.html.as_bytes(),
        )?;
    }

    let redirect = render_template(RedirectTemplate {
        target: format!("/{}/", Locale::DEFAULT.code()),
    })
    .map_err(|err| AppError::export(format!("root redirect: {}", err.detail())))?;
    write_file(&dir.join("index.html"), redirect.0.as_bytes())?;

    write_file(
        &dir.join("sitemap.xml"),
        sitemap.sitemap_xml(OffsetDateTime::now_utc()).as_bytes(),
    )?;
    write_file(&dir.join("robots.txt"), sitemap.robots_txt().as_bytes())?;

    let public_root = dir.join("static").join("public");
    for (path, contents) in assets::public_files() {
        write_file(&public_root.join(path), contents)?;
        summary.assets += 1;
    }

    info!(
        target = "onepointstar::export",
        directory = %dir.display(),
        pages = summary.pages,
        assets = summary.assets,
        "export finished"
    );

    Ok(summary)
}

fn page_path(dir: &Path, locale: Locale, route: &SiteRoute) -> PathBuf {
    let mut target = dir.join(locale.code());
    for segment in route.path().split('/').filter(|segment| !segment.is_empty()) {
        target.push(segment);
    }
    target.join("index.html")
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| AppError::from(InfraError::Io(err)))?;
    }
    fs::write(path, contents).map_err(|err| AppError::from(InfraError::Io(err)))
}

fn render_failure(locale: Locale, route: &SiteRoute, err: &HttpError) -> AppError {
    AppError::export(format!(
        "rendering /{}{} failed: {}",
        locale.code(),
        route.path(),
        err.detail()
    ))
}
