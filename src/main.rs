use std::{process, sync::Arc, time::Duration};

use onepointstar::{
    application::{
        blog::BlogService, chrome::ChromeService, dictionary::DictionaryCatalog,
        error::AppError, page::PageService, site, sitemap::SitemapService,
    },
    config,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        media::MediaStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Export(args) => run_export(settings, args),
    }
}

/// Services shared by the server and the exporter.
struct SiteServices {
    pages: Arc<PageService>,
    sitemap: Arc<SitemapService>,
}

fn build_site_services(settings: &config::Settings) -> Result<SiteServices, AppError> {
    let dictionaries = Arc::new(DictionaryCatalog::load()?);
    let blog = BlogService::shipped()?;
    let chrome = ChromeService::new(dictionaries.clone(), settings);
    let pages = PageService::new(
        chrome,
        dictionaries,
        blog,
        settings.site.contact_email.clone(),
    );
    let sitemap = SitemapService::new(settings.site.base_url.clone(), blog);

    Ok(SiteServices {
        pages: Arc::new(pages),
        sitemap: Arc::new(sitemap),
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let services = build_site_services(&settings)?;
    let media = settings.site.media_dir.as_ref().map(|root| {
        if !root.is_dir() {
            warn!(
                target = "onepointstar::media",
                root = %root.display(),
                "media directory does not exist; media requests will 404"
            );
        }
        Arc::new(MediaStore::new(root.clone()))
    });

    let state = HttpState {
        pages: services.pages,
        sitemap: services.sitemap,
        media,
        negotiate: settings.locale.negotiate,
    };
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "onepointstar::server",
        addr = %settings.server.addr,
        base_url = %settings.site.base_url,
        analytics = settings.analytics.enabled,
        ads = settings.ads.enabled,
        "listening"
    );

    let grace = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(grace))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "onepointstar::server", "server stopped");
    Ok(())
}

/// Resolves on ctrl-c; a second timer forces exit if draining exceeds `grace`.
async fn shutdown_signal(grace: Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            target = "onepointstar::server",
            error = %err,
            "failed to listen for shutdown signal"
        );
        return;
    }

    info!(
        target = "onepointstar::server",
        grace_seconds = grace.as_secs(),
        "shutdown requested; draining connections"
    );

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!(
            target = "onepointstar::server",
            "graceful shutdown timed out; exiting"
        );
        process::exit(1);
    });
}

fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let services = build_site_services(&settings)?;
    let directory = args.directory;

    info!(
        target = "onepointstar::export",
        directory = %directory.display(),
        "Starting export"
    );

    let summary = site::export_site(&services.pages, &services.sitemap, &directory)?;
    info!(
        target = "onepointstar::export",
        pages = summary.pages,
        assets = summary.assets,
        "Export completed"
    );
    Ok(())
}
