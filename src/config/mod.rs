//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, ExportArgs, ServeArgs, ServeOverrides, SiteOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "onepointstar";
const ENV_PREFIX: &str = "ONEPOINTSTAR";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_BASE_URL: &str = "https://www.onepointstar.com";
const DEFAULT_SITE_NAME: &str = "One Point Star";
const DEFAULT_CONTACT_EMAIL: &str = "contact@onepointstar.com";
const DEFAULT_TRACKING_ID: &str = "G-M5337L4H8R";
const DEFAULT_PUBLISHER_ID: &str = "ca-pub-123456";
const DEFAULT_PUSH_DELAY_MS: u64 = 100;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_POLL_WINDOW_MS: u64 = 2000;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub site: SiteSettings,
    pub locale: LocaleSettings,
    pub analytics: AnalyticsSettings,
    pub ads: AdsSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Absolute origin without a trailing slash, e.g. `https://www.onepointstar.com`.
    pub base_url: String,
    pub name: String,
    pub contact_email: String,
    pub media_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleSettings {
    pub negotiate: bool,
}

#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    pub enabled: bool,
    pub tracking_id: String,
}

#[derive(Debug, Clone)]
pub struct AdsSettings {
    pub enabled: bool,
    pub publisher_id: String,
    pub push_delay: Duration,
    pub poll_interval: Duration,
    pub poll_window: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Export(args)) => raw.apply_site_overrides(&args.site),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    site: RawSiteSettings,
    locale: RawLocaleSettings,
    analytics: RawAnalyticsSettings,
    ads: RawAdsSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(negotiate) = overrides.locale_negotiate {
            self.locale.negotiate = Some(negotiate);
        }
        if let Some(dir) = overrides.media_dir.as_ref() {
            self.site.media_dir = Some(dir.clone());
        }

        self.apply_site_overrides(&overrides.site);
    }

    fn apply_site_overrides(&mut self, overrides: &SiteOverrides) {
        if let Some(url) = overrides.base_url.as_ref() {
            self.site.base_url = Some(url.clone());
        }
        if let Some(enabled) = overrides.analytics_enabled {
            self.analytics.enabled = Some(enabled);
        }
        if let Some(enabled) = overrides.ads_enabled {
            self.ads.enabled = Some(enabled);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            site,
            locale,
            analytics,
            ads,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            site: build_site_settings(site)?,
            locale: LocaleSettings {
                negotiate: locale.negotiate.unwrap_or(false),
            },
            analytics: build_analytics_settings(analytics)?,
            ads: build_ads_settings(ads)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
                graceful_shutdown: Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_SECS),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            site: SiteSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                name: DEFAULT_SITE_NAME.to_string(),
                contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
                media_dir: None,
            },
            locale: LocaleSettings::default(),
            analytics: AnalyticsSettings {
                enabled: false,
                tracking_id: DEFAULT_TRACKING_ID.to_string(),
            },
            ads: AdsSettings {
                enabled: false,
                publisher_id: DEFAULT_PUBLISHER_ID.to_string(),
                push_delay: Duration::from_millis(DEFAULT_PUSH_DELAY_MS),
                poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
                poll_window: Duration::from_millis(DEFAULT_POLL_WINDOW_MS),
            },
        }
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let raw_url = site
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = normalize_base_url(&raw_url)
        .map_err(|reason| LoadError::invalid("site.base_url", reason))?;

    let name = non_empty(site.name, DEFAULT_SITE_NAME);
    let contact_email = non_empty(site.contact_email, DEFAULT_CONTACT_EMAIL);
    if !contact_email.contains('@') {
        return Err(LoadError::invalid(
            "site.contact_email",
            format!("`{contact_email}` is not an email address"),
        ));
    }

    let media_dir = site.media_dir.filter(|dir| !dir.as_os_str().is_empty());

    Ok(SiteSettings {
        base_url,
        name,
        contact_email,
        media_dir,
    })
}

fn build_analytics_settings(
    analytics: RawAnalyticsSettings,
) -> Result<AnalyticsSettings, LoadError> {
    let tracking_id = non_empty(analytics.tracking_id, DEFAULT_TRACKING_ID);
    if !tracking_id.starts_with("G-") {
        return Err(LoadError::invalid(
            "analytics.tracking_id",
            "expected a measurement id starting with `G-`",
        ));
    }

    Ok(AnalyticsSettings {
        enabled: analytics.enabled.unwrap_or(false),
        tracking_id,
    })
}

fn build_ads_settings(ads: RawAdsSettings) -> Result<AdsSettings, LoadError> {
    let publisher_id = non_empty(ads.publisher_id, DEFAULT_PUBLISHER_ID);
    if !publisher_id.starts_with("ca-pub-") {
        return Err(LoadError::invalid(
            "ads.publisher_id",
            "expected a publisher id starting with `ca-pub-`",
        ));
    }

    let push_delay = ads.push_delay_ms.unwrap_or(DEFAULT_PUSH_DELAY_MS);

    let poll_interval = ads.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_interval == 0 {
        return Err(LoadError::invalid(
            "ads.poll_interval_ms",
            "must be greater than zero",
        ));
    }

    let poll_window = ads.poll_window_ms.unwrap_or(DEFAULT_POLL_WINDOW_MS);
    if poll_window < poll_interval {
        return Err(LoadError::invalid(
            "ads.poll_window_ms",
            "must be at least one poll interval",
        ));
    }

    Ok(AdsSettings {
        enabled: ads.enabled.unwrap_or(false),
        publisher_id,
        push_delay: Duration::from_millis(push_delay),
        poll_interval: Duration::from_millis(poll_interval),
        poll_window: Duration::from_millis(poll_window),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    base_url: Option<String>,
    name: Option<String>,
    contact_email: Option<String>,
    media_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLocaleSettings {
    negotiate: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAnalyticsSettings {
    enabled: Option<bool>,
    tracking_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAdsSettings {
    enabled: Option<bool>,
    publisher_id: Option<String>,
    push_delay_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    poll_window_ms: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|err| format!("invalid url `{raw}`: {err}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(format!("url `{raw}` has no host"));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn non_empty(value: Option<String>, default: &str) -> String {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
