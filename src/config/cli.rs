use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the One Point Star binary.
#[derive(Debug, Parser)]
#[command(
    name = "onepointstar",
    version,
    about = "One Point Star bilingual site server"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "ONEPOINTSTAR_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the site over HTTP.
    Serve(Box<ServeArgs>),
    /// Render every route for every locale into a directory.
    #[command(name = "export")]
    Export(ExportArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SiteOverrides {
    /// Override the public base URL used for canonical links and the sitemap.
    #[arg(long = "site-base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Toggle the Google Analytics tag.
    #[arg(
        long = "analytics-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub analytics_enabled: Option<bool>,

    /// Toggle AdSense placements.
    #[arg(
        long = "ads-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub ads_enabled: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub site: SiteOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Redirect unprefixed paths using the `i18nlang` cookie and `Accept-Language`.
    #[arg(
        long = "locale-negotiate",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub locale_negotiate: Option<bool>,

    /// Serve blog images and other media from this directory.
    #[arg(long = "site-media-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub media_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub site: SiteOverrides,

    /// Directory to write the rendered site into.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub directory: PathBuf,
}
