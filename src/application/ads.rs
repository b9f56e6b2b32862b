//! AdSense placements and the fill watchdog.

use std::time::Duration;

use serde::Serialize;

use crate::config::AdsSettings;

pub const ADSENSE_SCRIPT_BASE: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
const EXTENDED_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdPlacement {
    HomeBanner,
    Sidebar,
    InArticle,
    ArticleBottom,
}

impl AdPlacement {
    pub const ALL: [AdPlacement; 4] = [
        AdPlacement::HomeBanner,
        AdPlacement::Sidebar,
        AdPlacement::InArticle,
        AdPlacement::ArticleBottom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AdPlacement::HomeBanner => "home_banner",
            AdPlacement::Sidebar => "sidebar",
            AdPlacement::InArticle => "in_article",
            AdPlacement::ArticleBottom => "article_bottom",
        }
    }

    pub fn unit(self) -> &'static AdUnit {
        match self {
            AdPlacement::HomeBanner => &HOME_BANNER,
            AdPlacement::Sidebar => &SIDEBAR,
            AdPlacement::InArticle => &IN_ARTICLE,
            AdPlacement::ArticleBottom => &ARTICLE_BOTTOM,
        }
    }
}

#[derive(Debug)]
pub struct AdUnit {
    pub placement: AdPlacement,
    pub slot: &'static str,
    pub format: &'static str,
    pub layout: Option<&'static str>,
    pub responsive: bool,
    pub style: &'static str,
    pub timeout: Duration,
}

static HOME_BANNER: AdUnit = AdUnit {
    placement: AdPlacement::HomeBanner,
    slot: "3951498119",
    format: "auto",
    layout: None,
    responsive: true,
    style: "display:block;width:100%;height:250px",
    timeout: DEFAULT_TIMEOUT,
};

static SIDEBAR: AdUnit = AdUnit {
    placement: AdPlacement::Sidebar,
    slot: "3951498119",
    format: "auto",
    layout: None,
    responsive: true,
    style: "display:block;width:300px;height:600px",
    timeout: EXTENDED_TIMEOUT,
};

static IN_ARTICLE: AdUnit = AdUnit {
    placement: AdPlacement::InArticle,
    slot: "9012253107",
    format: "fluid",
    layout: Some("in-article"),
    responsive: false,
    style: "display:block;text-align:center",
    timeout: EXTENDED_TIMEOUT,
};

static ARTICLE_BOTTOM: AdUnit = AdUnit {
    placement: AdPlacement::ArticleBottom,
    slot: "3951498119",
    format: "auto",
    layout: None,
    responsive: true,
    style: "display:block;width:100%;height:250px",
    timeout: DEFAULT_TIMEOUT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdVisibility {
    /// Requested; no fill seen yet and the timeout has not elapsed.
    Pending,
    Visible,
    Hidden,
}

/// Timing rules shared by every slot. The browser script receives the same
/// numbers and applies the same decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchdogPolicy {
    pub push_delay: Duration,
    pub poll_interval: Duration,
    pub poll_window: Duration,
}

impl Default for WatchdogPolicy {
    fn default() -> Self {
        Self {
            push_delay: Duration::from_millis(100),
            poll_interval: Duration::from_millis(500),
            poll_window: Duration::from_millis(2000),
        }
    }
}

impl WatchdogPolicy {
    pub fn from_settings(settings: &AdsSettings) -> Self {
        Self {
            push_delay: settings.push_delay,
            poll_interval: settings.poll_interval,
            poll_window: settings.poll_window,
        }
    }

    /// The instants (since mount) at which the slot is checked for a fill.
    pub fn poll_ticks(&self) -> impl Iterator<Item = Duration> + '_ {
        let count = (self.poll_window.as_millis() / self.poll_interval.as_millis().max(1)) as u32;
        (1..=count).map(move |tick| self.push_delay + self.poll_interval * tick)
    }

    /// Visibility of a slot `elapsed` after mount, given when (if ever) the
    /// slot first reported a fill. A fill only counts once a poll observes
    /// it and only before the slot's timeout fires.
    pub fn visibility(
        &self,
        timeout: Duration,
        elapsed: Duration,
        filled_at: Option<Duration>,
    ) -> AdVisibility {
        let observed = filled_at.and_then(|filled| {
            self.poll_ticks()
                .find(|tick| *tick >= filled && *tick < timeout)
        });

        match observed {
            Some(tick) if tick <= elapsed => AdVisibility::Visible,
            _ if elapsed >= timeout => AdVisibility::Hidden,
            _ => AdVisibility::Pending,
        }
    }
}

/// Parameters handed to the client loader.
#[derive(Clone, Debug, Serialize)]
pub struct AdsClientConfig {
    pub publisher_id: String,
    pub script_src: String,
    pub push_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub poll_window_ms: u64,
    /// Watchdog ticks, measured from mount, at which the script checks for a fill.
    pub poll_ticks_ms: Vec<u64>,
}

impl AdsClientConfig {
    pub fn from_settings(settings: &AdsSettings) -> Self {
        Self {
            publisher_id: settings.publisher_id.clone(),
            script_src: format!("{ADSENSE_SCRIPT_BASE}?client={}", settings.publisher_id),
            push_delay_ms: millis(settings.push_delay),
            poll_interval_ms: millis(settings.poll_interval),
            poll_window_ms: millis(settings.poll_window),
            poll_ticks_ms: WatchdogPolicy::from_settings(settings)
                .poll_ticks()
                .map(millis)
                .collect(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub fn timeout_ms(unit: &AdUnit) -> u64 {
    millis(unit.timeout)
}
