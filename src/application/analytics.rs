//! Google Analytics events emitted by the client script.

use serde::Serialize;

use crate::{config::AnalyticsSettings, domain::locale::Locale};

pub const GTAG_SCRIPT_BASE: &str = "https://www.googletagmanager.com/gtag/js";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    ReadArticle { post_id: u32, title: String },
    ViewTools { tool: Option<String> },
    LanguageSwitch { from: Locale, to: Locale },
    ClickExternalLink { url: String, text: Option<String> },
    Search { query: String },
}

/// gtag `event` parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventParams {
    pub event_category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl AnalyticsEvent {
    pub fn action(&self) -> &'static str {
        match self {
            AnalyticsEvent::ReadArticle { .. } => "read_article",
            AnalyticsEvent::ViewTools { .. } => "view_tools",
            AnalyticsEvent::LanguageSwitch { .. } => "language_switch",
            AnalyticsEvent::ClickExternalLink { .. } => "click_external_link",
            AnalyticsEvent::Search { .. } => "search",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            AnalyticsEvent::ReadArticle { .. } | AnalyticsEvent::Search { .. } => "engagement",
            AnalyticsEvent::ViewTools { .. } => "navigation",
            AnalyticsEvent::LanguageSwitch { .. } => "user_interaction",
            AnalyticsEvent::ClickExternalLink { .. } => "outbound",
        }
    }

    pub fn label(&self) -> String {
        match self {
            AnalyticsEvent::ReadArticle { post_id, title } => format!("blog_{post_id}_{title}"),
            AnalyticsEvent::ViewTools { tool } => {
                tool.clone().unwrap_or_else(|| "tools_page".to_string())
            }
            AnalyticsEvent::LanguageSwitch { from, to } => format!("{from}_to_{to}"),
            AnalyticsEvent::ClickExternalLink { url, text } => {
                text.clone().unwrap_or_else(|| url.clone())
            }
            AnalyticsEvent::Search { query } => query.clone(),
        }
    }

    pub fn params(&self) -> EventParams {
        EventParams {
            event_category: self.category(),
            event_label: Some(self.label()),
            value: None,
        }
    }

    /// JSON for a `data-track-params` attribute.
    pub fn params_json(&self) -> String {
        serde_json::to_string(&self.params()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parameters handed to the client loader.
#[derive(Clone, Debug, Serialize)]
pub struct AnalyticsClientConfig {
    pub tracking_id: String,
    pub script_src: String,
}

impl AnalyticsClientConfig {
    pub fn from_settings(settings: &AnalyticsSettings) -> Option<Self> {
        settings.enabled.then(|| Self {
            tracking_id: settings.tracking_id.clone(),
            script_src: format!("{GTAG_SCRIPT_BASE}?id={}", settings.tracking_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_switch_label_joins_codes() {
        let event = AnalyticsEvent::LanguageSwitch {
            from: Locale::En,
            to: Locale::Zh,
        };
        assert_eq!(event.action(), "language_switch");
        assert_eq!(event.label(), "en_to_zh");
        assert_eq!(event.category(), "user_interaction");
    }

    #[test]
    fn params_serialize_to_gtag_shape() {
        let event = AnalyticsEvent::ReadArticle {
            post_id: 2,
            title: "Indie Kickoff".to_string(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&event.params_json()).expect("valid json");
        assert_eq!(json["event_category"], "engagement");
        assert_eq!(json["event_label"], "blog_2_Indie Kickoff");
        assert!(json.get("value").is_none());
    }

    #[test]
    fn fallback_labels() {
        assert_eq!(
            AnalyticsEvent::ViewTools { tool: None }.label(),
            "tools_page"
        );
        let click = AnalyticsEvent::ClickExternalLink {
            url: "https://tinypng.com".to_string(),
            text: None,
        };
        assert_eq!(click.label(), "https://tinypng.com");
        assert_eq!(click.category(), "outbound");
    }

    #[test]
    fn search_and_named_tool_events() {
        let search = AnalyticsEvent::Search {
            query: "image compression".to_string(),
        };
        assert_eq!(search.action(), "search");
        assert_eq!(search.category(), "engagement");
        assert_eq!(search.label(), "image compression");

        let tool = AnalyticsEvent::ViewTools {
            tool: Some("TinyPNG".to_string()),
        };
        assert_eq!(tool.action(), "view_tools");
        assert_eq!(tool.label(), "TinyPNG");
    }

    #[test]
    fn disabled_analytics_emits_nothing() {
        let mut settings = crate::config::Settings::default().analytics;
        assert!(AnalyticsClientConfig::from_settings(&settings).is_none());
        settings.enabled = true;
        let config = AnalyticsClientConfig::from_settings(&settings).expect("enabled");
        assert_eq!(
            config.script_src,
            "https://www.googletagmanager.com/gtag/js?id=G-M5337L4H8R"
        );
    }
}
