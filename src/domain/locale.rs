//! The closed set of site locales.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

const EN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");
const ZH_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]/[month padding:none]/[day padding:none]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];
    pub const DEFAULT: Locale = Locale::En;

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    /// Exact match against a supported code; `None` for anything else.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code() == code)
    }

    /// Resolve a raw code, falling back to [`Locale::DEFAULT`] when unsupported.
    pub fn resolve(code: &str) -> Self {
        Self::parse(code).unwrap_or(Self::DEFAULT)
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Zh => "zh_CN",
        }
    }

    pub fn language_tag(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Zh => "zh-CN",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Zh => "中文",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Zh => "中文",
        }
    }

    /// Short numeric date the way each audience writes it (`11/2/2025`, `2025/11/2`).
    pub fn format_date(self, date: Date) -> String {
        let format = match self {
            Locale::En => EN_DATE_FORMAT,
            Locale::Zh => ZH_DATE_FORMAT,
        };
        date.format(format).unwrap_or_else(|_| date.to_string())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_is_exact() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("zh"), Some(Locale::Zh));
        assert_eq!(Locale::parse("ZH"), None);
        assert_eq!(Locale::parse("zh-CN"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn unsupported_codes_resolve_to_default() {
        assert_eq!(Locale::resolve("fr"), Locale::En);
        assert_eq!(Locale::resolve("zh"), Locale::Zh);
        assert_eq!(Locale::parse("de"), None);
        assert_eq!(Locale::resolve("de"), Locale::DEFAULT);
    }

    #[test]
    fn dates_follow_each_audience() {
        let day = date!(2025 - 11 - 02);
        assert_eq!(Locale::En.format_date(day), "11/2/2025");
        assert_eq!(Locale::Zh.format_date(day), "2025/11/2");
    }
}
