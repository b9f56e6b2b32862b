//! Locale resolution for incoming paths.

use crate::domain::locale::Locale;

pub const LOCALE_COOKIE: &str = "i18nlang";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocaleDecision {
    PassThrough,
    Redirect { location: String, locale: Locale },
}

/// Decides whether `path` already carries a locale prefix and, if not, where
/// to send the client. `query` is the raw query string without the `?`.
pub fn resolve_path(path: &str, query: Option<&str>, locale: Locale) -> LocaleDecision {
    if is_internal_asset(path) || has_locale_prefix(path) {
        return LocaleDecision::PassThrough;
    }

    let mut location = format!("/{}{}", locale.code(), path);
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        location.push('?');
        location.push_str(query);
    }

    LocaleDecision::Redirect { location, locale }
}

fn is_internal_asset(path: &str) -> bool {
    path.starts_with("/_next") || path.starts_with("/static/") || path.contains('.')
}

pub fn has_locale_prefix(path: &str) -> bool {
    Locale::ALL.into_iter().any(|locale| {
        path.strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(locale.code()))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Picks a locale from the persistence cookie, then `Accept-Language`, then the default.
pub fn negotiate(cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = cookie.and_then(|value| Locale::parse(value.trim())) {
        return locale;
    }

    accept_language
        .and_then(match_accept_language)
        .unwrap_or(Locale::DEFAULT)
}

fn match_accept_language(header: &str) -> Option<Locale> {
    let mut ranges: Vec<(f32, usize, String)> = header
        .split(',')
        .enumerate()
        .filter_map(|(position, raw)| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim().to_ascii_lowercase();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|value| value.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((quality, position, tag))
        })
        .collect();

    ranges.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    ranges.into_iter().find_map(|(_, _, tag)| {
        let primary = tag.split('-').next().unwrap_or(&tag);
        Locale::parse(primary)
    })
}

/// Value of the `i18nlang` cookie in a raw `Cookie` header.
pub fn cookie_locale(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == LOCALE_COOKIE).then_some(value)
    })
}

pub fn set_cookie_value(locale: Locale) -> String {
    format!("{LOCALE_COOKIE}={}; Path=/", locale.code())
}
