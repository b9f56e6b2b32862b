use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{
    application::{
        error::ErrorReport,
        locale::{LocaleDecision, cookie_locale, negotiate, resolve_path, set_cookie_value},
    },
    domain::locale::Locale,
    infra::telemetry::METRIC_LOCALE_REDIRECT_TOTAL,
};

use super::public::HttpState;

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Sends paths without a locale prefix to `/{locale}{path}` and persists the
/// chosen locale in the `i18nlang` cookie.
pub async fn locale_redirect(
    State(state): State<HttpState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let locale = if state.negotiate {
        let headers = request.headers();
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(cookie_locale);
        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        negotiate(cookie, accept_language)
    } else {
        Locale::DEFAULT
    };

    let uri = request.uri();
    match resolve_path(uri.path(), uri.query(), locale) {
        LocaleDecision::PassThrough => next.run(request).await,
        LocaleDecision::Redirect { location, locale } => {
            counter!(METRIC_LOCALE_REDIRECT_TOTAL, "locale" => locale.code()).increment(1);
            debug!(
                target = "onepointstar::http::locale",
                path = %uri.path(),
                location = %location,
                locale = locale.code(),
                "redirecting to localized path"
            );
            redirect_response(&location, locale)
        }
    }
}

fn redirect_response(location: &str, locale: Locale) -> Response {
    let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
    let headers = response.headers_mut();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(header::LOCATION, value);
        }
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    }
    if let Ok(value) = HeaderValue::from_str(&set_cookie_value(locale)) {
        headers.insert(header::SET_COOKIE, value);
    }
    response
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let elapsed_ms = start.elapsed().as_millis();
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages
            .first()
            .cloned()
            .unwrap_or_else(|| "no diagnostic available".to_string());

        if status.is_server_error() {
            error!(
                target = "onepointstar::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                query = uri.query().unwrap_or(""),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "request failed",
            );
        } else {
            warn!(
                target = "onepointstar::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                query = uri.query().unwrap_or(""),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "client request error",
            );
        }
    }

    response
}
