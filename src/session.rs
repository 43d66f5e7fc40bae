use axum::http::{header, HeaderMap};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// Server-side lifetime of a plain login.
pub const PLAIN_TTL_DAYS: i64 = 1;
/// Server-side and cookie lifetime of a "remember me" login.
pub const REMEMBER_TTL_DAYS: i64 = 30;

pub fn ttl(remember: bool) -> chrono::Duration {
	if remember {
		chrono::Duration::days(REMEMBER_TTL_DAYS)
	} else {
		chrono::Duration::days(PLAIN_TTL_DAYS)
	}
}

/// Creates the session cookie. A plain login gets a browser-session cookie;
/// a remembered login gets one that outlives the browser.
pub fn create_cookie(session_id: Uuid, remember: bool) -> cookie::Cookie<'static> {
	let builder = cookie::Cookie::build((COOKIE_NAME, session_id.to_string()))
		.http_only(true)
		.same_site(cookie::SameSite::Lax)
		.path("/");

	let builder = if remember {
		builder.max_age(cookie::time::Duration::days(REMEMBER_TTL_DAYS))
	} else {
		builder
	};

	builder.into()
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

/// Pulls the session id out of the request's cookie headers, if any cookie
/// by the right name holds something uuid-shaped.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == COOKIE_NAME)
		.and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}
