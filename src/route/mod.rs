mod account;
mod auth;
mod feed;
mod post;

use axum::{
	http::StatusCode,
	response::{Html, IntoResponse, Response},
	Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
	let static_dir = state.config.static_dir.clone();

	Router::new()
		.merge(feed::routes())
		.merge(auth::routes())
		.merge(account::routes())
		.merge(post::routes())
		.nest_service("/static", ServeDir::new(static_dir))
		.fallback(not_found)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Re-renders a form with its validation messages. 422 marks the
/// submission as rejected while keeping the browser on the page.
fn invalid(html: String) -> Response {
	(StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
}

async fn not_found() -> crate::Error {
	crate::Error::NotFound
}
