use axum::{
	extract::{Path, Query, State},
	response::{Html, IntoResponse},
	routing::get,
	Router,
};
use serde::Deserialize;

use crate::{
	extract::Actor,
	store::{posts, users},
	view, AppState, Database, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(home))
		.route("/home", get(home))
		.route("/user/:username", get(user_posts))
}

/// `?page=N`, 1-indexed. Anything that does not parse as a number falls
/// back to the first page, matching how lenient the listing pages are
/// about out-of-range numbers.
#[derive(Debug, Default, Deserialize)]
struct PageQuery {
	page: Option<String>,
}

impl PageQuery {
	fn page(&self) -> i64 {
		self.page
			.as_deref()
			.and_then(|page| page.parse().ok())
			.unwrap_or(1)
	}
}

/// The shared feed, everyone's posts newest first.
async fn home(
	State(database): State<Database>,
	Actor(actor): Actor,
	Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, Error> {
	let page = posts::list_page(&database, query.page(), posts::PER_PAGE_HOME).await?;

	Ok(Html(view::home_page(actor.as_ref(), &page)))
}

/// Everything one author has posted. Unknown authors 404; an author with
/// no posts renders an empty listing.
async fn user_posts(
	State(database): State<Database>,
	Actor(actor): Actor,
	Path(username): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, Error> {
	let author = users::find_by_username(&database, &username)
		.await?
		.ok_or(Error::NotFound)?;

	let page =
		posts::list_by_author_page(&database, &author, query.page(), posts::PER_PAGE_USER).await?;

	Ok(Html(view::user_page(actor.as_ref(), &author, &page)))
}
