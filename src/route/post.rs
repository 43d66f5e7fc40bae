use axum::{
	extract::{Path, State},
	response::{Html, IntoResponse, Redirect, Response},
	routing::{get, post},
	Form, Router,
};

use crate::{
	authz,
	extract::{Actor, RequireActor},
	forms::{self, FieldError, PostForm},
	store::posts::{self, PostStoreError},
	view, AppState, Database, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/post/new", get(new_post_page).post(create_post))
		.route("/post/:id", get(show_post))
		.route("/post/:id/update", get(edit_post_page).post(update_post))
		.route("/post/:id/delete", post(delete_post))
}

/// Ids come in as text so that `/post/abc` reads as a page that does not
/// exist rather than a malformed request.
fn parse_id(id: &str) -> Result<i64, Error> {
	id.parse().map_err(|_| Error::NotFound)
}

/// Renders the empty editor.
async fn new_post_page(RequireActor(user): RequireActor) -> impl IntoResponse {
	Html(view::post_form_page(
		&user,
		"New Post",
		"/post/new",
		&PostForm::default(),
		&[],
	))
}

/// Creates a post and sends the author back to the feed.
async fn create_post(
	State(database): State<Database>,
	RequireActor(user): RequireActor,
	Form(form): Form<PostForm>,
) -> Result<Response, Error> {
	let mut errors = forms::validate(&form);

	if errors.is_empty() {
		match posts::create(&database, &user, &form.title, &form.content).await {
			Ok(post) => {
				tracing::info!(post.id, user.id, "post created");

				return Ok(Redirect::to("/home").into_response());
			}
			Err(error @ PostStoreError::Empty(field)) => {
				errors.push(FieldError::new(field, error.to_string()));
			}
			Err(error) => return Err(error.into()),
		}
	}

	Ok(super::invalid(view::post_form_page(
		&user,
		"New Post",
		"/post/new",
		&form,
		&errors,
	)))
}

/// The public page for a single post.
async fn show_post(
	State(database): State<Database>,
	Actor(actor): Actor,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
	let post = posts::get_with_author(&database, parse_id(&id)?).await?;

	Ok(Html(view::post_page(actor.as_ref(), &post)))
}

/// Renders the editor pre-filled with the existing post.
async fn edit_post_page(
	State(database): State<Database>,
	RequireActor(user): RequireActor,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
	let post = posts::get(&database, parse_id(&id)?).await?;

	authz::ensure_can_mutate(&user, &post)?;

	let form = PostForm {
		title: post.title,
		content: post.content,
	};

	Ok(Html(view::post_form_page(
		&user,
		"Update Post",
		&format!("/post/{}/update", post.id),
		&form,
		&[],
	)))
}

/// Overwrites the title and content. The post keeps its original date and
/// position in the feed.
async fn update_post(
	State(database): State<Database>,
	RequireActor(user): RequireActor,
	Path(id): Path<String>,
	Form(form): Form<PostForm>,
) -> Result<Response, Error> {
	let id = parse_id(&id)?;
	let post = posts::get(&database, id).await?;

	authz::ensure_can_mutate(&user, &post)?;

	let mut errors = forms::validate(&form);

	if errors.is_empty() {
		match posts::update(&database, id, &form.title, &form.content).await {
			Ok(post) => {
				tracing::info!(post.id, user.id, "post updated");

				return Ok(Redirect::to(&format!("/post/{}", post.id)).into_response());
			}
			Err(error @ PostStoreError::Empty(field)) => {
				errors.push(FieldError::new(field, error.to_string()));
			}
			Err(error) => return Err(error.into()),
		}
	}

	Ok(super::invalid(view::post_form_page(
		&user,
		"Update Post",
		&format!("/post/{id}/update"),
		&form,
		&errors,
	)))
}

/// Permanently removes a post.
async fn delete_post(
	State(database): State<Database>,
	RequireActor(user): RequireActor,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
	let id = parse_id(&id)?;
	let post = posts::get(&database, id).await?;

	authz::ensure_can_mutate(&user, &post)?;
	posts::delete(&database, id).await?;

	tracing::info!(post.id, user.id, "post deleted");

	Ok(Redirect::to("/home"))
}
