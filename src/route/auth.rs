use axum::{
	extract::{Query, State},
	http::{header, HeaderMap, StatusCode},
	response::{Html, IntoResponse, Redirect, Response},
	routing::get,
	Form, Router,
};
use serde::Deserialize;

use crate::{
	extract::Actor,
	forms::{self, FieldError, LoginForm, RegisterForm},
	password, session,
	store::{
		sessions,
		users::{self, UserStoreError},
	},
	view, AppState, Database, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/register", get(register_page).post(register))
		.route("/login", get(login_page).post(login))
		.route("/logout", get(logout))
}

#[derive(Debug, Deserialize)]
struct NextQuery {
	next: Option<String>,
}

/// Accepts the `next` target only when it is a local absolute path that
/// can sit in a Location header. Offsite urls, protocol-relative `//`
/// forms, backslashes (browsers fold `\` into `/`) and control
/// characters all fall back to the feed.
fn safe_next(next: Option<&str>) -> &str {
	let Some(next) = next else {
		return "/home";
	};

	let local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
	let printable = !next.bytes().any(|byte| byte.is_ascii_control());

	if local && printable {
		next
	} else {
		"/home"
	}
}

/// Renders the signup form. Logged-in users are sent home instead.
async fn register_page(Actor(actor): Actor) -> Response {
	if actor.is_some() {
		return Redirect::to("/home").into_response();
	}

	Html(view::register_page(&RegisterForm::default(), &[])).into_response()
}

/// Creates the account and sends the new user to the feed. Logging in is
/// a separate, explicit step.
async fn register(
	State(state): State<AppState>,
	Actor(actor): Actor,
	Form(form): Form<RegisterForm>,
) -> Result<Response, Error> {
	if actor.is_some() {
		return Ok(Redirect::to("/home").into_response());
	}

	let mut errors = forms::validate_register(&form);

	if errors.is_empty() {
		let digest = password::hash(&state.hasher, &form.password).map_err(Error::Hash)?;

		match users::register(&state.database, &form.username, &form.email, &digest).await {
			Ok(user) => {
				tracing::info!(user.id, "account created");

				return Ok(Redirect::to("/home").into_response());
			}
			Err(error @ UserStoreError::DuplicateUsername) => {
				errors.push(FieldError::new("username", error.to_string()));
			}
			Err(error @ UserStoreError::DuplicateEmail) => {
				errors.push(FieldError::new("email", error.to_string()));
			}
			Err(UserStoreError::Database(error)) => return Err(error.into()),
		}
	}

	Ok(super::invalid(view::register_page(&form, &errors)))
}

/// Renders the login form. Logged-in users are sent home instead.
async fn login_page(Actor(actor): Actor, Query(query): Query<NextQuery>) -> Response {
	if actor.is_some() {
		return Redirect::to("/home").into_response();
	}

	Html(view::login_page(
		&LoginForm::default(),
		&[],
		false,
		query.next.as_deref(),
	))
	.into_response()
}

/// Verifies the credentials and opens a session. The failure response
/// never says which half of the pair was wrong.
async fn login(
	State(state): State<AppState>,
	Actor(actor): Actor,
	Query(query): Query<NextQuery>,
	Form(form): Form<LoginForm>,
) -> Result<Response, Error> {
	if actor.is_some() {
		return Ok(Redirect::to("/home").into_response());
	}

	let errors = forms::validate(&form);

	if !errors.is_empty() {
		return Ok(super::invalid(view::login_page(
			&form,
			&errors,
			false,
			query.next.as_deref(),
		)));
	}

	let user = users::find_by_email(&state.database, &form.email).await?;
	let verified = user
		.as_ref()
		.is_some_and(|user| password::verify(&state.hasher, &user.password_hash, &form.password));

	let Some(user) = user.filter(|_| verified) else {
		return Ok((
			StatusCode::UNAUTHORIZED,
			Html(view::login_page(&form, &[], true, query.next.as_deref())),
		)
			.into_response());
	};

	let session = sessions::create(&state.database, user.id, form.remember()).await?;
	let cookie = session::create_cookie(session.id, form.remember());

	tracing::info!(user.id, "logged in");

	Ok((
		[(header::SET_COOKIE, cookie.to_string())],
		Redirect::to(safe_next(query.next.as_deref())),
	)
		.into_response())
}

/// Ends the session behind the cookie, if any. Safe to hit logged out.
async fn logout(
	State(database): State<Database>,
	headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
	if let Some(session_id) = session::session_id_from_headers(&headers) {
		sessions::delete(&database, session_id).await?;
	}

	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		Redirect::to("/home"),
	))
}
