use axum::{
	extract::{FromRef, FromRequestParts},
	http::{request, uri::PathAndQuery},
	response::{IntoResponse, Redirect, Response},
};

use crate::{model::User, session, store, Database};

/// The user behind the request's session cookie, if any.
///
/// Anonymous requests extract as `Actor(None)`. A missing, malformed or
/// expired cookie never rejects, and neither does a lookup fault; pages
/// that render for everyone keep rendering.
///
/// ```rust,ignore
/// async fn route(Actor(actor): Actor) {
///   // ...
/// }
/// ```
#[derive(Debug)]
pub struct Actor(pub Option<User>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let Some(session_id) = session::session_id_from_headers(&parts.headers) else {
			return Ok(Self(None));
		};

		let database = Database::from_ref(state);

		match store::sessions::resolve_user(&database, session_id).await {
			Ok(user) => Ok(Self(user)),
			Err(error) => {
				tracing::error!(%error, "failed to resolve session");

				Ok(Self(None))
			}
		}
	}
}

/// The logged-in user behind the request.
///
/// Rejects anonymous requests with a redirect to the login form that
/// remembers where the user was headed.
///
/// ```rust,ignore
/// async fn route(RequireActor(actor): RequireActor) {
///   // ...
/// }
/// ```
#[derive(Debug)]
pub struct RequireActor(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RequireActorRejection;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let user = match session::session_id_from_headers(&parts.headers) {
			Some(session_id) => {
				let database = Database::from_ref(state);

				store::sessions::resolve_user(&database, session_id).await?
			}
			None => None,
		};

		match user {
			Some(user) => Ok(Self(user)),
			None => Err(RequireActorRejection::Login(LoginRedirect::from_parts(
				parts,
			))),
		}
	}
}

#[derive(Debug)]
pub enum RequireActorRejection {
	Login(LoginRedirect),
	Database(sqlx::Error),
}

impl From<sqlx::Error> for RequireActorRejection {
	fn from(error: sqlx::Error) -> Self {
		Self::Database(error)
	}
}

impl IntoResponse for RequireActorRejection {
	fn into_response(self) -> Response {
		match self {
			Self::Login(redirect) => redirect.into_response(),
			Self::Database(error) => crate::Error::from(error).into_response(),
		}
	}
}

/// A `303 See Other` to `/login?next=…` carrying the path the anonymous
/// request asked for, so login can send the user back there.
#[derive(Debug)]
pub struct LoginRedirect {
	next: String,
}

impl LoginRedirect {
	fn from_parts(parts: &request::Parts) -> Self {
		let next = parts
			.uri
			.path_and_query()
			.map_or("/home", PathAndQuery::as_str)
			.to_string();

		Self { next }
	}
}

impl IntoResponse for LoginRedirect {
	fn into_response(self) -> Response {
		Redirect::to(&format!("/login?next={}", urlencoding::encode(&self.next))).into_response()
	}
}
