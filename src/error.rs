use axum::{
	body::Body,
	extract::multipart::MultipartError,
	http::{Response, StatusCode},
	response::{Html, IntoResponse},
};

use crate::{store::posts::PostStoreError, view};

/// Request-fatal error for the application.
///
/// The Display output is logged, not sent to the client, so it can show
/// sensitive information. Form-level problems (bad input, duplicate
/// username, a rejected login) are not in here; handlers render those
/// inline on the page they belong to.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("not found")]
	NotFound,
	#[error("forbidden")]
	Forbidden,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("password hash error: {0}")]
	Hash(argon2::password_hash::Error),
	#[error("image error: {0}")]
	Image(#[from] image::ImageError),
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("multipart error: {0}")]
	Multipart(#[from] MultipartError),
}

impl From<PostStoreError> for Error {
	fn from(error: PostStoreError) -> Self {
		match error {
			PostStoreError::NotFound => Self::NotFound,
			PostStoreError::Database(error) => Self::Database(error),
			// Handlers surface Empty as a field error before converting,
			// so this arm is only a fallback.
			PostStoreError::Empty(_) => Self::NotFound,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::NotFound => {
				(StatusCode::NOT_FOUND, Html(view::not_found())).into_response()
			}
			Error::Forbidden => {
				(StatusCode::FORBIDDEN, Html(view::forbidden())).into_response()
			}
			Error::Multipart(error) => {
				tracing::debug!("unreadable form submission: {error}");
				(StatusCode::BAD_REQUEST, Html(view::bad_request())).into_response()
			}
			error => {
				tracing::error!("internal error: {error}");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Html(view::internal_error()),
				)
					.into_response()
			}
		}
	}
}
