use axum::{
	extract::{Multipart, State},
	response::{Html, IntoResponse, Redirect, Response},
	routing::get,
	Router,
};

use crate::{
	extract::RequireActor,
	forms::{self, AccountForm, FieldError},
	picture,
	store::users::{self, UserStoreError},
	view, AppState, Error,
};

pub fn routes() -> Router<AppState> {
	Router::new().route("/account", get(account_page).post(update_account))
}

/// Shows the profile form, pre-filled with the current details.
async fn account_page(RequireActor(user): RequireActor) -> impl IntoResponse {
	let form = AccountForm {
		username: user.username.clone(),
		email: user.email.clone(),
	};

	Html(view::account_page(&user, &form, &[]))
}

/// Applies profile changes. The submission is multipart because of the
/// optional picture; text fields are collected off the same stream.
async fn update_account(
	State(state): State<AppState>,
	RequireActor(user): RequireActor,
	mut multipart: Multipart,
) -> Result<Response, Error> {
	let mut form = AccountForm::default();
	let mut upload: Option<(String, Vec<u8>)> = None;

	while let Some(field) = multipart.next_field().await? {
		let name = field.name().unwrap_or_default().to_string();

		match name.as_str() {
			"username" => form.username = field.text().await?,
			"email" => form.email = field.text().await?,
			"picture" => {
				let filename = field.file_name().unwrap_or_default().to_string();

				// Browsers send an empty part when no file was chosen.
				if filename.is_empty() {
					continue;
				}

				upload = Some((filename, field.bytes().await?.to_vec()));
			}
			_ => {}
		}
	}

	let mut errors = forms::validate(&form);
	let mut image_file = None;

	if errors.is_empty() {
		if let Some((filename, bytes)) = upload {
			match picture::ingest(&bytes, &filename, &state.config.images_dir()) {
				Ok(stored) => image_file = Some(stored),
				Err(error @ picture::IngestError::UnsupportedFormat) => {
					errors.push(FieldError::new("picture", error.to_string()));
				}
				Err(picture::IngestError::Image(error)) => {
					tracing::debug!(%error, "rejected upload");
					errors.push(FieldError::new("picture", "that file is not a valid image"));
				}
				Err(picture::IngestError::Io(error)) => return Err(error.into()),
			}
		}
	}

	if errors.is_empty() {
		match users::update_profile(
			&state.database,
			user.id,
			&form.username,
			&form.email,
			image_file.as_deref(),
		)
		.await
		{
			Ok(_) => {
				tracing::info!(user.id, "profile updated");

				return Ok(Redirect::to("/account").into_response());
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

	Ok(super::invalid(view::account_page(&user, &form, &errors)))
}

#[cfg(test)]
mod test {
	use axum_test::multipart::{MultipartForm, Part};

	use crate::test::*;

	fn profile_form(username: &str, email: &str) -> MultipartForm {
		MultipartForm::new()
			.add_text("username", username)
			.add_text("email", email)
	}

	#[sqlx::test]
	async fn test_account_requires_login(database: Database) {
		let app = app(database);
		let response = app.get("/account").await;

		assert_eq!(response.status_code(), 303);
		assert_eq!(response.header("location"), "/login?next=%2Faccount");
	}

	#[sqlx::test]
	async fn test_account_page_shows_current_details(database: Database) {
		seed_user(&database, "alice").await;

		let app = app(database);

		app.login_as("alice").await;

		let text = app.get("/account").await.text();

		assert!(text.contains(r#"value="alice""#));
		assert!(text.contains(r#"value="alice@example.com""#));
		assert!(text.contains("/static/images/default.jpg"));
	}

	#[sqlx::test]
	async fn test_saving_unchanged_details_succeeds(database: Database) {
		seed_user(&database, "alice").await;

		let app = app(database);

		app.login_as("alice").await;

		let response = app
			.post("/account")
			.multipart(profile_form("alice", "alice@example.com"))
			.await;

		assert_eq!(response.status_code(), 303);
		assert_eq!(response.header("location"), "/account");
	}

	#[sqlx::test]
	async fn test_details_can_change(database: Database) {
		seed_user(&database, "alice").await;

		let app = app(database);

		app.login_as("alice").await;

		let response = app
			.post("/account")
			.multipart(profile_form("alpaca", "alpaca@example.com"))
			.await;

		assert_eq!(response.status_code(), 303);

		let text = app.get("/account").await.text();

		assert!(text.contains(r#"value="alpaca""#));
		assert!(text.contains(r#"value="alpaca@example.com""#));
	}

	#[sqlx::test]
	async fn test_taken_details_are_field_errors(database: Database) {
		seed_user(&database, "alice").await;
		seed_user(&database, "bob").await;

		let app = app(database);

		app.login_as("bob").await;

		let response = app
			.post("/account")
			.multipart(profile_form("alice", "bob@example.com"))
			.await;

		assert_eq!(response.status_code(), 422);
		assert!(response.text().contains("that username is taken"));

		let response = app
			.post("/account")
			.multipart(profile_form("bob", "alice@example.com"))
			.await;

		assert_eq!(response.status_code(), 422);
		assert!(response.text().contains("that email is taken"));
	}

	#[sqlx::test]
	async fn test_upload_replaces_the_picture(database: Database) {
		seed_user(&database, "alice").await;

		let app = app(database);

		app.login_as("alice").await;

		let form = profile_form("alice", "alice@example.com").add_part(
			"picture",
			Part::bytes(png_bytes(300, 200))
				.file_name("me.png")
				.mime_type("image/png"),
		);

		let response = app.post("/account").multipart(form).await;

		assert_eq!(response.status_code(), 303);

		let text = app.get("/account").await.text();

		assert!(!text.contains("default.jpg"));

		let image_file = text
			.split("/static/images/")
			.nth(1)
			.and_then(|rest| rest.split('"').next())
			.unwrap()
			.to_string();

		assert!(image_file.ends_with(".png"));

		// The stored copy is shrunk to the thumbnail bound and served
		// back under /static.
		let response = app.get(&format!("/static/images/{image_file}")).await;

		assert_eq!(response.status_code(), 200);

		let saved = image::load_from_memory(response.as_bytes()).unwrap();

		assert!(saved.width() <= 125);
		assert!(saved.height() <= 125);
	}

	#[sqlx::test]
	async fn test_rejected_uploads_keep_the_old_picture(database: Database) {
		seed_user(&database, "alice").await;

		let app = app(database);

		app.login_as("alice").await;

		let form = profile_form("alice", "alice@example.com").add_part(
			"picture",
			Part::bytes(png_bytes(10, 10))
				.file_name("animation.gif")
				.mime_type("image/gif"),
		);

		let response = app.post("/account").multipart(form).await;

		assert_eq!(response.status_code(), 422);
		assert!(response.text().contains("jpg or png"));

		let form = profile_form("alice", "alice@example.com").add_part(
			"picture",
			Part::bytes(b"scrambled".to_vec())
				.file_name("photo.png")
				.mime_type("image/png"),
		);

		let response = app.post("/account").multipart(form).await;

		assert_eq!(response.status_code(), 422);
		assert!(response.text().contains("not a valid image"));

		assert!(app
			.get("/account")
			.await
			.text()
			.contains("/static/images/default.jpg"));
	}
}
