use crate::{model::User, Database};

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
	#[error("that username is taken, please choose a different one")]
	DuplicateUsername,
	#[error("that email is taken, please choose a different one")]
	DuplicateEmail,
	#[error(transparent)]
	Database(#[from] sqlx::Error),
}

/// Creates a new account. The username and email checks are re-run by the
/// unique indexes on insert, so a racing registration still maps to the
/// right duplicate error instead of a 500.
pub async fn register(
	database: &Database,
	username: &str,
	email: &str,
	password_hash: &str,
) -> Result<User, UserStoreError> {
	if username_taken(database, username, None).await? {
		return Err(UserStoreError::DuplicateUsername);
	}

	if email_taken(database, email, None).await? {
		return Err(UserStoreError::DuplicateEmail);
	}

	sqlx::query_as::<_, User>(
		r#"INSERT INTO "user" (username, email, password_hash)
			VALUES (?, ?, ?) RETURNING *"#,
	)
	.bind(username)
	.bind(email)
	.bind(password_hash)
	.fetch_one(database)
	.await
	.map_err(map_unique_violation)
}

/// Updates the profile fields of an existing account. A `None` picture
/// leaves the current one in place. Availability checks exclude the
/// account's own row, so saving the form unchanged is always allowed.
pub async fn update_profile(
	database: &Database,
	id: i64,
	username: &str,
	email: &str,
	image_file: Option<&str>,
) -> Result<User, UserStoreError> {
	if username_taken(database, username, Some(id)).await? {
		return Err(UserStoreError::DuplicateUsername);
	}

	if email_taken(database, email, Some(id)).await? {
		return Err(UserStoreError::DuplicateEmail);
	}

	sqlx::query_as::<_, User>(
		r#"UPDATE "user"
			SET username = ?, email = ?, image_file = COALESCE(?, image_file)
			WHERE id = ? RETURNING *"#,
	)
	.bind(username)
	.bind(email)
	.bind(image_file)
	.bind(id)
	.fetch_one(database)
	.await
	.map_err(map_unique_violation)
}

pub async fn find_by_id(database: &Database, id: i64) -> Result<Option<User>, sqlx::Error> {
	sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = ?"#)
		.bind(id)
		.fetch_optional(database)
		.await
}

pub async fn find_by_email(database: &Database, email: &str) -> Result<Option<User>, sqlx::Error> {
	sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = ?"#)
		.bind(email)
		.fetch_optional(database)
		.await
}

pub async fn find_by_username(
	database: &Database,
	username: &str,
) -> Result<Option<User>, sqlx::Error> {
	sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE username = ?"#)
		.bind(username)
		.fetch_optional(database)
		.await
}

async fn username_taken(
	database: &Database,
	username: &str,
	exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
	let count: i64 = sqlx::query_scalar(
		r#"SELECT COUNT(*) FROM "user" WHERE username = ? AND id != COALESCE(?, -1)"#,
	)
	.bind(username)
	.bind(exclude)
	.fetch_one(database)
	.await?;

	Ok(count > 0)
}

async fn email_taken(
	database: &Database,
	email: &str,
	exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
	let count: i64 = sqlx::query_scalar(
		r#"SELECT COUNT(*) FROM "user" WHERE email = ? AND id != COALESCE(?, -1)"#,
	)
	.bind(email)
	.bind(exclude)
	.fetch_one(database)
	.await?;

	Ok(count > 0)
}

fn map_unique_violation(error: sqlx::Error) -> UserStoreError {
	if let Some(db) = error.as_database_error() {
		if db.is_unique_violation() {
			if db.message().contains("user.username") {
				return UserStoreError::DuplicateUsername;
			}

			if db.message().contains("user.email") {
				return UserStoreError::DuplicateEmail;
			}
		}
	}

	UserStoreError::Database(error)
}

#[cfg(test)]
mod test {
	use super::{find_by_email, find_by_id, find_by_username, register, update_profile, UserStoreError};
	use crate::Database;

	#[sqlx::test]
	async fn test_register_and_find(database: Database) {
		let user = register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		assert_eq!(user.username, "alice");
		assert_eq!(user.email, "alice@example.com");
		assert_eq!(user.image_file, "default.jpg");

		let by_id = find_by_id(&database, user.id).await.unwrap().unwrap();
		let by_email = find_by_email(&database, "alice@example.com")
			.await
			.unwrap()
			.unwrap();
		let by_username = find_by_username(&database, "alice").await.unwrap().unwrap();

		assert_eq!(by_id.id, user.id);
		assert_eq!(by_email.id, user.id);
		assert_eq!(by_username.id, user.id);
	}

	#[sqlx::test]
	async fn test_find_missing_user(database: Database) {
		assert!(find_by_id(&database, 42).await.unwrap().is_none());
		assert!(find_by_username(&database, "nobody").await.unwrap().is_none());
	}

	#[sqlx::test]
	async fn test_duplicate_username(database: Database) {
		register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		let error = register(&database, "alice", "other@example.com", "hash")
			.await
			.unwrap_err();

		assert!(matches!(error, UserStoreError::DuplicateUsername));
	}

	#[sqlx::test]
	async fn test_duplicate_email(database: Database) {
		register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		let error = register(&database, "bob", "alice@example.com", "hash")
			.await
			.unwrap_err();

		assert!(matches!(error, UserStoreError::DuplicateEmail));
	}

	#[sqlx::test]
	async fn test_usernames_are_case_sensitive(database: Database) {
		register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		assert!(register(&database, "Alice", "upper@example.com", "hash")
			.await
			.is_ok());
	}

	#[sqlx::test]
	async fn test_update_profile_excludes_own_row(database: Database) {
		let alice = register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		// Saving the form without changing anything must not count the
		// account's own row as a duplicate.
		let saved = update_profile(&database, alice.id, "alice", "alice@example.com", None)
			.await
			.unwrap();

		assert_eq!(saved.username, "alice");
	}

	#[sqlx::test]
	async fn test_update_profile_rejects_taken_fields(database: Database) {
		register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();
		let bob = register(&database, "bob", "bob@example.com", "hash")
			.await
			.unwrap();

		let error = update_profile(&database, bob.id, "alice", "bob@example.com", None)
			.await
			.unwrap_err();
		assert!(matches!(error, UserStoreError::DuplicateUsername));

		let error = update_profile(&database, bob.id, "bob", "alice@example.com", None)
			.await
			.unwrap_err();
		assert!(matches!(error, UserStoreError::DuplicateEmail));
	}

	#[sqlx::test]
	async fn test_update_profile_keeps_picture_unless_replaced(database: Database) {
		let alice = register(&database, "alice", "alice@example.com", "hash")
			.await
			.unwrap();

		let saved = update_profile(
			&database,
			alice.id,
			"alice",
			"alice@example.com",
			Some("abc123.png"),
		)
		.await
		.unwrap();
		assert_eq!(saved.image_file, "abc123.png");

		let saved = update_profile(&database, alice.id, "alice2", "alice@example.com", None)
			.await
			.unwrap();
		assert_eq!(saved.image_file, "abc123.png");
	}
}
