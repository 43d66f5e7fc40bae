use chrono::Utc;
use uuid::Uuid;

use crate::{
	model::{SessionRecord, User},
	session,
	store::users,
	Database,
};

/// Opens a session for `user_id` and returns its record. The id is the
/// value handed to the browser in the session cookie.
pub async fn create(
	database: &Database,
	user_id: i64,
	remember: bool,
) -> Result<SessionRecord, sqlx::Error> {
	sqlx::query_as::<_, SessionRecord>(
		"INSERT INTO session (id, user_id, expires_at, remember)
			VALUES (?, ?, ?, ?) RETURNING *",
	)
	.bind(Uuid::new_v4())
	.bind(user_id)
	.bind(Utc::now() + session::ttl(remember))
	.bind(remember)
	.fetch_one(database)
	.await
}

/// Resolves a session id from a cookie to its user. Expired rows are
/// deleted on sight and resolve to `None`, the same as an id that never
/// existed.
pub async fn resolve_user(
	database: &Database,
	session_id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
	let Some(record) = sqlx::query_as::<_, SessionRecord>("SELECT * FROM session WHERE id = ?")
		.bind(session_id)
		.fetch_optional(database)
		.await?
	else {
		return Ok(None);
	};

	if record.expires_at <= Utc::now() {
		delete(database, session_id).await?;

		return Ok(None);
	}

	users::find_by_id(database, record.user_id).await
}

/// Ends a session. Unknown ids are not an error, so logout stays
/// idempotent.
pub async fn delete(database: &Database, session_id: Uuid) -> Result<(), sqlx::Error> {
	sqlx::query("DELETE FROM session WHERE id = ?")
		.bind(session_id)
		.execute(database)
		.await?;

	Ok(())
}
