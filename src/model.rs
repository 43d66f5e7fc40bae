use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user.
///
/// `password_hash` holds a PHC-format Argon2 digest, never a plaintext
/// password. `image_file` names a file under `static/images/` and defaults
/// to the shared placeholder picture.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub password_hash: String,
	pub image_file: String,
}

/// A single post, permanently owned by the user that created it.
///
/// `date_posted` is set once at creation and never changes; neither does
/// `user_id`, since authorship cannot be transferred.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub content: String,
	#[allow(dead_code)]
	pub date_posted: DateTime<Utc>,
	pub user_id: i64,
}

/// A post joined with the fields of its author that listings display.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
	pub id: i64,
	pub title: String,
	pub content: String,
	pub date_posted: DateTime<Utc>,
	pub user_id: i64,
	pub username: String,
	pub image_file: String,
}

/// A login session row.
///
/// The id doubles as the cookie value; `expires_at` is checked on every
/// resolve so a stale cookie degrades to an anonymous request.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
	pub id: Uuid,
	pub user_id: i64,
	pub expires_at: DateTime<Utc>,
	#[allow(dead_code)]
	pub remember: bool,
}

/// One page of an ordered listing, with enough metadata to build
/// previous/next navigation.
#[derive(Debug)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// 1-indexed page number.
	pub page: i64,
	pub per_page: i64,
	/// Total number of items across all pages.
	pub total: i64,
}

impl<T> Page<T> {
	pub fn has_prev(&self) -> bool {
		self.page > 1
	}

	pub fn has_next(&self) -> bool {
		self.page.saturating_mul(self.per_page) < self.total
	}

	pub fn total_pages(&self) -> i64 {
		if self.total == 0 {
			0
		} else {
			(self.total + self.per_page - 1) / self.per_page
		}
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
