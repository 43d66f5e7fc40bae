use chrono::Utc;

use crate::{
	model::{Page, Post, PostWithAuthor, User},
	Database,
};

/// Page size of the shared feed on the home page.
pub const PER_PAGE_HOME: i64 = 4;
/// Page size of a single author's listing.
pub const PER_PAGE_USER: i64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum PostStoreError {
	#[error("{0} cannot be empty")]
	Empty(&'static str),
	#[error("post not found")]
	NotFound,
	#[error(transparent)]
	Database(#[from] sqlx::Error),
}

pub async fn create(
	database: &Database,
	author: &User,
	title: &str,
	content: &str,
) -> Result<Post, PostStoreError> {
	let (title, content) = require_fields(title, content)?;

	Ok(sqlx::query_as::<_, Post>(
		"INSERT INTO post (title, content, date_posted, user_id)
			VALUES (?, ?, ?, ?) RETURNING *",
	)
	.bind(title)
	.bind(content)
	.bind(Utc::now())
	.bind(author.id)
	.fetch_one(database)
	.await?)
}

pub async fn get(database: &Database, id: i64) -> Result<Post, PostStoreError> {
	sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = ?")
		.bind(id)
		.fetch_optional(database)
		.await?
		.ok_or(PostStoreError::NotFound)
}

pub async fn get_with_author(
	database: &Database,
	id: i64,
) -> Result<PostWithAuthor, PostStoreError> {
	sqlx::query_as::<_, PostWithAuthor>(
		r#"SELECT post.*, "user".username, "user".image_file
			FROM post JOIN "user" ON "user".id = post.user_id
			WHERE post.id = ?"#,
	)
	.bind(id)
	.fetch_optional(database)
	.await?
	.ok_or(PostStoreError::NotFound)
}

/// Replaces the title and content of a post. `date_posted` and the author
/// are left untouched.
pub async fn update(
	database: &Database,
	id: i64,
	title: &str,
	content: &str,
) -> Result<Post, PostStoreError> {
	let (title, content) = require_fields(title, content)?;

	sqlx::query_as::<_, Post>("UPDATE post SET title = ?, content = ? WHERE id = ? RETURNING *")
		.bind(title)
		.bind(content)
		.bind(id)
		.fetch_optional(database)
		.await?
		.ok_or(PostStoreError::NotFound)
}

pub async fn delete(database: &Database, id: i64) -> Result<(), PostStoreError> {
	let result = sqlx::query("DELETE FROM post WHERE id = ?")
		.bind(id)
		.execute(database)
		.await?;

	if result.rows_affected() == 0 {
		return Err(PostStoreError::NotFound);
	}

	Ok(())
}

/// Lists every post, newest first. Ties on `date_posted` fall back to the
/// higher id so the order is stable.
pub async fn list_page(
	database: &Database,
	page: i64,
	per_page: i64,
) -> Result<Page<PostWithAuthor>, sqlx::Error> {
	let page = page.max(1);
	let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post")
		.fetch_one(database)
		.await?;

	let items = sqlx::query_as::<_, PostWithAuthor>(
		r#"SELECT post.*, "user".username, "user".image_file
			FROM post JOIN "user" ON "user".id = post.user_id
			ORDER BY post.date_posted DESC, post.id DESC
			LIMIT ? OFFSET ?"#,
	)
	.bind(per_page)
	.bind(page.saturating_sub(1).saturating_mul(per_page))
	.fetch_all(database)
	.await?;

	Ok(Page {
		items,
		page,
		per_page,
		total,
	})
}

/// Lists a single author's posts, newest first.
pub async fn list_by_author_page(
	database: &Database,
	author: &User,
	page: i64,
	per_page: i64,
) -> Result<Page<PostWithAuthor>, sqlx::Error> {
	let page = page.max(1);
	let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post WHERE user_id = ?")
		.bind(author.id)
		.fetch_one(database)
		.await?;

	let items = sqlx::query_as::<_, PostWithAuthor>(
		r#"SELECT post.*, "user".username, "user".image_file
			FROM post JOIN "user" ON "user".id = post.user_id
			WHERE post.user_id = ?
			ORDER BY post.date_posted DESC, post.id DESC
			LIMIT ? OFFSET ?"#,
	)
	.bind(author.id)
	.bind(per_page)
	.bind(page.saturating_sub(1).saturating_mul(per_page))
	.fetch_all(database)
	.await?;

	Ok(Page {
		items,
		page,
		per_page,
		total,
	})
}

fn require_fields<'a>(
	title: &'a str,
	content: &'a str,
) -> Result<(&'a str, &'a str), PostStoreError> {
	let title = title.trim();
	let content = content.trim();

	if title.is_empty() {
		return Err(PostStoreError::Empty("title"));
	}

	if content.is_empty() {
		return Err(PostStoreError::Empty("content"));
	}

	Ok((title, content))
}
