//! Server-rendered pages. Every value that originates from a user passes
//! through [`escape`] before it is spliced into markup.

use crate::{
	forms::{AccountForm, FieldError, LoginForm, PostForm, RegisterForm},
	model::{Page, PostWithAuthor, User},
};

const SITE_NAME: &str = "Miniblog";

pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}

pub fn layout(title: &str, actor: Option<&User>, body: &str) -> String {
	let title = if title.is_empty() {
		SITE_NAME.to_string()
	} else {
		format!("{SITE_NAME} - {}", escape(title))
	};

	let nav = match actor {
		Some(user) => format!(
			r#"<a href="/home">Home</a> <a href="/post/new">New Post</a> <a href="/account">{}</a> <a href="/logout">Logout</a>"#,
			escape(&user.username)
		),
		None => r#"<a href="/home">Home</a> <a href="/login">Login</a> <a href="/register">Register</a>"#
			.to_string(),
	};

	format!(
		r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<header><nav>{nav}</nav></header>
<main>
{body}
</main>
</body>
</html>"#
	)
}

pub fn home_page(actor: Option<&User>, page: &Page<PostWithAuthor>) -> String {
	let body = format!("{}{}", listing(page), page_links("/home", page));

	layout("", actor, &body)
}

pub fn user_page(actor: Option<&User>, author: &User, page: &Page<PostWithAuthor>) -> String {
	let base = format!("/user/{}", urlencoding::encode(&author.username));
	let body = format!(
		"<h1>Posts by {} ({})</h1>\n{posts}{links}",
		escape(&author.username),
		page.total,
		posts = listing(page),
		links = page_links(&base, page),
	);

	layout(&author.username, actor, &body)
}

/// The public single-post page. Edit and delete controls appear only when
/// the viewer owns the post.
pub fn post_page(actor: Option<&User>, post: &PostWithAuthor) -> String {
	let controls = if actor.is_some_and(|user| user.id == post.user_id) {
		format!(
			r#"<div class="controls">
<a href="/post/{id}/update">Update</a>
<form method="post" action="/post/{id}/delete"><button type="submit">Delete</button></form>
</div>
"#,
			id = post.id
		)
	} else {
		String::new()
	};

	layout(&post.title, actor, &format!("{}{controls}", post_summary(post)))
}

pub fn post_form_page(
	actor: &User,
	heading: &str,
	action: &str,
	form: &PostForm,
	errors: &[FieldError],
) -> String {
	let body = format!(
		r#"<h1>{heading}</h1>
<form method="post" action="{action}">
{title}{content}
<p><button type="submit">Post</button></p>
</form>"#,
		title = field("Title", "title", "text", &form.title, errors),
		content = textarea("Content", "content", &form.content, errors),
	);

	layout(heading, Some(actor), &body)
}

pub fn register_page(form: &RegisterForm, errors: &[FieldError]) -> String {
	let body = format!(
		r#"<h1>Join Today</h1>
<form method="post" action="/register">
{username}{email}{password}{confirm}
<p><button type="submit">Sign Up</button></p>
</form>
<p>Already have an account? <a href="/login">Sign In</a></p>"#,
		username = field("Username", "username", "text", &form.username, errors),
		email = field("Email", "email", "email", &form.email, errors),
		password = field("Password", "password", "password", "", errors),
		confirm = field("Confirm Password", "confirm_password", "password", "", errors),
	);

	layout("Register", None, &body)
}

/// `rejected` adds the one generic banner shown for bad credentials; it
/// deliberately does not say whether the email or the password was wrong.
pub fn login_page(
	form: &LoginForm,
	errors: &[FieldError],
	rejected: bool,
	next: Option<&str>,
) -> String {
	let action = match next {
		Some(next) => format!("/login?next={}", urlencoding::encode(next)),
		None => "/login".to_string(),
	};

	let banner = if rejected {
		"<p class=\"error\">Login unsuccessful. Please check email and password.</p>\n"
	} else {
		""
	};

	let body = format!(
		r#"<h1>Log In</h1>
{banner}<form method="post" action="{action}">
{email}{password}
<p><label><input type="checkbox" name="remember"{checked}> Remember me</label></p>
<p><button type="submit">Login</button></p>
</form>
<p>Need an account? <a href="/register">Sign Up Now</a></p>"#,
		email = field("Email", "email", "email", &form.email, errors),
		password = field("Password", "password", "password", "", errors),
		checked = if form.remember() { " checked" } else { "" },
	);

	layout("Login", None, &body)
}

pub fn account_page(user: &User, form: &AccountForm, errors: &[FieldError]) -> String {
	let body = format!(
		r#"<h1>Account</h1>
<img class="profile" src="/static/images/{image}" alt="{alt}">
<form method="post" action="/account" enctype="multipart/form-data">
{username}{email}
<p><label for="picture">Update Profile Picture</label>
<input type="file" id="picture" name="picture" accept=".jpg,.jpeg,.png">
{picture_errors}</p>
<p><button type="submit">Update</button></p>
</form>"#,
		image = escape(&user.image_file),
		alt = escape(&user.username),
		username = field("Username", "username", "text", &form.username, errors),
		email = field("Email", "email", "email", &form.email, errors),
		picture_errors = messages_for("picture", errors),
	);

	layout("Account", Some(user), &body)
}

pub fn not_found() -> String {
	layout(
		"Error",
		None,
		r#"<h1>Page not found (404)</h1>
<p>That page does not exist. Try the <a href="/home">home page</a>.</p>"#,
	)
}

pub fn forbidden() -> String {
	layout(
		"Error",
		None,
		"<h1>You don't have permission to do that (403)</h1>",
	)
}

pub fn bad_request() -> String {
	layout("Error", None, "<h1>Bad request (400)</h1>")
}

pub fn internal_error() -> String {
	layout(
		"Error",
		None,
		"<h1>Something went wrong (500)</h1>\n<p>We're already on it.</p>",
	)
}

fn post_summary(post: &PostWithAuthor) -> String {
	format!(
		r#"<article class="post">
<img src="/static/images/{image}" alt="">
<div>
<a href="/user/{author_href}">{author}</a>
<small>{date}</small>
<h2><a href="/post/{id}">{title}</a></h2>
<p>{content}</p>
</div>
</article>
"#,
		image = escape(&post.image_file),
		author_href = urlencoding::encode(&post.username),
		author = escape(&post.username),
		date = post.date_posted.format("%B %d, %Y"),
		id = post.id,
		title = escape(&post.title),
		content = escape(&post.content),
	)
}

fn listing(page: &Page<PostWithAuthor>) -> String {
	if page.is_empty() {
		return "<p>No posts to show.</p>\n".to_string();
	}

	page.items.iter().map(post_summary).collect()
}

fn page_links(base: &str, page: &Page<PostWithAuthor>) -> String {
	let total_pages = page.total_pages();

	if total_pages <= 1 {
		return String::new();
	}

	let mut links = String::new();

	if page.has_prev() {
		links.push_str(&format!(
			r#"<a href="{base}?page={}">Previous</a> "#,
			page.page - 1
		));
	}

	links.push_str(&format!("Page {} of {total_pages}", page.page));

	if page.has_next() {
		links.push_str(&format!(r#" <a href="{base}?page={}">Next</a>"#, page.page + 1));
	}

	format!(r#"<nav class="pages">{links}</nav>"#)
}

fn field(label: &str, name: &str, kind: &str, value: &str, errors: &[FieldError]) -> String {
	format!(
		r#"<p><label for="{name}">{label}</label>
<input type="{kind}" id="{name}" name="{name}" value="{value}">
{messages}</p>
"#,
		value = escape(value),
		messages = messages_for(name, errors),
	)
}

fn textarea(label: &str, name: &str, value: &str, errors: &[FieldError]) -> String {
	format!(
		r#"<p><label for="{name}">{label}</label>
<textarea id="{name}" name="{name}">{value}</textarea>
{messages}</p>
"#,
		value = escape(value),
		messages = messages_for(name, errors),
	)
}

fn messages_for(name: &str, errors: &[FieldError]) -> String {
	errors
		.iter()
		.filter(|error| error.field == name)
		.map(|error| format!(r#"<span class="error">{}</span>"#, escape(&error.message)))
		.collect()
}
