use serde::Deserialize;
use validator::Validate;

/// One message attached to one form field, rendered inline next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: String,
	pub message: String,
}

impl FieldError {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Flattens the derived checks into one list the form templates can
/// render field by field.
pub fn validate<T: Validate>(form: &T) -> Vec<FieldError> {
	let Err(errors) = form.validate() else {
		return Vec::new();
	};

	errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			errors.iter().map(move |error| {
				let message = match &error.message {
					Some(message) => message.to_string(),
					None => error.code.to_string(),
				};

				FieldError::new(field, message)
			})
		})
		.collect()
}

/// Runs the derived checks plus the one cross-field rule the derive does
/// not cover, matching passwords.
pub fn validate_register(form: &RegisterForm) -> Vec<FieldError> {
	let mut errors = validate(form);

	if form.password != form.confirm_password {
		errors.push(FieldError::new("confirm_password", "passwords must match"));
	}

	errors
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
	#[validate(length(
		min = 2,
		max = 20,
		message = "username must be between 2 and 20 characters"
	))]
	pub username: String,
	#[validate(email(message = "please enter a valid email address"))]
	pub email: String,
	#[validate(length(min = 8, message = "password must be at least 8 characters"))]
	pub password: String,
	pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
	#[validate(email(message = "please enter a valid email address"))]
	pub email: String,
	#[validate(length(min = 1, message = "password is required"))]
	pub password: String,
	/// Browsers submit checkboxes as a value when ticked and omit the
	/// field entirely otherwise.
	pub remember: Option<String>,
}

impl LoginForm {
	pub fn remember(&self) -> bool {
		self.remember.is_some()
	}
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AccountForm {
	#[validate(length(
		min = 2,
		max = 20,
		message = "username must be between 2 and 20 characters"
	))]
	pub username: String,
	#[validate(email(message = "please enter a valid email address"))]
	pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostForm {
	#[validate(length(
		min = 1,
		max = 100,
		message = "title must be between 1 and 100 characters"
	))]
	pub title: String,
	#[validate(length(min = 1, message = "content is required"))]
	pub content: String,
}
