use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};

/// Hashes a password with Argon2 and a fresh random salt, returning the
/// PHC string that gets stored in place of the password.
pub fn hash(hasher: &Argon2<'_>, password: &str) -> Result<String, argon2::password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a stored digest. The comparison inside
/// `verify_password` is constant-time; an unparseable digest simply fails
/// the check.
pub fn verify(hasher: &Argon2<'_>, digest: &str, password: &str) -> bool {
	PasswordHash::new(digest)
		.map(|parsed| hasher.verify_password(password.as_bytes(), &parsed).is_ok())
		.unwrap_or(false)
}
