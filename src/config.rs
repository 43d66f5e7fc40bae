use std::path::PathBuf;

/// Runtime configuration, read once at startup from the environment
/// (a `.env` file is honoured) and passed around inside the shared state.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub port: u16,
	/// Root of the public asset directory; uploads go to `images/` below it.
	pub static_dir: PathBuf,
}

impl Config {
	pub fn from_env() -> Self {
		Self {
			database_url: std::env::var("DATABASE_URL")
				.unwrap_or_else(|_| "sqlite://blog.db".into()),
			port: std::env::var("PORT").map_or_else(
				|_| 3000,
				|port| port.parse().expect("PORT must be a number"),
			),
			static_dir: std::env::var("STATIC_DIR")
				.map_or_else(|_| PathBuf::from("static"), PathBuf::from),
		}
	}

	/// Directory that profile pictures are written to and served from.
	pub fn images_dir(&self) -> PathBuf {
		self.static_dir.join("images")
	}
}
