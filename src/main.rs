#![warn(clippy::pedantic)]

mod authz;
mod config;
mod error;
mod extract;
mod forms;
mod model;
mod password;
mod picture;
mod route;
mod session;
mod store;
mod view;


use std::str::FromStr;

use argon2::Argon2;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::Error;

pub type Database = sqlx::Pool<sqlx::Sqlite>;
pub type AppState = State;

/// The shared application state.
///
/// Everything handlers need lands in here once at startup: the pool, the
/// password hasher (cheap to clone, expensive to configure) and the
/// runtime configuration.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub config: Config,
}

#[tokio::main]
async fn main() {
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.with(tracing_subscriber::fmt::layer())
		.init();

	dotenvy::dotenv().ok();

	let config = Config::from_env();

	let options = SqliteConnectOptions::from_str(&config.database_url)
		.expect("DATABASE_URL must be a sqlite url")
		.create_if_missing(true)
		.foreign_keys(true);

	let database = SqlitePoolOptions::new()
		.connect_with(options)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	picture::ensure_default(&config.images_dir()).expect("failed to write default profile picture");

	let port = config.port;
	let app = route::router(State {
		database,
		hasher: Argon2::default(),
		config,
	});

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, app).await.unwrap();
}
