//! Signs in against a running backend and reads the current profile.
//!
//! 1. Load the backend location from `API_BASE_URL` (defaults to `http://localhost:8000/api`).
//! 2. Persist tokens in a [`FileStore`] so a second run reuses the session.
//! 3. Register a closure observer that prints where the user would be redirected.
//! 4. Log in with `DEMO_USERNAME`/`DEMO_PASSWORD` only when no session is stored yet.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use session_fetch::{
	auth::Credentials,
	client::SessionClient,
	config::ClientConfig,
	error::Error,
	session::LoginRedirect,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_env()?;
	let store: Arc<dyn TokenStore> =
		Arc::new(FileStore::open(env::temp_dir().join("session-fetch-demo.json"))?);
	let client = SessionClient::new(config, store).with_observer(Arc::new(
		|redirect: &LoginRedirect| println!("Session expired; redirect to {}.", redirect.location),
	));

	if !client.is_authenticated().await? {
		let username = env::var("DEMO_USERNAME").map_err(|_| eyre!("Set DEMO_USERNAME."))?;
		let password = env::var("DEMO_PASSWORD").map_err(|_| eyre!("Set DEMO_PASSWORD."))?;

		client.login(&Credentials::new(username, password)).await?;
	}

	match client.me().await {
		Ok(user) => println!("Signed in as {} <{}>.", user.username, user.email),
		Err(Error::SessionExpired) => println!("Sign in again to continue."),
		Err(err) => return Err(err.into()),
	}

	println!("Refresh calls issued: {}.", client.refresh_metrics.attempts());

	Ok(())
}
