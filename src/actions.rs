//! Authentication actions behind the login, registration, and profile screens.
//!
//! Login, registration, password reset, and the hello probe are public calls: they never carry a
//! bearer token and never trigger the refresh cycle. Profile reads and updates go through
//! [`SessionClient::request`] and renew the session like any other authenticated call.

// self
use crate::{
	_prelude::*,
	auth::{
		Credentials, PasswordResetRequest, ProfileUpdate, Registration, TokenPair, User,
		payload::{LoginResponse, RefreshRequest},
	},
	client::{SessionClient, decode_json, decode_response, encode_json, status_error},
	http::{ApiHttpClient, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges credentials for a token pair and stores both tokens.
	pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let body = encode_json(credentials);
		let result = span
			.instrument(async move {
				let response = self
					.send_public(Method::POST, &self.config.endpoints.login, Some(body?), None)
					.await?;

				if !response.is_success() {
					return Err(status_error(&response));
				}

				let LoginResponse { access, refresh } = decode_json(&response)?;

				self.store.store_tokens(access.clone(), refresh.clone()).await?;

				Ok(TokenPair::new(access, refresh))
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Creates an account; the backend mails an activation link.
	pub async fn register(&self, registration: &Registration) -> Result<User> {
		const KIND: FlowKind = FlowKind::Register;

		let span = FlowSpan::new(KIND, "register");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let body = encode_json(registration);
		let result = span
			.instrument(async move {
				let response = self
					.send_public(Method::POST, &self.config.endpoints.register, Some(body?), None)
					.await?;

				decode_response(&response)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Ends the session.
	///
	/// The refresh token is posted to the logout endpoint so the backend can invalidate it; that
	/// call is best effort. Stored tokens are removed regardless of its outcome.
	pub async fn logout(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let tokens = self.store.get_tokens().await?;

				if let Some(refresh) = &tokens.refresh_token {
					let invalidated = match encode_json(&RefreshRequest { refresh: refresh.expose() })
					{
						Ok(body) =>
							self.send_public(
								Method::POST,
								&self.config.endpoints.logout,
								Some(body),
								tokens.access_token.clone(),
							)
							.await,
						Err(err) => Err(err),
					};

					match invalidated {
						Ok(response) if !response.is_success() =>
							obs::record_swallowed_error(KIND, "invalidate", &status_error(&response)),
						Err(err) => obs::record_swallowed_error(KIND, "invalidate", &err),
						Ok(_) => (),
					}
				}

				self.store.remove_tokens().await?;

				Ok(())
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Fetches the signed-in user's profile.
	pub async fn me(&self) -> Result<User> {
		self.get(&self.config.endpoints.me).await
	}

	/// Updates the signed-in user's profile and returns the stored result.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
		self.patch(&self.config.endpoints.me, update).await
	}

	/// Asks the backend to mail a password reset link.
	pub async fn request_password_reset(&self, email: impl Into<String>) -> Result<()> {
		const KIND: FlowKind = FlowKind::PasswordReset;

		let span = FlowSpan::new(KIND, "request_password_reset");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let body = encode_json(&PasswordResetRequest { email: email.into() });
		let result = span
			.instrument(async move {
				let response = self
					.send_public(
						Method::POST,
						&self.config.endpoints.password_reset,
						Some(body?),
						None,
					)
					.await?;

				if response.is_success() { Ok(()) } else { Err(status_error(&response)) }
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Calls the public hello endpoint and returns its JSON payload.
	pub async fn hello(&self) -> Result<serde_json::Value> {
		const KIND: FlowKind = FlowKind::Hello;

		let span = FlowSpan::new(KIND, "hello");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response =
					self.send_public(Method::GET, &self.config.endpoints.hello, None, None).await?;

				decode_response(&response)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Returns `true` when the store currently holds an access token.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.store.get_tokens().await?.has_access_token())
	}
}
