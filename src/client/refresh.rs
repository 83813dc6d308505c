//! Access token renewal.
//!
//! A 401 on an authenticated request lands here exactly once. The stored refresh token is
//! exchanged for a new access token, which is persisted before the caller replays its request.
//! A missing refresh token, or a refresh endpoint that answers with anything but a decodable
//! success, ends the session. Transport failures on the refresh call surface as
//! [`Error::RequestFailed`] and leave the stored tokens untouched.
//!
//! Refreshes are independent by default: concurrent 401s each run their own refresh call. With
//! [`ClientConfig::coalesce_refreshes`](crate::config::ClientConfig::coalesce_refreshes) enabled,
//! handlers queue behind a shared guard and reuse a token that a peer stored while they waited.

// self
use crate::{
	_prelude::*,
	auth::{
		TokenSecret,
		payload::{RefreshRequest, RefreshResponse},
	},
	client::{SessionClient, decode_json, encode_json},
	http::{ApiHttpClient, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges the stored refresh token for a new access token and persists it.
	///
	/// Ends the session (tokens cleared, observers notified, [`Error::SessionExpired`]) when no
	/// refresh token is stored or the refresh endpoint rejects it.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let tokens = self.store.get_tokens().await?;
				let Some(refresh) = tokens.refresh_token else {
					obs::record_step(KIND, "missing_refresh_token");

					return Err(self.expire_session().await);
				};
				let body = encode_json(&RefreshRequest { refresh: refresh.expose() })?;

				self.refresh_metrics.record_attempt();

				let response = self
					.send_public(Method::POST, &self.config.endpoints.refresh, Some(body), None)
					.await
					.inspect_err(|_| self.refresh_metrics.record_failure())?;

				if !response.is_success() {
					self.refresh_metrics.record_failure();
					obs::record_step(KIND, "refresh_rejected");

					return Err(self.expire_session().await);
				}

				let access = match decode_json::<RefreshResponse>(&response) {
					Ok(RefreshResponse { access }) => access,
					Err(err) => {
						self.refresh_metrics.record_failure();
						obs::record_swallowed_error(KIND, "decode_refresh_response", &err);

						return Err(self.expire_session().await);
					},
				};

				self.store
					.store_access_token(access.clone())
					.await
					.inspect_err(|_| self.refresh_metrics.record_failure())?;
				self.refresh_metrics.record_success();

				Ok(access)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Produces the access token to replay with after `rejected` drew a 401.
	pub(crate) async fn renew_access_token(
		&self,
		rejected: Option<&TokenSecret>,
	) -> Result<TokenSecret> {
		if !self.config.coalesce_refreshes {
			return self.refresh_access_token().await;
		}

		let _singleflight = self.refresh_guard.lock().await;
		let current = self.store.get_tokens().await?;

		match current.access_token {
			Some(access) if Some(&access) != rejected => {
				obs::record_step(FlowKind::Refresh, "reused_peer_token");

				Ok(access)
			},
			_ => self.refresh_access_token().await,
		}
	}
}
