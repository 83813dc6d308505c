//! Authenticated request client.
//!
//! [`SessionClient::request`] attaches the stored access token as a bearer credential. When the
//! backend answers 401 the client runs a single refresh cycle (see [`refresh`]) and replays the
//! original request once with the renewed token. A request is never sent more than twice, and a
//! session that cannot be renewed ends with the token store cleared, every
//! [`SessionObserver`] notified, and [`Error::SessionExpired`] returned.

pub mod refresh;

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	error::{ConfigError, RequestError, error_message},
	http::{ApiHttpClient, ApiRequest, ApiResponse, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::{LoginRedirect, SessionObserver},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSessionClient = SessionClient<ReqwestHttpClient>;

/// HTTP client wrapper that injects bearer tokens and renews them once on expiry.
///
/// Cloning is cheap; clones share the transport, token store, observers, refresh counters, and
/// refresh guard.
pub struct SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Token store holding the session's credentials.
	pub store: Arc<dyn TokenStore>,
	/// Validated client configuration.
	pub config: Arc<ClientConfig>,
	/// Counters for refresh calls and replays.
	pub refresh_metrics: Arc<RefreshMetrics>,
	observers: Vec<Arc<dyn SessionObserver>>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn TokenStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config: Arc::new(config),
			refresh_metrics: Default::default(),
			observers: Vec::new(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Registers an observer notified whenever the session expires.
	pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
		self.observers.push(observer);

		self
	}

	/// Sends an authenticated request and decodes the JSON response body as `T`.
	///
	/// `path` is resolved against the configured base URL; `body` is sent as JSON. A 401 answer
	/// triggers one refresh of the access token followed by one replay of the request.
	pub async fn request<T, B>(&self, path: &str, method: Method, body: Option<&B>) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "request");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let prepared = self.config.endpoint(path).map_err(Error::from).and_then(|url| {
			let payload = body.map(encode_json).transpose()?;

			Ok((url, payload))
		});
		let result = span
			.instrument(async move {
				let (url, payload) = prepared?;
				let response = self.execute_authenticated(method, url, payload).await?;

				decode_response(&response)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Authenticated `GET`.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request::<T, ()>(path, Method::GET, None).await
	}

	/// Authenticated `POST` with a JSON body.
	pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(path, Method::POST, Some(body)).await
	}

	/// Authenticated `PUT` with a JSON body.
	pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(path, Method::PUT, Some(body)).await
	}

	/// Authenticated `PATCH` with a JSON body.
	pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(path, Method::PATCH, Some(body)).await
	}

	/// Authenticated `DELETE`.
	pub async fn delete<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request::<T, ()>(path, Method::DELETE, None).await
	}

	/// Runs the request, refreshing and replaying once on 401. Returns the final response, which
	/// is never a 401.
	async fn execute_authenticated(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		let tokens = self.store.get_tokens().await?;
		let first = ApiRequest::new(method.clone(), url.clone())
			.with_bearer(tokens.access_token.clone())
			.with_body(body.clone());
		let response = self.send(first).await?;

		if !response.is_unauthorized() {
			return Ok(response);
		}

		obs::record_step(FlowKind::Request, "unauthorized");

		let access = self.renew_access_token(tokens.access_token.as_ref()).await?;

		self.refresh_metrics.record_replay();

		let replay = ApiRequest::new(method, url).with_bearer(Some(access)).with_body(body);
		let response = self.send(replay).await?;

		if response.is_unauthorized() {
			obs::record_step(FlowKind::Request, "replay_unauthorized");

			return Err(self.expire_session().await);
		}

		Ok(response)
	}

	/// Sends a request without touching the token store.
	pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.http_client.execute(request).await.map_err(|e| RequestError::network(e).into())
	}

	/// Sends an unauthenticated request to a configured path.
	pub(crate) async fn send_public(
		&self,
		method: Method,
		path: &str,
		body: Option<Vec<u8>>,
		bearer: Option<TokenSecret>,
	) -> Result<ApiResponse> {
		let url = self.config.endpoint(path)?;

		self.send(ApiRequest::new(method, url).with_bearer(bearer).with_body(body)).await
	}

	/// Clears stored tokens, notifies observers, and yields [`Error::SessionExpired`].
	pub(crate) async fn expire_session(&self) -> Error {
		if let Err(err) = self.store.remove_tokens().await {
			obs::record_swallowed_error(FlowKind::Request, "remove_tokens", &err);
		}

		let redirect = LoginRedirect { location: self.config.login_redirect.clone() };

		for observer in &self.observers {
			observer.session_expired(&redirect);
		}

		Error::SessionExpired
	}
}
#[cfg(feature = "reqwest")]
impl SessionClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(config, store, ReqwestHttpClient::default())
	}
}
impl<C> Clone for SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			observers: self.observers.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<C> Debug for SessionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("observers", &self.observers.len())
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}

pub(crate) fn encode_json<B>(body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|e| ConfigError::BodyEncode(e).into())
}

/// Decodes a JSON body, treating an empty body as `null`.
pub(crate) fn decode_json<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
		b"null"
	} else {
		&response.body
	};
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| RequestError::Decode { source, status: response.status }.into())
}

pub(crate) fn decode_response<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	if response.is_success() { decode_json(response) } else { Err(status_error(response)) }
}

pub(crate) fn status_error(response: &ApiResponse) -> Error {
	RequestError::Status {
		status: response.status,
		message: error_message(&response.body, response.reason()),
	}
	.into()
}
