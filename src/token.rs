//! Client-credentials token acquisition with an in-memory cache.
//!
//! [`TokenManager`] hands out the cached bearer token until it enters the pre-expiry
//! window, then performs a single `client_credentials` exchange against the OAuth
//! endpoint. The cache lock is held across the exchange, so concurrent callers piggy-back
//! on the same in-flight refresh instead of stampeding the token endpoint. A failed
//! exchange leaves the cached token untouched.
//!
//! [`TokenProvider`] is the seam the validation client depends on; tests and embedders can
//! swap in their own source of tokens.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, TokenSecret},
	endpoint::Endpoints,
	error::AuthError,
	http::{ReqwestHttpClient, ResponseSnapshot},
	obs::{self, CallKind, CallOutcome, CallSpan, log_event},
};

/// Boxed future returned by [`TokenProvider`] methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Source of bearer tokens for the validation client.
pub trait TokenProvider: Send + Sync {
	/// Returns a usable bearer token, refreshing it when needed.
	///
	/// Failures must surface as [`Error::Auth`].
	fn access_token(&self) -> ProviderFuture<'_, Result<TokenSecret>>;

	/// Drops any cached token so the next call refreshes.
	///
	/// The default implementation does nothing, which suits providers without a cache.
	fn invalidate(&self) -> ProviderFuture<'_, ()> {
		Box::pin(async {})
	}
}

/// Caches one bearer token obtained via the OAuth client-credentials grant.
pub struct TokenManager {
	credentials: Credentials,
	oauth_endpoint: Url,
	http_client: ReqwestHttpClient,
	cached: AsyncMutex<Option<AccessToken>>,
}
impl TokenManager {
	/// Lifetime assumed when the token response omits `expires_in`.
	pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(3600);

	/// Creates a manager with its own HTTP client (30-second timeout).
	pub fn new(credentials: Credentials, endpoints: &Endpoints) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Ok(Self::with_http_client(credentials, endpoints.oauth.clone(), http_client))
	}

	/// Creates a manager that reuses the caller-provided HTTP client.
	pub fn with_http_client(
		credentials: Credentials,
		oauth_endpoint: Url,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self { credentials, oauth_endpoint, http_client, cached: AsyncMutex::new(None) }
	}

	/// Client identifier the manager authenticates as.
	pub fn client_id(&self) -> &str {
		self.credentials.client_id()
	}

	/// Returns the cached token if one is usable, otherwise exchanges the credentials for a
	/// new one and caches it.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Token;

		let span = CallSpan::new(KIND, "access_token", &self.oauth_endpoint);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result: Result<TokenSecret> = span
			.instrument(async {
				let mut cached = self.cached.lock().await;

				if let Some(current) =
					cached.as_ref().filter(|token| token.is_usable_at(OffsetDateTime::now_utc()))
				{
					log_event!(
						debug,
						expires_at = %current.expires_at,
						"Reusing cached access token."
					);
					obs::record_call_outcome(KIND, CallOutcome::Reused);

					return Ok(current.secret.clone());
				}

				log_event!(info, "Requesting a new OAuth access token.");

				let token = self.exchange().await?;
				let secret = token.secret.clone();

				log_event!(
					info,
					expires_at = %token.expires_at,
					lifetime_secs = (token.expires_at - token.issued_at).whole_seconds(),
					"Obtained access token."
				);

				*cached = Some(token);

				Ok(secret)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Snapshot of the cached token, if any.
	pub async fn cached_token(&self) -> Option<AccessToken> {
		self.cached.lock().await.clone()
	}

	/// Replaces the cached token, e.g. to restore one persisted elsewhere.
	pub async fn seed(&self, token: AccessToken) {
		*self.cached.lock().await = Some(token);
	}

	/// Drops the cached token so the next call refreshes.
	pub async fn invalidate(&self) {
		if self.cached.lock().await.take().is_some() {
			log_event!(debug, "Dropped cached access token.");
		}
	}

	async fn exchange(&self) -> Result<AccessToken, AuthError> {
		let response = self
			.http_client
			.post(self.oauth_endpoint.clone())
			.header(AUTHORIZATION, self.credentials.basic_authorization())
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await
			.map_err(AuthError::transport)?;
		let snapshot = ResponseSnapshot::read(response).await.map_err(AuthError::transport)?;

		if !snapshot.is_success() {
			let body = snapshot.body_preview();

			log_event!(warn, status = snapshot.status_code(), body = %body, "OAuth request failed.");

			return Err(AuthError::Rejected { status: snapshot.status_code(), body });
		}

		let payload = parse_token_response(&snapshot)?;
		let expires_in = payload
			.expires_in
			.unwrap_or(ExpiresIn::Seconds(Self::DEFAULT_EXPIRES_IN.whole_seconds()));
		let raw = expires_in.to_string();

		AccessToken::issue(
			TokenSecret::new(payload.access_token),
			OffsetDateTime::now_utc(),
			expires_in.into_duration()?,
		)
		.ok_or(AuthError::InvalidExpiresIn { value: raw })
	}
}
impl TokenProvider for TokenManager {
	fn access_token(&self) -> ProviderFuture<'_, Result<TokenSecret>> {
		Box::pin(TokenManager::access_token(self))
	}

	fn invalidate(&self) -> ProviderFuture<'_, ()> {
		Box::pin(TokenManager::invalidate(self))
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("client_id", &self.credentials.client_id())
			.field("oauth_endpoint", &self.oauth_endpoint.as_str())
			.finish()
	}
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	expires_in: Option<ExpiresIn>,
}

/// UPS encodes `expires_in` as a JSON string; RFC 6749 uses a number. Accept both, and
/// truncate fractional numbers to whole seconds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
	Seconds(i64),
	Fractional(f64),
	Text(String),
}
impl ExpiresIn {
	fn into_duration(self) -> Result<Duration, AuthError> {
		match self {
			Self::Seconds(secs) => Ok(Duration::seconds(secs)),
			// `as` saturates; an oversized value is refused later when the expiry overflows.
			Self::Fractional(secs) if secs.is_finite() =>
				Ok(Duration::seconds(secs.trunc() as i64)),
			Self::Fractional(secs) => Err(AuthError::InvalidExpiresIn { value: secs.to_string() }),
			Self::Text(raw) => raw
				.trim()
				.parse::<i64>()
				.map(Duration::seconds)
				.map_err(|_| AuthError::InvalidExpiresIn { value: raw }),
		}
	}
}

impl Display for ExpiresIn {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Seconds(secs) => write!(f, "{secs}"),
			Self::Fractional(secs) => write!(f, "{secs}"),
			Self::Text(raw) => f.write_str(raw),
		}
	}
}

fn parse_token_response(snapshot: &ResponseSnapshot) -> Result<TokenResponse, AuthError> {
	let mut deserializer = serde_json::Deserializer::from_str(&snapshot.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| AuthError::MalformedResponse { source, status: snapshot.status_code() })
}
