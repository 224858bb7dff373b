//! Address validation client.
//!
//! [`AddressValidator`] obtains a bearer token from its [`TokenProvider`], posts the XAV
//! envelope, and returns the response body untouched. A single failed attempt is terminal
//! for that call; nothing is retried. An HTTP 401 from the validation endpoint drops the
//! provider's cached token so the *next* call starts from a fresh exchange.

// crates.io
use reqwest::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	endpoint::Endpoints,
	error::ValidationError,
	http::{ReqwestHttpClient, ResponseSnapshot},
	obs::{self, CallKind, CallOutcome, CallSpan, log_event},
	request::AddressRequest,
	response::ValidationResult,
	token::{TokenManager, TokenProvider},
};

/// Header carrying the per-call transaction identifier.
pub const TRANSACTION_ID_HEADER: &str = "transId";
/// Header carrying the caller label.
pub const TRANSACTION_SOURCE_HEADER: &str = "transactionSrc";
/// Caller label sent when none is configured.
pub const DEFAULT_TRANSACTION_SOURCE: &str = "AddressValidationTool";

/// Validates addresses against the XAV endpoint.
pub struct AddressValidator<P = TokenManager>
where
	P: ?Sized + TokenProvider,
{
	/// Token source consulted before every submission.
	pub tokens: Arc<P>,
	/// Full XAV URL, request option included.
	pub endpoint: Url,
	/// HTTP client used for submissions.
	pub http_client: ReqwestHttpClient,
	/// Label sent in the `transactionSrc` header.
	pub transaction_source: String,
}
impl AddressValidator<TokenManager> {
	/// Builds a validator whose token manager shares its HTTP client.
	pub fn new(credentials: Credentials, endpoints: &Endpoints) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;
		let tokens = TokenManager::with_http_client(
			credentials,
			endpoints.oauth.clone(),
			http_client.clone(),
		);

		Ok(Self::with_token_provider(tokens, endpoints.address_validation.clone(), http_client))
	}
}
impl<P> AddressValidator<P>
where
	P: ?Sized + TokenProvider,
{
	/// Builds a validator around a caller-supplied token provider.
	pub fn with_token_provider(
		tokens: impl Into<Arc<P>>,
		endpoint: Url,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self {
			tokens: tokens.into(),
			endpoint,
			http_client,
			transaction_source: DEFAULT_TRANSACTION_SOURCE.into(),
		}
	}

	/// Overrides the `transactionSrc` label.
	pub fn with_transaction_source(mut self, source: impl Into<String>) -> Self {
		self.transaction_source = source.into();

		self
	}

	/// Submits `address` and returns the XAV response body.
	///
	/// Token failures are returned as [`Error::Auth`] exactly as the provider produced
	/// them; everything that goes wrong after the token is in hand is an
	/// [`Error::Validation`].
	pub async fn validate(&self, address: &AddressRequest) -> Result<ValidationResult> {
		const KIND: CallKind = CallKind::Validation;

		let span = CallSpan::new(KIND, "validate", &self.endpoint);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result: Result<ValidationResult> = span
			.instrument(async {
				let token = self.tokens.access_token().await?;

				log_event!(info, address = %address, "Validating address.");

				let response = self
					.http_client
					.post(self.endpoint.clone())
					.bearer_auth(token.expose())
					.header(TRANSACTION_ID_HEADER, transaction_id(OffsetDateTime::now_utc()))
					.header(TRANSACTION_SOURCE_HEADER, self.transaction_source.as_str())
					.json(&address.envelope())
					.send()
					.await
					.map_err(ValidationError::transport)?;
				let snapshot =
					ResponseSnapshot::read(response).await.map_err(ValidationError::transport)?;

				if !snapshot.is_success() {
					let body = snapshot.body_preview();

					log_event!(
						warn,
						status = snapshot.status_code(),
						body = %body,
						"Address validation request failed."
					);

					if snapshot.status == StatusCode::UNAUTHORIZED {
						self.tokens.invalidate().await;
					}

					return Err(
						ValidationError::Rejected { status: snapshot.status_code(), body }.into()
					);
				}

				let status = snapshot.status_code();
				let value = serde_json::from_str::<Value>(&snapshot.body)
					.map_err(|source| ValidationError::MalformedResponse { source, status })?;

				ValidationResult::from_envelope(value)
					.ok_or_else(|| ValidationError::MissingEnvelope { status }.into())
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
impl<P> Debug for AddressValidator<P>
where
	P: ?Sized + TokenProvider,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AddressValidator")
			.field("endpoint", &self.endpoint.as_str())
			.field("transaction_source", &self.transaction_source)
			.finish()
	}
}

/// Timestamp-based transaction identifier, `Address-Validation-YYYYmmddHHMMSS` in UTC.
pub fn transaction_id(now: OffsetDateTime) -> String {
	format!(
		"Address-Validation-{:04}{:02}{:02}{:02}{:02}{:02}",
		now.year(),
		u8::from(now.month()),
		now.day(),
		now.hour(),
		now.minute(),
		now.second()
	)
}
