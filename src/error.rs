//! Client-level error types shared by the token manager, validation client, and endpoint
//! configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Token failures surface as [`Error::Auth`] even when they happen inside
/// [`AddressValidator::validate`](crate::client::AddressValidator::validate), so callers can
/// tell a credential problem apart from a rejected address.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token acquisition failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Address submission failed.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A credential field was empty.
	#[error("The {field} credential must not be empty.")]
	EmptyCredential {
		/// Which credential field was empty.
		field: &'static str,
	},
	/// Endpoint URL cannot be parsed.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint URL cannot carry path segments (e.g. `mailto:`).
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	CannotBeABase {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while obtaining a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Network, TLS, or timeout failure while calling the OAuth endpoint.
	#[error("Network error occurred while calling the OAuth endpoint.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// OAuth endpoint answered with a non-success status.
	#[error("OAuth endpoint rejected the token request with HTTP {status}: {body}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Truncated response body kept for diagnostics.
		body: String,
	},
	/// OAuth endpoint answered 2xx with a body that is not a token response.
	#[error("OAuth endpoint returned a malformed token response.")]
	MalformedResponse {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// The `expires_in` field is neither a number nor a numeric string.
	#[error("OAuth endpoint returned a non-numeric expires_in value: {value}.")]
	InvalidExpiresIn {
		/// Raw value as received.
		value: String,
	},
}
impl AuthError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
			Self::Transport { .. } | Self::InvalidExpiresIn { .. } => None,
		}
	}
}

/// Failures raised while submitting an address.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Network, TLS, or timeout failure while calling the validation endpoint.
	#[error("Network error occurred while calling the address validation endpoint.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Validation endpoint answered with a non-success status.
	#[error("Address validation endpoint rejected the request with HTTP {status}: {body}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Truncated response body kept for diagnostics.
		body: String,
	},
	/// Validation endpoint answered 2xx with a body that is not JSON.
	#[error("Address validation endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
		/// HTTP status code.
		status: u16,
	},
	/// Validation endpoint answered 2xx without the `XAVResponse` envelope.
	#[error("Address validation response is missing the XAVResponse envelope.")]
	MissingEnvelope {
		/// HTTP status code.
		status: u16,
	},
}
impl ValidationError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::MissingEnvelope { status } => Some(*status),
			Self::Transport { .. } => None,
		}
	}
}
