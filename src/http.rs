//! Transport primitives shared by the OAuth and address validation calls.
//!
//! Both endpoints are driven through [`ReqwestHttpClient`], which pins the per-request
//! timeout and disables redirects. [`ResponseSnapshot`] captures the status and body of a
//! response before it is classified, so failures can carry the body for diagnostics.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{Response, StatusCode, redirect::Policy};
// self
use crate::{_prelude::*, error::ConfigError};

/// Upper bound applied to every outbound request.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const BODY_PREVIEW_LIMIT: usize = 512;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Neither endpoint is expected to redirect; a redirect would replay the bearer token or
/// the Basic credentials against another host, so the wrapper never follows one. Clones
/// share the same connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client with the default 30-second timeout.
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	/// Builds a client with a custom per-request timeout.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The caller is responsible for configuring timeouts and redirect handling.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Status and fully-read body of an HTTP response.
#[derive(Clone, Debug)]
pub struct ResponseSnapshot {
	/// HTTP status returned by the endpoint.
	pub status: StatusCode,
	/// Decoded response body.
	pub body: String,
}
impl ResponseSnapshot {
	/// Drains `response` into a snapshot.
	pub async fn read(response: Response) -> Result<Self, ReqwestError> {
		let status = response.status();
		let body = response.text().await?;

		Ok(Self { status, body })
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Numeric status code.
	pub fn status_code(&self) -> u16 {
		self.status.as_u16()
	}

	/// Body truncated for inclusion in error messages and logs.
	pub fn body_preview(&self) -> String {
		body_preview(&self.body)
	}
}

/// Truncates `body` to a bounded preview on a character boundary.
pub fn body_preview(body: &str) -> String {
	let trimmed = body.trim();

	match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => format!("{}...", &trimmed[..idx]),
		None => trimmed.to_owned(),
	}
}
