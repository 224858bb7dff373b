//! Cached bearer token with its effective expiry.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Bearer token held by [`TokenManager`](crate::token::TokenManager).
///
/// `expires_at` is the *effective* expiry: the provider's lifetime minus
/// [`AccessToken::PREEXPIRY_WINDOW`]. The record is replaced wholesale on refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer token value.
	pub secret: TokenSecret,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token is no longer handed out.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Safety margin subtracted from the provider-supplied lifetime.
	pub const PREEXPIRY_WINDOW: Duration = Duration::seconds(300);

	/// Records a token received at `issued_at` that the provider declared valid for
	/// `expires_in`.
	///
	/// Returns `None` when the effective expiry falls outside the representable date range.
	pub fn issue(
		secret: TokenSecret,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Option<Self> {
		let expires_at =
			issued_at.checked_add(expires_in)?.checked_sub(Self::PREEXPIRY_WINDOW)?;

		Some(Self { secret, issued_at, expires_at })
	}

	/// Returns `true` while `instant` is strictly before the effective expiry.
	pub fn is_usable_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks usability against the current UTC clock.
	pub fn is_usable(&self) -> bool {
		self.is_usable_at(OffsetDateTime::now_utc())
	}

	/// Time left before the effective expiry, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn issue_subtracts_preexpiry_window() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::issue(TokenSecret::new("t"), issued, Duration::seconds(3600))
			.expect("One hour lifetime is in range.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:55 UTC));
		assert!(token.is_usable_at(macros::datetime!(2025-01-01 00:54:59 UTC)));
		assert!(!token.is_usable_at(macros::datetime!(2025-01-01 00:55 UTC)));
	}

	#[test]
	fn short_lifetimes_are_never_usable() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::issue(TokenSecret::new("t"), issued, Duration::seconds(120))
			.expect("Two minute lifetime is in range.");

		assert!(!token.is_usable_at(issued));
		assert_eq!(token.remaining_at(issued), Duration::ZERO);
	}

	#[test]
	fn debug_redacts_secret() {
		let token = AccessToken::issue(
			TokenSecret::new("super-secret"),
			macros::datetime!(2025-01-01 00:00 UTC),
			Duration::hours(4),
		)
		.expect("Four hour lifetime is in range.");

		assert!(!format!("{token:?}").contains("super-secret"));
	}

	#[test]
	fn out_of_range_lifetime_is_refused() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(AccessToken::issue(TokenSecret::new("t"), issued, Duration::MAX).is_none());
		assert!(AccessToken::issue(TokenSecret::new("t"), issued, Duration::MIN).is_none());
	}
}
