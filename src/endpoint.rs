//! Endpoint set for the UPS security and address validation APIs.
//!
//! [`Endpoints`] defaults to the UPS production hosts. Overrides go through
//! [`EndpointsBuilder`], which rejects plain-HTTP URLs unless they point at a loopback host
//! (local mocks) and appends the [`RequestOption`] path segment to the validation base.

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// UPS production OAuth token endpoint.
pub const UPS_OAUTH_URL: &str = "https://onlinetools.ups.com/security/v1/oauth/token";
/// UPS production address validation base URL; the request option is appended as a segment.
pub const UPS_ADDRESS_VALIDATION_URL: &str = "https://onlinetools.ups.com/api/addressvalidation/v1";
/// UPS customer integration environment OAuth token endpoint.
pub const UPS_CIE_OAUTH_URL: &str = "https://wwwcie.ups.com/security/v1/oauth/token";
/// UPS customer integration environment address validation base URL.
pub const UPS_CIE_ADDRESS_VALIDATION_URL: &str = "https://wwwcie.ups.com/api/addressvalidation/v1";

/// Work requested from the XAV endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOption {
	/// Street-level validation only.
	AddressValidation,
	/// Residential/commercial classification only.
	AddressClassification,
	/// Validation plus classification.
	#[default]
	ValidationAndClassification,
}
impl RequestOption {
	/// Path segment UPS expects for the option.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOption::AddressValidation => "1",
			RequestOption::AddressClassification => "2",
			RequestOption::ValidationAndClassification => "3",
		}
	}
}
impl Display for RequestOption {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for RequestOption {
	type Err = UnknownRequestOption;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"1" | "validation" => Ok(Self::AddressValidation),
			"2" | "classification" => Ok(Self::AddressClassification),
			"3" | "both" => Ok(Self::ValidationAndClassification),
			_ => Err(UnknownRequestOption(s.to_owned())),
		}
	}
}

/// Raised when parsing a [`RequestOption`] from text fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown request option `{0}`; expected 1/validation, 2/classification, or 3/both.")]
pub struct UnknownRequestOption(pub String);

/// Resolved endpoints used by the token manager and validation client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// OAuth client-credentials token endpoint.
	pub oauth: Url,
	/// Full address validation URL, request option included.
	pub address_validation: Url,
	/// Request option baked into [`Endpoints::address_validation`].
	pub request_option: RequestOption,
}
impl Endpoints {
	/// Creates a builder seeded with the UPS production hosts.
	pub fn builder() -> EndpointsBuilder {
		EndpointsBuilder::default()
	}

	/// UPS production endpoints with the default request option.
	pub fn production() -> Result<Self, ConfigError> {
		Self::builder().build()
	}

	/// UPS customer integration (sandbox) endpoints with the default request option.
	pub fn sandbox() -> Result<Self, ConfigError> {
		Self::builder()
			.oauth(UPS_CIE_OAUTH_URL)?
			.address_validation_base(UPS_CIE_ADDRESS_VALIDATION_URL)?
			.build()
	}
}

/// Builder for [`Endpoints`] values.
#[derive(Clone, Debug, Default)]
pub struct EndpointsBuilder {
	/// OAuth endpoint override.
	pub oauth: Option<Url>,
	/// Validation base URL override (without the request option segment).
	pub address_validation_base: Option<Url>,
	/// Request option appended to the validation base.
	pub request_option: RequestOption,
}
impl EndpointsBuilder {
	/// Overrides the OAuth endpoint.
	pub fn oauth(self, url: &str) -> Result<Self, ConfigError> {
		let url = parse("oauth", url)?;

		Ok(self.oauth_url(url))
	}

	/// Overrides the OAuth endpoint with an already parsed URL.
	pub fn oauth_url(mut self, url: Url) -> Self {
		self.oauth = Some(url);

		self
	}

	/// Overrides the validation base URL.
	pub fn address_validation_base(self, url: &str) -> Result<Self, ConfigError> {
		let url = parse("address validation", url)?;

		Ok(self.address_validation_base_url(url))
	}

	/// Overrides the validation base URL with an already parsed URL.
	pub fn address_validation_base_url(mut self, url: Url) -> Self {
		self.address_validation_base = Some(url);

		self
	}

	/// Selects the request option appended to the validation base.
	pub fn request_option(mut self, option: RequestOption) -> Self {
		self.request_option = option;

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<Endpoints, ConfigError> {
		let oauth = match self.oauth {
			Some(url) => url,
			None => parse("oauth", UPS_OAUTH_URL)?,
		};
		let base = match self.address_validation_base {
			Some(url) => url,
			None => parse("address validation", UPS_ADDRESS_VALIDATION_URL)?,
		};

		validate_endpoint("oauth", &oauth)?;
		validate_endpoint("address validation", &base)?;

		let mut address_validation = base.clone();

		address_validation
			.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase {
				endpoint: "address validation",
				url: base.to_string(),
			})?
			.pop_if_empty()
			.push(self.request_option.as_str());

		Ok(Endpoints { oauth, address_validation, request_option: self.request_option })
	}
}

fn parse(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { endpoint, source })
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}
