//! Address request model and the XAV request envelope it serializes into.

// self
use crate::_prelude::*;

/// Address submitted for validation.
///
/// Constructed per call; deserializable so batch files can list addresses directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
	/// Street lines in order (street, suite, building, ...).
	pub lines: Vec<String>,
	/// City or town.
	pub city: String,
	/// State or province code.
	pub state: String,
	/// Postal code.
	pub postal_code: String,
	/// ISO country code; defaults to `US`.
	#[serde(default = "default_country_code")]
	pub country_code: String,
	/// Optional consignee (recipient) name.
	#[serde(default)]
	pub consignee_name: String,
}
impl AddressRequest {
	/// Country code used when none is supplied.
	pub const DEFAULT_COUNTRY_CODE: &'static str = "US";

	/// Creates a request for a US address.
	pub fn new<I, S>(
		lines: I,
		city: impl Into<String>,
		state: impl Into<String>,
		postal_code: impl Into<String>,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			lines: lines.into_iter().map(Into::into).collect(),
			city: city.into(),
			state: state.into(),
			postal_code: postal_code.into(),
			country_code: default_country_code(),
			consignee_name: String::new(),
		}
	}

	/// Overrides the country code.
	pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
		self.country_code = country_code.into();

		self
	}

	/// Sets the consignee name.
	pub fn with_consignee_name(mut self, name: impl Into<String>) -> Self {
		self.consignee_name = name.into();

		self
	}

	/// `Region` field as UPS expects it: `city,state,postal_code`.
	pub fn region(&self) -> String {
		format!("{},{},{}", self.city, self.state, self.postal_code)
	}

	pub(crate) fn envelope(&self) -> XavRequestEnvelope<'_> {
		XavRequestEnvelope {
			request: XavRequest {
				address_key_format: AddressKeyFormat {
					consignee_name: &self.consignee_name,
					address_line: &self.lines,
					region: self.region(),
					country_code: &self.country_code,
				},
			},
		}
	}
}
impl Display for AddressRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}, {}, {} {}", self.lines.join(", "), self.city, self.state, self.postal_code)
	}
}

#[derive(Debug, Serialize)]
pub(crate) struct XavRequestEnvelope<'a> {
	#[serde(rename = "XAVRequest")]
	request: XavRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XavRequest<'a> {
	address_key_format: AddressKeyFormat<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddressKeyFormat<'a> {
	consignee_name: &'a str,
	address_line: &'a [String],
	region: String,
	country_code: &'a str,
}

fn default_country_code() -> String {
	AddressRequest::DEFAULT_COUNTRY_CODE.to_owned()
}
