//! Validation result passthrough and a best-effort typed view over it.
//!
//! [`ValidationResult`] keeps the XAV response body exactly as received.
//! [`ValidationResult::outcome`] decodes the parts operators care about (candidates and the
//! no-candidate/ambiguous indicators) without ever failing: any shape it does not recognize
//! becomes [`ValidationOutcome::Unrecognized`].

// crates.io
use serde::{Deserializer, de::IgnoredAny};
// self
use crate::_prelude::*;

/// Raw XAV response document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult(Value);
impl ValidationResult {
	/// Top-level key that wraps every successful XAV response.
	pub const ENVELOPE_KEY: &'static str = "XAVResponse";

	/// Wraps any JSON document without checking its shape.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Wraps `value` only when it carries the [`ValidationResult::ENVELOPE_KEY`] envelope.
	pub fn from_envelope(value: Value) -> Option<Self> {
		value.get(Self::ENVELOPE_KEY).is_some().then_some(Self(value))
	}

	/// Borrowed JSON document.
	pub fn as_json(&self) -> &Value {
		&self.0
	}

	/// Owned JSON document.
	pub fn into_json(self) -> Value {
		self.0
	}

	/// Decodes the document into a [`ValidationOutcome`].
	///
	/// Candidates take precedence over the indicator flags, then the no-candidates flag,
	/// then the ambiguous flag.
	pub fn outcome(&self) -> ValidationOutcome {
		let Some(envelope) = self.0.get(Self::ENVELOPE_KEY) else {
			return ValidationOutcome::Unrecognized;
		};
		let Ok(response) = XavResponse::deserialize(envelope) else {
			return ValidationOutcome::Unrecognized;
		};
		let candidates = response.candidate.map(OneOrMany::into_vec).unwrap_or_default();

		if !candidates.is_empty() {
			return ValidationOutcome::Candidates(
				candidates.into_iter().map(Candidate::from).collect(),
			);
		}
		if response.no_candidates_indicator {
			return ValidationOutcome::NoCandidates;
		}
		if response.ambiguous_address_indicator {
			return ValidationOutcome::Ambiguous;
		}

		ValidationOutcome::Unrecognized
	}
}
impl From<ValidationResult> for Value {
	fn from(result: ValidationResult) -> Self {
		result.0
	}
}

/// Decoded XAV verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
	/// One or more candidate addresses matched.
	Candidates(Vec<Candidate>),
	/// The service found no candidates.
	NoCandidates,
	/// The input was too ambiguous to validate.
	Ambiguous,
	/// None of the above could be decoded.
	Unrecognized,
}

/// One normalized address returned by the service. Missing fields are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
	/// Classification description (e.g. `Commercial`, `Residential`).
	pub classification: String,
	/// Street lines in order.
	pub address_lines: Vec<String>,
	/// City (`PoliticalDivision2`).
	pub city: String,
	/// State (`PoliticalDivision1`).
	pub state: String,
	/// Primary postal code (`PostcodePrimaryLow`).
	pub postal_code: String,
	/// Extended postal code, e.g. ZIP+4 (`PostcodeExtendedLow`).
	pub postal_extension: String,
	/// Country code.
	pub country_code: String,
}
impl Candidate {
	/// `PRIMARY-EXT` when an extension is present, otherwise `PRIMARY`.
	pub fn full_postal_code(&self) -> String {
		if self.postal_extension.is_empty() {
			self.postal_code.clone()
		} else {
			format!("{}-{}", self.postal_code, self.postal_extension)
		}
	}
}
impl From<RawCandidate> for Candidate {
	fn from(raw: RawCandidate) -> Self {
		let key = raw.address_key_format;

		Self {
			classification: raw.address_classification.description,
			address_lines: key.address_line.map(OneOrMany::into_vec).unwrap_or_default(),
			city: key.political_division2,
			state: key.political_division1,
			postal_code: key.postcode_primary_low,
			postal_extension: key.postcode_extended_low,
			country_code: key.country_code,
		}
	}
}

/// UPS collapses single-element arrays into bare values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
	Many(Vec<T>),
	One(T),
}
impl<T> OneOrMany<T> {
	fn into_vec(self) -> Vec<T> {
		match self {
			Self::Many(values) => values,
			Self::One(value) => vec![value],
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct XavResponse {
	#[serde(default)]
	candidate: Option<OneOrMany<RawCandidate>>,
	#[serde(default, deserialize_with = "present")]
	no_candidates_indicator: bool,
	#[serde(default, deserialize_with = "present")]
	ambiguous_address_indicator: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawCandidate {
	address_classification: RawClassification,
	address_key_format: RawAddressKeyFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawClassification {
	description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawAddressKeyFormat {
	address_line: Option<OneOrMany<String>>,
	political_division2: String,
	political_division1: String,
	postcode_primary_low: String,
	postcode_extended_low: String,
	country_code: String,
}

/// Indicator fields carry an empty string; only their presence matters.
fn present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	IgnoredAny::deserialize(deserializer).map(|_| true)
}
