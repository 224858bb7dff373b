//! Operator-facing text for validation results.
//!
//! Rendering is pure and deterministic. Shapes that [`ValidationResult::outcome`] cannot
//! decode fall back to the pretty-printed JSON document.

// std
use std::fmt::Write;
// self
use crate::{
	_prelude::*,
	response::{Candidate, ValidationOutcome, ValidationResult},
};

const RULE_WIDTH: usize = 60;

/// Renders `result` as a block of operator text.
pub fn render(result: &ValidationResult) -> String {
	Rendered::new(result).to_string()
}

/// Renders `result` under a heading naming the address (e.g. the company).
pub fn render_labelled(label: &str, result: &ValidationResult) -> String {
	Rendered::new(result).with_label(label).to_string()
}

/// Renders a failed validation under the same heading a result would get.
pub fn render_failure(label: &str, error: &Error) -> String {
	Rendered::failure(error).with_label(label).to_string()
}

/// [`Display`] adapter behind [`render`], [`render_labelled`], and [`render_failure`].
#[derive(Clone, Copy, Debug)]
pub struct Rendered<'a> {
	body: Body<'a>,
	label: Option<&'a str>,
}
impl<'a> Rendered<'a> {
	/// Wraps a result without a heading.
	pub fn new(result: &'a ValidationResult) -> Self {
		Self { body: Body::Result(result), label: None }
	}

	/// Wraps a validation error without a heading.
	pub fn failure(error: &'a Error) -> Self {
		Self { body: Body::Failure(error), label: None }
	}

	/// Adds a heading naming the address.
	pub fn with_label(mut self, label: &'a str) -> Self {
		self.label = Some(label);

		self
	}
}
impl Display for Rendered<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if let Some(label) = self.label {
			write_heading(f, label)?;
		}

		let result = match self.body {
			Body::Result(result) => result,
			Body::Failure(error) => return writeln!(f, "Validation failed: {error}"),
		};

		match result.outcome() {
			ValidationOutcome::Candidates(candidates) => {
				writeln!(f, "Found {} matching address(es):", candidates.len())?;

				for (idx, candidate) in candidates.iter().enumerate() {
					writeln!(f)?;
					write_candidate(f, idx + 1, candidate)?;
				}

				Ok(())
			},
			ValidationOutcome::NoCandidates => writeln!(f, "No matching address found."),
			ValidationOutcome::Ambiguous =>
				writeln!(f, "Address is ambiguous and could not be validated."),
			ValidationOutcome::Unrecognized => {
				writeln!(f, "Unrecognized response:")?;
				writeln!(f, "{}", pretty_json(result.as_json()))
			},
		}
	}
}

#[derive(Clone, Copy, Debug)]
enum Body<'a> {
	Result(&'a ValidationResult),
	Failure(&'a Error),
}

fn write_heading(f: &mut impl Write, label: &str) -> FmtResult {
	let rule = "=".repeat(RULE_WIDTH);

	writeln!(f, "{rule}")?;
	writeln!(f, "{label}")?;
	writeln!(f, "{rule}")
}

fn write_candidate(f: &mut impl Write, position: usize, candidate: &Candidate) -> FmtResult {
	writeln!(f, "Candidate #{position}:")?;
	writeln!(f, "  Quality: {}", candidate.classification)?;

	if candidate.address_lines.is_empty() {
		writeln!(f, "  Address: ")?;
	}
	for line in &candidate.address_lines {
		writeln!(f, "  Address: {line}")?;
	}

	writeln!(f, "  City: {}", candidate.city)?;
	writeln!(f, "  State: {}", candidate.state)?;
	writeln!(f, "  Postal: {}", candidate.full_postal_code())?;
	writeln!(f, "  Country: {}", candidate.country_code)
}

fn pretty_json(value: &Value) -> String {
	serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn two_candidates() -> ValidationResult {
		ValidationResult::new(json!({
			"XAVResponse": {
				"Candidate": [
					{
						"AddressClassification": { "Description": "Commercial" },
						"AddressKeyFormat": {
							"AddressLine": ["410 TERRY AVE N", "STE 100"],
							"PoliticalDivision2": "SEATTLE",
							"PoliticalDivision1": "WA",
							"PostcodePrimaryLow": "98109",
							"PostcodeExtendedLow": "5210",
							"CountryCode": "US"
						}
					},
					{
						"AddressKeyFormat": {
							"AddressLine": "410 TERRY AVE",
							"PoliticalDivision2": "SEATTLE",
							"PoliticalDivision1": "WA",
							"PostcodePrimaryLow": "98109",
							"CountryCode": "US"
						}
					}
				]
			}
		}))
	}

	#[test]
	fn candidates_render_in_fixed_field_order() {
		let expected = [
			"Found 2 matching address(es):",
			"",
			"Candidate #1:",
			"  Quality: Commercial",
			"  Address: 410 TERRY AVE N",
			"  Address: STE 100",
			"  City: SEATTLE",
			"  State: WA",
			"  Postal: 98109-5210",
			"  Country: US",
			"",
			"Candidate #2:",
			"  Quality: ",
			"  Address: 410 TERRY AVE",
			"  City: SEATTLE",
			"  State: WA",
			"  Postal: 98109",
			"  Country: US",
			"",
		]
		.join("\n");

		assert_eq!(render(&two_candidates()), expected);
	}

	#[test]
	fn rendering_is_idempotent() {
		let result = two_candidates();

		assert_eq!(render(&result), render(&result));
		assert_eq!(render(&result).matches("Candidate #").count(), 2);
	}

	#[test]
	fn indicators_render_single_line() {
		let none = ValidationResult::new(json!({ "XAVResponse": { "NoCandidatesIndicator": "" } }));
		let ambiguous =
			ValidationResult::new(json!({ "XAVResponse": { "AmbiguousAddressIndicator": "" } }));

		assert_eq!(render(&none), "No matching address found.\n");
		assert_eq!(render(&ambiguous), "Address is ambiguous and could not be validated.\n");
	}

	#[test]
	fn unknown_shapes_dump_raw_json() {
		let result = ValidationResult::new(json!({ "XAVResponse": { "Candidate": 7 } }));
		let text = render(&result);

		assert!(text.starts_with("Unrecognized response:\n"));
		assert!(text.contains("\"Candidate\": 7"));
	}

	#[test]
	fn label_adds_heading() {
		let none = ValidationResult::new(json!({ "XAVResponse": { "NoCandidatesIndicator": "" } }));
		let text = render_labelled("Amazon (Seattle HQ)", &none);
		let rule = "=".repeat(RULE_WIDTH);

		assert_eq!(
			text,
			format!("{rule}\nAmazon (Seattle HQ)\n{rule}\nNo matching address found.\n")
		);
	}

	#[test]
	fn failure_keeps_heading() {
		let error: Error =
			crate::error::ValidationError::Rejected { status: 500, body: "boom".into() }.into();
		let rule = "=".repeat(RULE_WIDTH);

		assert_eq!(
			render_failure("Apple (Cupertino HQ)", &error),
			format!(
				"{rule}\nApple (Cupertino HQ)\n{rule}\nValidation failed: Address validation endpoint \
				 rejected the request with HTTP 500: boom\n"
			)
		);
		assert_eq!(
			Rendered::failure(&error).to_string(),
			format!("Validation failed: {error}\n")
		);
	}
}
