//! Sequential batch validation for operator runs.
//!
//! Each entry is validated in order and its outcome written as soon as it is known. A
//! failing entry is logged, recorded in the [`BatchReport`], and skipped; it never aborts
//! the rest of the batch.

// std
use std::io::Write;
// self
use crate::{
	_prelude::*,
	client::AddressValidator,
	obs::log_event,
	render,
	request::AddressRequest,
	token::TokenProvider,
};

/// One labelled address in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
	/// Heading printed above the result (e.g. the company name).
	pub label: String,
	/// Address to validate.
	#[serde(flatten)]
	pub address: AddressRequest,
}
impl BatchEntry {
	/// Pairs a label with an address.
	pub fn new(label: impl Into<String>, address: AddressRequest) -> Self {
		Self { label: label.into(), address }
	}

	/// Well-known US headquarters used when no address file is supplied.
	pub fn samples() -> Vec<Self> {
		vec![
			Self::new(
				"Google (Mountain View HQ)",
				AddressRequest::new(["1600 Amphitheatre Parkway"], "Mountain View", "CA", "94043"),
			),
			Self::new(
				"Apple (Cupertino HQ)",
				AddressRequest::new(["One Apple Park Way"], "Cupertino", "CA", "95014"),
			),
			Self::new(
				"Microsoft (Redmond HQ)",
				AddressRequest::new(["One Microsoft Way"], "Redmond", "WA", "98052"),
			),
			Self::new(
				"Amazon (Seattle HQ)",
				AddressRequest::new(["410 Terry Ave N"], "Seattle", "WA", "98109"),
			),
		]
	}
}

/// Entry that could not be validated.
#[derive(Debug)]
pub struct BatchFailure {
	/// Label of the failed entry.
	pub label: String,
	/// Error returned by the validator.
	pub error: Error,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
	/// Entries submitted.
	pub attempted: usize,
	/// Entries that produced a validation result.
	pub succeeded: usize,
	/// Entries that failed, in submission order.
	pub failures: Vec<BatchFailure>,
}
impl BatchReport {
	/// Whether every entry succeeded.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Validates `entries` one after another, writing each rendered outcome to `out`.
///
/// Only I/O errors on `out` stop the run early.
pub async fn run_batch<P, W>(
	validator: &AddressValidator<P>,
	entries: &[BatchEntry],
	out: &mut W,
) -> std::io::Result<BatchReport>
where
	P: ?Sized + TokenProvider,
	W: Write,
{
	let mut report = BatchReport::default();

	for entry in entries {
		report.attempted += 1;

		match validator.validate(&entry.address).await {
			Ok(result) => {
				report.succeeded += 1;

				write!(out, "{}", render::render_labelled(&entry.label, &result))?;
			},
			Err(error) => {
				log_event!(
					error,
					label = %entry.label,
					address = %entry.address,
					error = %error,
					"Address validation failed; continuing with the next entry."
				);
				write!(out, "{}", render::render_failure(&entry.label, &error))?;

				report.failures.push(BatchFailure { label: entry.label.clone(), error });
			},
		}

		writeln!(out)?;
	}

	log_event!(
		info,
		attempted = report.attempted,
		succeeded = report.succeeded,
		failed = report.failures.len(),
		"Batch finished."
	);

	Ok(report)
}
