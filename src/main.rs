//! Operator entry point: checks the UPS credentials, validates a batch of addresses, and
//! prints the candidates.

// std
use std::{fs, io, path::PathBuf, process::ExitCode};
// crates.io
use clap::{Parser, builder::NonEmptyStringValueParser};
use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::EnvFilter;
use url::Url;
// self
use ups_address_validation::{
	auth::Credentials,
	batch::{self, BatchEntry},
	client::AddressValidator,
	endpoint::{Endpoints, RequestOption, UPS_CIE_ADDRESS_VALIDATION_URL, UPS_CIE_OAUTH_URL},
};

/// Validate US addresses against the UPS Address Validation (XAV) API.
#[derive(Debug, Parser)]
#[command(name = "ups-address-validation", version, about)]
struct Cli {
	/// UPS developer portal client ID.
	#[arg(
		long,
		env = "UPS_CLIENT_ID",
		hide_env_values = true,
		value_parser = NonEmptyStringValueParser::new()
	)]
	client_id: String,
	/// UPS developer portal client secret.
	#[arg(
		long,
		env = "UPS_CLIENT_SECRET",
		hide_env_values = true,
		value_parser = NonEmptyStringValueParser::new()
	)]
	client_secret: String,
	/// JSON file holding an array of `{label, lines, city, state, postal_code}` entries.
	///
	/// Built-in sample addresses are used when omitted.
	#[arg(long, value_name = "FILE")]
	addresses: Option<PathBuf>,
	/// Request option: 1/validation, 2/classification, or 3/both.
	#[arg(long, default_value_t = RequestOption::default())]
	request_option: RequestOption,
	/// Use the UPS customer integration environment instead of production.
	#[arg(long)]
	sandbox: bool,
	/// Override the OAuth token endpoint.
	#[arg(long, env = "UPS_OAUTH_URL")]
	oauth_url: Option<Url>,
	/// Override the address validation base URL (without the request option).
	#[arg(long, env = "UPS_XAV_URL")]
	validation_url: Option<Url>,
	/// Log filter directive, e.g. `info` or `ups_address_validation=debug`.
	#[arg(long, env = "RUST_LOG", default_value = "info")]
	log_level: String,
}
impl Cli {
	fn endpoints(&self) -> Result<Endpoints> {
		let mut builder = Endpoints::builder();

		if self.sandbox {
			builder = builder
				.oauth(UPS_CIE_OAUTH_URL)?
				.address_validation_base(UPS_CIE_ADDRESS_VALIDATION_URL)?;
		}

		if let Some(url) = &self.oauth_url {
			builder = builder.oauth_url(url.clone());
		}
		if let Some(url) = &self.validation_url {
			builder = builder.address_validation_base_url(url.clone());
		}

		Ok(builder.request_option(self.request_option).build()?)
	}

	fn entries(&self) -> Result<Vec<BatchEntry>> {
		let Some(path) = &self.addresses else {
			return Ok(BatchEntry::samples());
		};
		let raw = fs::read_to_string(path)
			.wrap_err_with(|| format!("failed to read address file {}", path.display()))?;

		serde_json::from_str(&raw)
			.wrap_err_with(|| format!("failed to parse address file {}", path.display()))
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;
	// A missing `.env` is fine; the flags and the real environment still apply.
	dotenvy::dotenv().ok();

	let cli = Cli::parse();
	let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

	let credentials = Credentials::new(cli.client_id.as_str(), cli.client_secret.as_str())?;
	let endpoints = cli.endpoints()?;
	let entries = cli.entries()?;
	let validator = AddressValidator::new(credentials, &endpoints)?;

	tracing::info!(
		oauth = %endpoints.oauth,
		validation = %endpoints.address_validation,
		entries = entries.len(),
		"Starting address validation run."
	);

	if let Err(e) = validator.tokens.access_token().await {
		tracing::error!(
			error = %e,
			"Unable to obtain an access token; check the client ID and secret."
		);

		return Ok(ExitCode::FAILURE);
	}

	let mut stdout = io::stdout().lock();
	let report = batch::run_batch(&validator, &entries, &mut stdout).await?;

	tracing::info!(
		attempted = report.attempted,
		succeeded = report.succeeded,
		failed = report.failures.len(),
		"Address validation run complete."
	);

	Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
	// crates.io
	use clap::CommandFactory;
	// self
	use super::*;

	#[test]
	fn cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn empty_credentials_are_rejected_before_any_request() {
		let parsed = Cli::try_parse_from([
			"ups-address-validation",
			"--client-id",
			"",
			"--client-secret",
			"secret",
		]);

		assert!(parsed.is_err());
	}

	#[test]
	fn sandbox_flag_switches_hosts() {
		let cli = Cli::try_parse_from([
			"ups-address-validation",
			"--client-id",
			"id",
			"--client-secret",
			"secret",
			"--sandbox",
			"--request-option",
			"validation",
		])
		.expect("Flags should parse.");
		let endpoints = cli.endpoints().expect("Sandbox endpoints should build.");

		assert_eq!(endpoints.oauth.as_str(), UPS_CIE_OAUTH_URL);
		assert_eq!(
			endpoints.address_validation.as_str(),
			"https://wwwcie.ups.com/api/addressvalidation/v1/1"
		);
	}
}
