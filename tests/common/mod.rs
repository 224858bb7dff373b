//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use ups_address_validation::{
	auth::Credentials,
	client::AddressValidator,
	endpoint::{Endpoints, RequestOption},
	http::ReqwestHttpClient,
	token::TokenManager,
};

pub const CLIENT_ID: &str = "integration-client";
pub const CLIENT_SECRET: &str = "integration-secret";
/// `Basic base64("integration-client:integration-secret")`.
pub const BASIC_AUTHORIZATION: &str = "Basic aW50ZWdyYXRpb24tY2xpZW50OmludGVncmF0aW9uLXNlY3JldA==";
pub const TOKEN_PATH: &str = "/security/v1/oauth/token";
pub const XAV_PATH: &str = "/api/addressvalidation/v1/3";
/// Loopback port with nothing listening on it.
pub const CLOSED_PORT_URL: &str = "http://127.0.0.1:9";

pub fn credentials() -> Credentials {
	Credentials::new(CLIENT_ID, CLIENT_SECRET).expect("Credential fixture should be valid.")
}

pub fn endpoints(server: &MockServer) -> Endpoints {
	Endpoints::builder()
		.oauth(&server.url(TOKEN_PATH))
		.expect("Mock OAuth URL should parse.")
		.address_validation_base(&server.url("/api/addressvalidation/v1"))
		.expect("Mock XAV URL should parse.")
		.request_option(RequestOption::ValidationAndClassification)
		.build()
		.expect("Loopback endpoints should be accepted.")
}

pub fn token_manager(server: &MockServer) -> TokenManager {
	TokenManager::new(credentials(), &endpoints(server)).expect("Token manager should build.")
}

pub fn validator(server: &MockServer) -> AddressValidator {
	AddressValidator::new(credentials(), &endpoints(server)).expect("Validator should build.")
}

pub fn http_client() -> ReqwestHttpClient {
	ReqwestHttpClient::new().expect("HTTP client should build.")
}

/// UPS-shaped token body; `expires_in` is a string as the live service sends it.
pub fn token_body(access_token: &str, expires_in: &str) -> String {
	json!({
		"token_type": "Bearer",
		"issued_at": "1700000000000",
		"client_id": CLIENT_ID,
		"access_token": access_token,
		"expires_in": expires_in,
		"status": "approved"
	})
	.to_string()
}

pub async fn mock_token<'a>(
	server: &'a MockServer,
	access_token: &str,
	expires_in: &str,
) -> httpmock::Mock<'a> {
	let body = token_body(access_token, expires_in);

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Single-candidate XAV response for the given street line and city.
pub fn candidate_response(line: &str, city: &str, state: &str, postal: &str) -> Value {
	json!({
		"XAVResponse": {
			"Response": { "ResponseStatus": { "Code": "1", "Description": "Success" } },
			"ValidAddressIndicator": "",
			"AddressClassification": { "Code": "2", "Description": "Commercial" },
			"Candidate": {
				"AddressClassification": { "Code": "2", "Description": "Commercial" },
				"AddressKeyFormat": {
					"AddressLine": line,
					"PoliticalDivision2": city,
					"PoliticalDivision1": state,
					"PostcodePrimaryLow": postal,
					"PostcodeExtendedLow": "0001",
					"Region": format!("{city} {state} {postal}-0001"),
					"CountryCode": "US"
				}
			}
		}
	})
}
