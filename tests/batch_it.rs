mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use ups_address_validation::{
	batch::{self, BatchEntry},
	error::{Error, ValidationError},
};

#[tokio::test]
async fn failing_entry_does_not_stop_the_batch() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server, "batch-token", "3600").await;
	let entries = BatchEntry::samples();
	let mut successes = Vec::new();

	for (region, line, city, state, postal) in [
		("Mountain View,CA,94043", "1600 AMPHITHEATRE PKWY", "MOUNTAIN VIEW", "CA", "94043"),
		("Redmond,WA,98052", "1 MICROSOFT WAY", "REDMOND", "WA", "98052"),
		("Seattle,WA,98109", "410 TERRY AVE N", "SEATTLE", "WA", "98109"),
	] {
		let body = candidate_response(line, city, state, postal);

		successes.push(
			server
				.mock_async(|when, then| {
					when.method(POST).path(XAV_PATH).body_includes(region);
					then.status(200).json_body(body);
				})
				.await,
		);
	}

	let failing = server
		.mock_async(|when, then| {
			when.method(POST).path(XAV_PATH).body_includes("Cupertino,CA,95014");
			then.status(500).body("{\"response\":{\"errors\":[{\"code\":\"9999\"}]}}");
		})
		.await;
	let validator = validator(&server);
	let mut out = Vec::new();
	let report =
		batch::run_batch(&validator, &entries, &mut out).await.expect("Writing to a Vec succeeds.");
	let text = String::from_utf8(out).expect("Batch output should be UTF-8.");

	assert_eq!(report.attempted, 4);
	assert_eq!(report.succeeded, 3);
	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].label, "Apple (Cupertino HQ)");
	assert!(matches!(
		report.failures[0].error,
		Error::Validation(ValidationError::Rejected { status: 500, .. })
	));

	for mock in &successes {
		mock.assert_calls_async(1).await;
	}
	failing.assert_calls_async(1).await;
	token.assert_calls_async(1).await;

	assert_eq!(text.matches("Found 1 matching address(es):").count(), 3);
	assert!(text.contains("  Address: 410 TERRY AVE N\n"));
	assert!(text.contains("Validation failed: "));

	let google = text.find("Google (Mountain View HQ)").expect("Google heading is printed.");
	let apple = text.find("Apple (Cupertino HQ)").expect("Apple heading is printed.");
	let amazon = text.find("Amazon (Seattle HQ)").expect("Amazon heading is printed.");

	assert!(google < apple && apple < amazon);
}

#[tokio::test]
async fn address_file_entries_run_in_order() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "batch-token", "3600").await;
	let xav = server
		.mock_async(|when, then| {
			when.method(POST).path(XAV_PATH);
			then.status(200)
				.json_body(serde_json::json!({ "XAVResponse": { "AmbiguousAddressIndicator": "" } }));
		})
		.await;
	let entries: Vec<BatchEntry> = serde_json::from_str(
		r#"[
			{ "label": "Warehouse", "lines": ["1 Main St"], "city": "Springfield", "state": "IL", "postal_code": "62701" },
			{ "label": "Office", "lines": ["2 Main St", "Suite 4"], "city": "Springfield", "state": "IL", "postal_code": "62701", "consignee_name": "Front Desk" }
		]"#,
	)
	.expect("Address file fixture should parse.");
	let mut out = Vec::new();
	let report = batch::run_batch(&validator(&server), &entries, &mut out)
		.await
		.expect("Writing to a Vec succeeds.");
	let text = String::from_utf8(out).expect("Batch output should be UTF-8.");

	assert_eq!(report.succeeded, 2);
	assert!(report.is_clean());
	assert_eq!(text.matches("Address is ambiguous and could not be validated.").count(), 2);
	assert!(text.find("Warehouse") < text.find("Office"));

	xav.assert_calls_async(2).await;
}
