// self
use crate::{_prelude::*, obs::CallKind};

/// Future returned by [`CallSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// `ups_xav.call` span covering one token or validation request.
///
/// Fields: `call` (token/validation), `stage` (calling operation), and `host` of the UPS
/// endpoint, so CIE and production traffic can be told apart in the same log stream.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for a call of `kind` against `endpoint`.
	pub fn new(kind: CallKind, stage: &'static str, endpoint: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let host = endpoint.host_str().unwrap_or_default();
			let span = tracing::info_span!("ups_xav.call", call = kind.as_str(), stage, host);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage, endpoint);

			Self {}
		}
	}

	/// Runs `fut` inside the span; no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrumented_call_returns_inner_output() {
		let endpoint =
			Url::parse(crate::endpoint::UPS_CIE_OAUTH_URL).expect("CIE OAuth URL should parse.");
		let span = CallSpan::new(CallKind::Token, "access_token", &endpoint);

		assert_eq!(span.instrument(async { "token" }).await, "token");
	}
}
