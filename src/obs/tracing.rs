// self
use crate::{_prelude::*, api::Endpoint};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided endpoint + stage.
	pub fn new(endpoint: Endpoint, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("amp_client.call", endpoint = endpoint.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (endpoint, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warn event when the throttle window denies a call.
pub fn warn_throttled(endpoint: Endpoint, reset_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			endpoint = endpoint.as_str(),
			reset_at = %reset_at,
			"Rate limit exceeded; call was not sent."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, reset_at);
	}
}

/// Emits a warn event when requests are signed with the unconfigured placeholder secret.
pub fn warn_placeholder_secret() {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!("Signing requests with the placeholder secret; configure AppSecret.");
	}
}

/// Emits a warn event when the configuration file is absent and defaults apply.
pub fn warn_config_missing(path: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(path, "Configuration file not found; using defaults.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = path;
	}
}
