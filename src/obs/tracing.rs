// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation kind and profile.
	pub fn new(kind: OperationKind, profile: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_bearer_client.operation", operation = kind.as_str(), profile);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, profile);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

/// Emits a warning for a failed token exchange.
pub fn authentication_failed(profile: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(profile, error = %error, "authentication failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (profile, error);
	}
}

/// Emits a debug event once a new session replaces the previous one.
pub fn session_stored(profile: &str, has_refresh_token: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(profile, has_refresh_token, "session stored");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (profile, has_refresh_token);
	}
}

/// Emits an info event when a 401 sends a request through re-authentication.
pub fn retrying_unauthorized(profile: &str, method: &Method, endpoint: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(profile, %method, endpoint, "request unauthorized; re-authenticating once");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (profile, method, endpoint);
	}
}
