//! Optional observability for session flows.
//!
//! Every session operation runs inside an *observation bracket*: one attempt is
//! recorded on entry and a terminal success/failure outcome on exit, with the whole
//! operation traced under a `session_gate.flow` span carrying the `flow` field.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit the `session_gate.flow` spans.
//! - Enable `metrics` to increment the `session_gate_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `session_gate_store_fault_total` counter for degraded store operations.

// self
use crate::{_prelude::*, store::StoreError};

/// Session operations observed by this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionFlow {
	/// Credential-issuing login call.
	Login,
	/// Credential-issuing registration call.
	Register,
	/// Startup credential validation.
	Bootstrap,
	/// Local session teardown plus best-effort backend hint.
	Logout,
}
impl SessionFlow {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionFlow::Login => "login",
			SessionFlow::Register => "register",
			SessionFlow::Bootstrap => "bootstrap",
			SessionFlow::Logout => "logout",
		}
	}
}
impl Display for SessionFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a session operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Drives an async session operation through its observation bracket, taking the
/// terminal outcome from the operation's result.
pub async fn observe_flow<T, Fut>(flow: SessionFlow, operation: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_flow_outcome(flow, FlowOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let operation = {
		use tracing::Instrument;

		operation.instrument(tracing::info_span!("session_gate.flow", flow = flow.as_str()))
	};

	let result = operation.await;

	match &result {
		Ok(_) => record_flow_outcome(flow, FlowOutcome::Success),
		Err(_) => record_flow_outcome(flow, FlowOutcome::Failure),
	}

	result
}

/// Observation bracket for synchronous sections (the local half of logout); the
/// section cannot fail, so completion always counts as a success.
pub fn observe_local<T>(flow: SessionFlow, section: impl FnOnce() -> T) -> T {
	record_flow_outcome(flow, FlowOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let _span = tracing::info_span!("session_gate.flow", flow = flow.as_str()).entered();

	let value = section();

	record_flow_outcome(flow, FlowOutcome::Success);

	value
}

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(flow: SessionFlow, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"session_gate_flow_total",
			"flow" => flow.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (flow, outcome);
	}
}

/// Records a degraded credential-store operation; the store itself stays silent toward
/// its callers per the degrade-never-throw contract.
pub fn record_store_fault(op: &'static str, error: &StoreError) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("session_gate_store_fault_total", "op" => op).increment(1);
	}
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(op, %error, "Credential store operation degraded to in-memory only.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = op;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn observe_flow_passes_the_result_through() {
		let value = observe_flow(SessionFlow::Login, async { Ok(7_u8) })
			.await
			.expect("Bracketed success should pass through.");

		assert_eq!(value, 7);

		let result =
			observe_flow::<u8, _>(SessionFlow::Login, async { Err(Error::SessionExpired) }).await;

		assert!(matches!(result, Err(Error::SessionExpired)));
	}

	#[test]
	fn observe_local_returns_the_section_value() {
		assert_eq!(observe_local(SessionFlow::Logout, || 3), 3);
	}

	#[test]
	fn record_store_fault_noop_without_metrics() {
		record_store_fault("save", &StoreError::Backend { message: "disk full".into() });
	}
}
