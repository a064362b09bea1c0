//! Idempotent session-invalidation latch shared between the gateway and the manager.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::_prelude::*;

type Listener = Box<dyn Fn() + Send + Sync>;

/// Broadcast latch tripped by the gateway on authorization failure.
///
/// Multiple concurrent 401s within one armed period collapse to a single trip:
/// [`trip`](Self::trip) returns `true` for exactly one caller, which owns the
/// at-most-once side effects (notification, redirect). Listeners registered via
/// [`subscribe`](Self::subscribe) run on that first trip only. The session manager
/// re-arms the latch on every transition into the authenticated state.
#[derive(Default)]
pub struct InvalidationSignal {
	latched: AtomicBool,
	listeners: Mutex<Vec<Listener>>,
}
impl InvalidationSignal {
	/// Registers a listener invoked on the first trip of each armed period.
	pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) {
		self.listeners.lock().push(Box::new(listener));
	}

	/// Trips the latch. Returns `true` for the single caller that won the transition;
	/// that caller's listeners have already run by the time `trip` returns.
	pub fn trip(&self) -> bool {
		if self.latched.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err()
		{
			return false;
		}

		for listener in self.listeners.lock().iter() {
			listener();
		}

		true
	}

	/// Re-arms the latch so a future authorization failure can trip it again.
	pub fn rearm(&self) {
		self.latched.store(false, Ordering::Release);
	}

	/// Returns `true` while the latch is tripped.
	pub fn is_tripped(&self) -> bool {
		self.latched.load(Ordering::Acquire)
	}
}
impl Debug for InvalidationSignal {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("InvalidationSignal")
			.field("latched", &self.is_tripped())
			.field("listeners", &self.listeners.lock().len())
			.finish()
	}
}
