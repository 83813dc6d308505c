//! Session-expiry notifications.
//!
//! The client never navigates anywhere itself. When stored credentials cannot be renewed it
//! clears the token store and hands a [`LoginRedirect`] to every registered
//! [`SessionObserver`]; the embedding application decides how to send the user there.

// self
use crate::_prelude::*;

/// Navigation target handed to observers when the session ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRedirect {
	/// In-app path of the login entry point.
	pub location: String,
}

/// Callback notified when the session can no longer be renewed.
pub trait SessionObserver
where
	Self: Send + Sync,
{
	/// Called once per expired request, after the token store has been cleared.
	fn session_expired(&self, redirect: &LoginRedirect);
}
impl<F> SessionObserver for F
where
	F: Fn(&LoginRedirect) + Send + Sync,
{
	fn session_expired(&self, redirect: &LoginRedirect) {
		self(redirect)
	}
}

/// Observer that remembers every redirect it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver(Mutex<Vec<LoginRedirect>>);
impl RecordingObserver {
	/// Returns the redirects received so far.
	pub fn redirects(&self) -> Vec<LoginRedirect> {
		self.0.lock().clone()
	}

	/// Number of redirects received so far.
	pub fn count(&self) -> usize {
		self.0.lock().len()
	}
}
impl SessionObserver for RecordingObserver {
	fn session_expired(&self, redirect: &LoginRedirect) {
		self.0.lock().push(redirect.clone());
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[test]
	fn closures_are_observers() {
		let hits = Arc::new(AtomicUsize::new(0));
		let seen = hits.clone();
		let observer: Arc<dyn SessionObserver> = Arc::new(move |redirect: &LoginRedirect| {
			assert_eq!(redirect.location, "/auth/login");
			seen.fetch_add(1, Ordering::Relaxed);
		});

		observer.session_expired(&LoginRedirect { location: "/auth/login".into() });

		assert_eq!(hits.load(Ordering::Relaxed), 1);
	}

	#[test]
	fn recording_observer_keeps_history() {
		let observer = RecordingObserver::default();

		observer.session_expired(&LoginRedirect { location: "/a".into() });
		observer.session_expired(&LoginRedirect { location: "/b".into() });

		assert_eq!(observer.count(), 2);
		assert_eq!(observer.redirects()[1].location, "/b");
	}
}
