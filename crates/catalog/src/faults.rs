//! Simulated transport behaviour for the in-memory directories.

use std::time::Duration;

use seekbox_source_api::TransportError;

/// Latency and failure applied to every call of a directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Faults {
	latency: Duration,
	failure: Option<TransportError>,
}

impl Faults {
	#[must_use]
	pub fn none() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	/// Make every call fail with `err` after the latency.
	#[must_use]
	pub fn failing(mut self, err: TransportError) -> Self {
		self.failure = Some(err);
		self
	}

	#[must_use]
	pub fn latency(&self) -> Duration {
		self.latency
	}

	pub(crate) async fn inject(&self) -> Result<(), TransportError> {
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		match &self.failure {
			Some(err) => Err(err.clone()),
			None => Ok(()),
		}
	}
}
