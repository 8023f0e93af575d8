use thiserror::Error;

/// Failure reported by a collaborator call.
///
/// Cancellation is deliberately absent: a superseded request simply never
/// settles, so engines have nothing to log or surface for it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
	/// The remote side answered with a non-success status.
	#[error("request failed with status {status}")]
	Status {
		status: u16,
		/// Human readable explanation supplied by the server, if any.
		detail: Option<String>,
	},

	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// The response arrived but could not be understood.
	#[error("malformed response: {0}")]
	Decode(String),
}

impl TransportError {
	/// Server-provided explanation suitable for showing to a user.
	#[must_use]
	pub fn detail(&self) -> Option<&str> {
		match self {
			Self::Status { detail, .. } => detail.as_deref(),
			Self::Network(_) | Self::Decode(_) => None,
		}
	}
}
