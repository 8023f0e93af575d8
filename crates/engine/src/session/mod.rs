//! Debounce and single-flight cancellation for one collaborator call.
//!
//! A [`SearchSession`] owns two pieces of in-flight work: the armed debounce
//! timer and the request the last timer issued. Submitting again disarms the
//! timer; when the new timer fires it aborts the previous request before
//! issuing its own. Every submission is tagged with a generation, and events
//! are only handed back to the engine when they belong to the outstanding
//! generation, so a superseded result can never be applied even if it races
//! the abort.

mod generation;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use seekbox_source_api::TransportError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{self, Instant};

use self::generation::{GenerationGuard, SearchGeneration};

/// Raw progress report sent back by the session's tasks.
#[derive(Debug)]
enum SessionEvent<T> {
	/// The debounce timer fired and the request was issued.
	Started { generation: u64 },
	/// The request resolved.
	Settled {
		generation: u64,
		outcome: Result<T, TransportError>,
	},
}

/// Progress of the outstanding submission, as seen by an engine.
#[derive(Debug)]
pub enum Settlement<T> {
	/// The debounce window elapsed and the call is now in flight.
	Started,
	Resolved(T),
	Failed(TransportError),
}

/// Debounced, single-flight wrapper around one kind of collaborator call.
///
/// Tasks are spawned on the ambient tokio runtime, so submissions must happen
/// inside a runtime context.
pub struct SearchSession<T> {
	delay: Duration,
	generation: SearchGeneration,
	outstanding: Option<u64>,
	timer: Option<JoinHandle<()>>,
	in_flight: Arc<Mutex<Option<AbortHandle>>>,
	events_tx: UnboundedSender<SessionEvent<T>>,
	events_rx: UnboundedReceiver<SessionEvent<T>>,
}

impl<T> SearchSession<T> {
	fn abort_tasks(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.abort();
		}
		if let Some(request) = self.in_flight.lock().take() {
			request.abort();
		}
	}
}

impl<T: Send + 'static> SearchSession<T> {
	#[must_use]
	pub fn new(delay: Duration) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		Self {
			delay,
			generation: SearchGeneration::default(),
			outstanding: None,
			timer: None,
			in_flight: Arc::new(Mutex::new(None)),
			events_tx,
			events_rx,
		}
	}

	/// Debounce window applied by [`submit`](Self::submit).
	#[must_use]
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Whether a submission is waiting for its timer or its response.
	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.outstanding.is_some()
	}

	/// Schedule `fetch` once the debounce window has been quiet.
	///
	/// Returns the generation assigned to the submission.
	pub fn submit<F, Fut>(&mut self, fetch: F) -> u64
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
	{
		self.schedule(self.delay, fetch)
	}

	/// Issue `fetch` without waiting out the debounce window.
	pub fn submit_now<F, Fut>(&mut self, fetch: F) -> u64
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
	{
		self.schedule(Duration::ZERO, fetch)
	}

	fn schedule<F, Fut>(&mut self, delay: Duration, fetch: F) -> u64
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
	{
		if let Some(timer) = self.timer.take() {
			timer.abort();
		}

		let guard = self.generation.next();
		let generation = guard.id();
		self.outstanding = Some(generation);
		debug!("search generation {generation} armed for {delay:?}");

		let deadline = Instant::now() + delay;
		let events = self.events_tx.clone();
		let in_flight = Arc::clone(&self.in_flight);
		self.timer = Some(tokio::spawn(async move {
			if !delay.is_zero() {
				time::sleep_until(deadline).await;
			}
			if guard.is_stale() {
				return;
			}
			issue(guard, fetch, events, &in_flight);
		}));

		generation
	}

	/// Disarm the timer, abort the in-flight request and forget the
	/// outstanding submission.
	pub fn cancel(&mut self) {
		if self.outstanding.take().is_some() {
			debug!("search generation {} cancelled", self.generation.current_id());
		}
		self.generation.invalidate();
		self.abort_tasks();
	}

	/// Next event for the outstanding submission, if one is already queued.
	pub fn try_next(&mut self) -> Option<Settlement<T>> {
		loop {
			match self.events_rx.try_recv() {
				Ok(event) => {
					if let Some(settlement) = self.accept(event) {
						return Some(settlement);
					}
				}
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
			}
		}
	}

	/// Wait for the next event of the outstanding submission.
	///
	/// Returns `None` straight away when nothing is outstanding.
	pub async fn next(&mut self) -> Option<Settlement<T>> {
		while self.outstanding.is_some() {
			let event = self.events_rx.recv().await?;
			if let Some(settlement) = self.accept(event) {
				return Some(settlement);
			}
		}
		None
	}

	fn accept(&mut self, event: SessionEvent<T>) -> Option<Settlement<T>> {
		let outstanding = self.outstanding?;
		match event {
			SessionEvent::Started { generation } if generation == outstanding => {
				Some(Settlement::Started)
			}
			SessionEvent::Settled {
				generation,
				outcome,
			} if generation == outstanding => {
				self.outstanding = None;
				Some(match outcome {
					Ok(value) => Settlement::Resolved(value),
					Err(err) => Settlement::Failed(err),
				})
			}
			_ => None,
		}
	}
}

impl<T> Drop for SearchSession<T> {
	fn drop(&mut self) {
		self.abort_tasks();
	}
}

/// Abort whatever the previous timer issued, then start the request for
/// `guard`'s generation.
fn issue<T, F, Fut>(
	guard: GenerationGuard,
	fetch: F,
	events: UnboundedSender<SessionEvent<T>>,
	in_flight: &Mutex<Option<AbortHandle>>,
) where
	T: Send + 'static,
	F: FnOnce() -> Fut + Send + 'static,
	Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
{
	let mut slot = in_flight.lock();
	if let Some(previous) = slot.take() {
		previous.abort();
	}

	let generation = guard.id();
	let _ = events.send(SessionEvent::Started { generation });
	let request = tokio::spawn(async move {
		let outcome = fetch().await;
		if guard.is_stale() {
			return;
		}
		let _ = events.send(SessionEvent::Settled {
			generation,
			outcome,
		});
	});
	*slot = Some(request.abort_handle());
}
