use super::context::Order;
use crate::error::{LyricsError, Result};

/// Default cap on the number of draws of one walk.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Parameters of a [`Generator::generate`](super::generator::Generator::generate) call.
///
/// # Invariants
/// - `max_steps`, when set, is at least 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Which table to walk.
	pub order: Order,

	/// Number of extra attempts when the output reproduces a training song.
	pub nb_try: usize,

	/// Maximum number of draws before giving up. `None` walks until the end marker.
	max_steps: Option<usize>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			order: Order::default(),
			nb_try: 0,
			max_steps: Some(DEFAULT_MAX_STEPS),
		}
	}
}

impl GenerationInput {
	pub fn new(order: Order) -> Self {
		Self { order, ..Self::default() }
	}

	/// Returns the current step cap.
	pub fn max_steps(&self) -> Option<usize> {
		self.max_steps
	}

	/// Sets the step cap.
	///
	/// # Errors
	/// Returns an error for `Some(0)`: no walk could ever finish.
	pub fn set_max_steps(&mut self, max_steps: Option<usize>) -> Result<()> {
		if max_steps == Some(0) {
			return Err(LyricsError::InvalidInput("max_steps must be at least 1".to_owned()));
		}
		self.max_steps = max_steps;
		Ok(())
	}
}
