//! Named random streams.
//!
//! Gameplay code never draws from a process-wide generator. Every draw names the
//! stream it consumes ([`RandSync`]), so that a host and its clients, seeded with the
//! same value and consuming the same streams in the same order, observe identical
//! results. Draws meant only for local cosmetics go to [`RandSync::Unsynced`] and
//! never perturb the shared sequence.
//!
//! # Key types
//!
//! | Type | Role |
//! |------|------|
//! | [`RandSync`] | Token naming one stream. |
//! | [`RandomStreams`] | Provider contract consumed by selectors. |
//! | [`SeededStreams`] | `ChaCha8`-backed provider, one generator per token. |
//! | [`ScriptedStreams`] | Replays a recorded sequence of unit draws. |

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;


/// Identifies which random sequence a draw consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RandSync {
	/// Local-only stream; results may differ between peers.
	Unsynced,
	/// Stream seeded identically on the server and every client.
	ServerAndClient,
	/// Server-authoritative stream; clients never consume it.
	Server,
}

impl RandSync {
	/// All stream tokens in stream-number order.
	pub const ALL: [RandSync; 3] = [Self::Unsynced, Self::ServerAndClient, Self::Server];

	/// ChaCha stream number backing this token.
	const fn stream_number(self) -> u64 {
		match self {
			Self::Unsynced => 0,
			Self::ServerAndClient => 1,
			Self::Server => 2,
		}
	}

	/// Returns true for streams whose state must match across peers.
	pub const fn is_synced(self) -> bool {
		!matches!(self, Self::Unsynced)
	}
}

impl std::fmt::Display for RandSync {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unsynced => write!(f, "unsynced"),
			Self::ServerAndClient => write!(f, "server_and_client"),
			Self::Server => write!(f, "server"),
		}
	}
}

/// Source of uniform draws, one monotonically-advancing sequence per [`RandSync`].
///
/// Consumers must not reseed or inspect the state behind a token; they only draw.
pub trait RandomStreams {
	/// Draws a uniform value in `[0, 1)` from `stream`.
	fn next_unit(&mut self, stream: RandSync) -> f64;

	/// Draws a uniform value in `[min, max)`. Returns `min` for empty ranges.
	fn range_f64(&mut self, min: f64, max: f64, stream: RandSync) -> f64 {
		let unit = self.next_unit(stream);
		if max <= min {
			return min;
		}
		min + unit * (max - min)
	}

	/// Draws a uniform integer in `[min, max)`. Returns `min` for empty ranges.
	fn range_i32(&mut self, min: i32, max: i32, stream: RandSync) -> i32 {
		let unit = self.next_unit(stream);
		if max <= min {
			return min;
		}
		let span = i64::from(max) - i64::from(min);
		let offset = ((unit * span as f64) as i64).min(span - 1);
		(i64::from(min) + offset) as i32
	}
}

impl<R: RandomStreams + ?Sized> RandomStreams for &mut R {
	fn next_unit(&mut self, stream: RandSync) -> f64 {
		(**self).next_unit(stream)
	}
}

/// Seed-derived streams backed by one [`ChaCha8Rng`] per token.
///
/// All generators share the seed and differ by ChaCha stream number, so the
/// sequences are independent while remaining reproducible from a single `u64`.
#[derive(Debug, Clone)]
pub struct SeededStreams {
	seed: u64,
	generators: [ChaCha8Rng; 3],
}

impl SeededStreams {
	/// Creates streams derived from `seed`.
	pub fn new(seed: u64) -> Self {
		Self {
			seed,
			generators: RandSync::ALL.map(|token| Self::generator(seed, token)),
		}
	}

	fn generator(seed: u64, token: RandSync) -> ChaCha8Rng {
		let mut rng = ChaCha8Rng::seed_from_u64(seed);
		rng.set_stream(token.stream_number());
		rng
	}

	/// Seed the synced streams were last derived from.
	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// Reseeds the synced streams, leaving [`RandSync::Unsynced`] untouched.
	///
	/// This is the operation a server performs when it broadcasts a new round seed.
	pub fn set_sync_seed(&mut self, seed: u64) {
		self.seed = seed;
		for token in RandSync::ALL.into_iter().filter(|t| t.is_synced()) {
			self.generators[token.stream_number() as usize] = Self::generator(seed, token);
		}
	}
}

impl RandomStreams for SeededStreams {
	fn next_unit(&mut self, stream: RandSync) -> f64 {
		self.generators[stream.stream_number() as usize].random::<f64>()
	}
}

/// Replays a fixed sequence of unit draws, regardless of token.
///
/// Used to reproduce a recorded session or to pin a draw in tests. Values are
/// clamped into `[0, 1)`; once the script is exhausted every draw yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStreams {
	draws: VecDeque<f64>,
	consumed: usize,
}

impl ScriptedStreams {
	/// Creates a script from recorded unit draws.
	pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
		Self {
			draws: draws.into_iter().collect(),
			consumed: 0,
		}
	}

	/// Number of draws taken so far.
	pub fn consumed(&self) -> usize {
		self.consumed
	}

	/// Number of recorded draws not yet taken.
	pub fn remaining(&self) -> usize {
		self.draws.len()
	}
}

impl RandomStreams for ScriptedStreams {
	fn next_unit(&mut self, _stream: RandSync) -> f64 {
		self.consumed += 1;
		let raw = self.draws.pop_front().unwrap_or(0.0);
		if raw.is_nan() {
			return 0.0;
		}
		raw.clamp(0.0, 1.0 - f64::EPSILON)
	}
}
