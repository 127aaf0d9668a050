//! Uniform random sources shared by every stochastic element.
//!
//! Simulation, launch scheduling, and noise synthesis all draw through
//! [`RandomSource`], so a test can swap in [`SeededRandom`] or
//! [`SequenceRandom`] and assert exact trajectories.

use web_sys::Crypto;

/// A generator of independent uniform draws in `[0, 1)`.
pub trait RandomSource {
	/// Next uniform value in `[0, 1)`.
	fn next(&mut self) -> f64;

	/// Uniform value in `[min, max)`.
	fn range(&mut self, min: f64, max: f64) -> f64 {
		min + self.next() * (max - min)
	}

	/// Bernoulli trial succeeding with probability `p`.
	fn chance(&mut self, p: f64) -> bool {
		self.next() < p
	}

	/// Uniform pick from a non-empty slice.
	fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T
	where
		Self: Sized,
	{
		let idx = (self.next() * items.len() as f64) as usize;
		&items[idx.min(items.len() - 1)]
	}
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
	fn next(&mut self) -> f64 {
		(**self).next()
	}
}

/// Maps the top 53 bits of a `u64` onto `[0, 1)`.
fn unit_from_bits(bits: u64) -> f64 {
	(bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Fast deterministic generator, seedable for reproducible runs.
pub struct SeededRandom {
	rng: fastrand::Rng,
}

impl SeededRandom {
	pub fn new(seed: u64) -> Self {
		Self {
			rng: fastrand::Rng::with_seed(seed),
		}
	}
}

impl RandomSource for SeededRandom {
	fn next(&mut self) -> f64 {
		self.rng.f64()
	}
}

/// Cycles through a fixed list of values. Handy for pinning exact draws.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
	values: Vec<f64>,
	cursor: usize,
}

impl SequenceRandom {
	/// Values are clamped into `[0, 1)`; an empty list yields a constant `0.0`.
	pub fn new(values: impl Into<Vec<f64>>) -> Self {
		let mut values: Vec<f64> = values.into();
		for v in &mut values {
			*v = v.clamp(0.0, 1.0 - f64::EPSILON);
		}
		if values.is_empty() {
			values.push(0.0);
		}
		Self { values, cursor: 0 }
	}

	/// A source that always returns `value`.
	pub fn constant(value: f64) -> Self {
		Self::new(vec![value])
	}
}

impl RandomSource for SequenceRandom {
	fn next(&mut self) -> f64 {
		let v = self.values[self.cursor];
		self.cursor = (self.cursor + 1) % self.values.len();
		v
	}
}

/// Number of `u64` words fetched per `getRandomValues` call.
const CRYPTO_BATCH: usize = 64;

/// Browser `crypto.getRandomValues` backed source.
///
/// Values are fetched in batches to keep the per-draw JS boundary cost low.
pub struct CryptoRandom {
	crypto: Crypto,
	buf: [u8; CRYPTO_BATCH * 8],
	cursor: usize,
}

impl CryptoRandom {
	/// Returns `None` when the page has no `window.crypto`.
	pub fn from_window() -> Option<Self> {
		let crypto = web_sys::window()?.crypto().ok()?;
		let mut source = Self {
			crypto,
			buf: [0; CRYPTO_BATCH * 8],
			cursor: CRYPTO_BATCH,
		};
		source.refill().then_some(source)
	}

	fn refill(&mut self) -> bool {
		self.cursor = 0;
		self.crypto
			.get_random_values_with_u8_array(&mut self.buf)
			.is_ok()
	}
}

impl RandomSource for CryptoRandom {
	fn next(&mut self) -> f64 {
		if self.cursor >= CRYPTO_BATCH && !self.refill() {
			log::warn!("celebration: getRandomValues failed, reusing last batch");
		}
		let start = self.cursor * 8;
		let mut word = [0u8; 8];
		word.copy_from_slice(&self.buf[start..start + 8]);
		self.cursor += 1;
		unit_from_bits(u64::from_le_bytes(word))
	}
}
