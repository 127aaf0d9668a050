//! Procedural sound effects.
//!
//! [`AudioEngine`] decides *whether* and *what* to play; an [`AudioBackend`]
//! decides *how*. Each effect is described as a [`Voice`] (a self-contained,
//! time-bounded sound graph) and handed to the output fire-and-forget.
//!
//! Browsers only allow audio after a user gesture, so the output context is
//! opened lazily by [`AudioEngine::init`]. If opening fails the engine stays
//! disabled for the rest of the session.

use log::{info, warn};

use super::particles::SimEvent;
use super::random::RandomSource;
use crate::error::CelebrationError;

const LAUNCH_FREQ: (f32, f32) = (200.0, 800.0);
const LAUNCH_GAIN: (f32, f32) = (0.1, 0.01);
const LAUNCH_SECONDS: f64 = 0.5;

const EXPLOSION_SECONDS: f64 = 2.0;
const EXPLOSION_CUTOFF_HZ: f32 = 800.0;
const EXPLOSION_GAIN: (f32, f32) = (1.0, 0.01);
const EXPLOSION_RAMP_SECONDS: f64 = 1.0;

/// A self-contained sound graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Voice {
	/// Oscillator with exponential frequency and gain ramps.
	Sweep {
		start_hz: f32,
		end_hz: f32,
		start_gain: f32,
		end_gain: f32,
		duration: f64,
	},
	/// Mono sample buffer through a low-pass filter with an exponential
	/// gain ramp over `ramp`; the source stops after `duration`.
	Noise {
		samples: Vec<f32>,
		sample_rate: f32,
		cutoff_hz: f32,
		start_gain: f32,
		end_gain: f32,
		ramp: f64,
		duration: f64,
	},
}

/// An open output context.
pub trait AudioOutput {
	fn sample_rate(&self) -> f32;
	fn is_suspended(&self) -> bool;
	fn resume(&self) -> Result<(), CelebrationError>;
	/// Start `voice` now; it tears itself down when finished.
	fn play(&self, voice: &Voice) -> Result<(), CelebrationError>;
}

/// Opens output contexts.
pub trait AudioBackend {
	type Output: AudioOutput;
	fn open(&mut self) -> Result<Self::Output, CelebrationError>;
}

enum ContextState<O> {
	/// No gesture seen yet.
	Closed,
	Open(O),
	/// Opening failed once; never retried.
	Unavailable,
}

/// Lazily initialised procedural audio.
pub struct AudioEngine<B: AudioBackend, R> {
	backend: B,
	context: ContextState<B::Output>,
	enabled: bool,
	rng: R,
}

impl<B: AudioBackend, R: RandomSource> AudioEngine<B, R> {
	pub fn new(backend: B, rng: R) -> Self {
		Self {
			backend,
			context: ContextState::Closed,
			enabled: false,
			rng,
		}
	}

	/// Open the context on first call; resume it if the browser suspended it.
	pub fn init(&mut self) {
		if let ContextState::Open(output) = &self.context {
			if output.is_suspended() {
				if let Err(e) = output.resume() {
					warn!("celebration: resume failed: {}", e);
				}
			}
			return;
		}
		if matches!(self.context, ContextState::Unavailable) {
			return;
		}
		match self.backend.open() {
			Ok(output) => {
				info!("celebration: audio context opened at {} Hz", output.sample_rate());
				self.context = ContextState::Open(output);
				self.enabled = true;
			}
			Err(e) => {
				warn!("celebration: {}", e);
				self.context = ContextState::Unavailable;
				self.enabled = false;
			}
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Whether the output context has been opened.
	pub fn has_context(&self) -> bool {
		matches!(self.context, ContextState::Open(_))
	}

	/// Mute or unmute without touching the context. Ignored once audio has
	/// proven unavailable.
	pub fn set_enabled(&mut self, enabled: bool) {
		if matches!(self.context, ContextState::Unavailable) {
			return;
		}
		self.enabled = enabled;
	}

	/// Flips the mute state and returns the new `enabled` value.
	pub fn toggle_mute(&mut self) -> bool {
		self.set_enabled(!self.enabled);
		self.enabled
	}

	fn output(&self) -> Option<&B::Output> {
		match &self.context {
			ContextState::Open(output) if self.enabled => Some(output),
			_ => None,
		}
	}

	fn play(&self, voice: &Voice) {
		if let Some(output) = self.output() {
			if let Err(e) = output.play(voice) {
				warn!("celebration: {}", e);
			}
		}
	}

	/// Rising whistle for a launch.
	pub fn play_launch(&mut self) {
		if self.output().is_none() {
			return;
		}
		self.play(&Voice::Sweep {
			start_hz: LAUNCH_FREQ.0,
			end_hz: LAUNCH_FREQ.1,
			start_gain: LAUNCH_GAIN.0,
			end_gain: LAUNCH_GAIN.1,
			duration: LAUNCH_SECONDS,
		});
	}

	/// Filtered white-noise boom for an explosion.
	pub fn play_explosion(&mut self) {
		let Some(sample_rate) = self.output().map(|o| o.sample_rate()) else {
			return;
		};
		let len = (sample_rate as f64 * EXPLOSION_SECONDS) as usize;
		let samples = (0..len)
			.map(|_| (self.rng.next() * 2.0 - 1.0) as f32)
			.collect();
		self.play(&Voice::Noise {
			samples,
			sample_rate,
			cutoff_hz: EXPLOSION_CUTOFF_HZ,
			start_gain: EXPLOSION_GAIN.0,
			end_gain: EXPLOSION_GAIN.1,
			ramp: EXPLOSION_RAMP_SECONDS,
			duration: EXPLOSION_SECONDS,
		});
	}

	/// Plays the sound matching a simulation event.
	pub fn handle(&mut self, event: &SimEvent) {
		match event {
			SimEvent::Launched { .. } => self.play_launch(),
			SimEvent::Exploded { .. } => self.play_explosion(),
		}
	}
}
