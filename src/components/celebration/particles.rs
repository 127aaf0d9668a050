//! Particle system driving the celebration display.
//!
//! Owns the ambient glitter pool, rising fireworks, and explosion debris.
//! One [`ParticleSystem::tick`] call is one animation frame: fade, update,
//! draw, then maybe auto-launch. Sound is never played from here; launches
//! and explosions come back to the caller as [`SimEvent`]s.

use log::debug;

use super::clock::Mode;
use super::entities::{AmbientParticle, Bounds, Firework, Layer, Particle, Vec2};
use super::random::RandomSource;
use super::render::{Layers, Surface};
use super::theme::Theme;

/// Default ambient pool size.
pub const DEFAULT_AMBIENT_COUNT: usize = 100;
/// Default per-frame auto-launch probability during the celebration.
pub const DEFAULT_FIREWORKS_CHANCE: f64 = 0.05;

/// Side effects requested by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
	/// A firework left the ground.
	Launched { x: f64, layer: Layer },
	/// A firework burst into `particles` pieces.
	Exploded {
		x: f64,
		y: f64,
		size_factor: f64,
		particles: usize,
	},
}

/// Environment preferences that gate automatic behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionPolicy {
	pub allow_auto_launch: bool,
}

impl Default for MotionPolicy {
	fn default() -> Self {
		Self {
			allow_auto_launch: true,
		}
	}
}

impl MotionPolicy {
	pub fn from_reduced_motion(reduced: bool) -> Self {
		Self {
			allow_auto_launch: !reduced,
		}
	}
}

/// Tunables for a [`ParticleSystem`].
#[derive(Clone, Debug)]
pub struct ParticleSettings {
	pub ambient_count: usize,
	pub fireworks_chance: f64,
	/// Whether fireworks may be assigned to the foreground layer.
	pub foreground: bool,
}

impl Default for ParticleSettings {
	fn default() -> Self {
		Self {
			ambient_count: DEFAULT_AMBIENT_COUNT,
			fireworks_chance: DEFAULT_FIREWORKS_CHANCE,
			foreground: false,
		}
	}
}

/// Manages every entity on screen.
pub struct ParticleSystem<R> {
	pub ambient: Vec<AmbientParticle>,
	pub fireworks: Vec<Firework>,
	pub particles: Vec<Particle>,
	bounds: Bounds,
	theme: Theme,
	settings: ParticleSettings,
	rng: R,
}

impl<R: RandomSource> ParticleSystem<R> {
	pub fn new(theme: Theme, settings: ParticleSettings, width: f64, height: f64, rng: R) -> Self {
		let mut system = Self {
			ambient: Vec::with_capacity(settings.ambient_count),
			fireworks: Vec::new(),
			particles: Vec::new(),
			bounds: Bounds { width, height },
			theme,
			settings,
			rng,
		};
		system.populate_ambient();
		system
	}

	fn populate_ambient(&mut self) {
		self.ambient.clear();
		for _ in 0..self.settings.ambient_count {
			let p = AmbientParticle::new(self.bounds, &self.theme.palette, &mut self.rng);
			self.ambient.push(p);
		}
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Adopt new bounds and rebuild the ambient pool from scratch.
	///
	/// In-flight fireworks and debris keep their coordinates.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds { width, height };
		self.populate_ambient();
	}

	/// Launch one firework from the bottom edge.
	///
	/// `x` defaults to a random horizontal position. The apex lands somewhere
	/// in the upper half of the screen.
	pub fn launch_firework(&mut self, x: Option<f64>) -> SimEvent {
		let x = x.unwrap_or_else(|| self.rng.next() * self.bounds.width);
		let target_y = self.rng.next() * (self.bounds.height / 2.0);
		let color = *self.rng.pick(&self.theme.palette.colors);
		let layer = if self.settings.foreground && self.rng.chance(0.5) {
			Layer::Foreground
		} else {
			Layer::Background
		};
		let fw = Firework::new(
			Vec2::new(x, self.bounds.height),
			target_y,
			color,
			layer,
			&mut self.rng,
		);
		debug!("celebration: launch at x={:.0} apex={:.0} {:?}", x, target_y, layer);
		self.fireworks.push(fw);
		SimEvent::Launched { x, layer }
	}

	/// Advance and draw one frame.
	pub fn tick<S: Surface>(
		&mut self,
		layers: &mut Layers<S>,
		pointer: Vec2,
		mode: Mode,
		policy: MotionPolicy,
	) -> Vec<SimEvent> {
		let mut events = Vec::new();

		layers.fade(self.theme.background.color, self.theme.background.trail_fade);

		for p in &mut self.ambient {
			p.update(pointer, self.bounds, &self.theme.palette, &mut self.rng);
			p.draw(&mut layers.background);
		}

		self.fireworks.retain_mut(|fw| match fw.update(&mut self.rng) {
			Some(burst) => {
				events.push(SimEvent::Exploded {
					x: burst.pos.x,
					y: burst.pos.y,
					size_factor: burst.size_factor,
					particles: burst.particles.len(),
				});
				self.particles.extend(burst.particles);
				false
			}
			None => {
				fw.draw(layers.target(fw.layer));
				true
			}
		});

		self.particles.retain_mut(|p| {
			let alive = p.update();
			if alive {
				p.draw(layers.target(p.layer));
			}
			alive
		});

		if mode == Mode::Celebration
			&& policy.allow_auto_launch
			&& self.rng.chance(self.settings.fireworks_chance)
		{
			events.push(self.launch_firework(None));
		}

		events
	}
}
