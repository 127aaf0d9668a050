//! Simulation entities: ambient glitter, rising fireworks, explosion debris.
//!
//! Every entity advances by one frame per `update` call; velocities are in
//! pixels per frame. Nothing here touches audio or the DOM. Fireworks report
//! their explosion as a [`Burst`] and the owning system turns it into events.

use std::f64::consts::TAU;

use super::random::RandomSource;
use super::render::Surface;
use super::theme::{Color, Palette};

/// Pointer repulsion radius for ambient particles.
pub const POINTER_RADIUS: f64 = 150.0;
/// Peak displacement per frame at the pointer's center.
pub const POINTER_FORCE: f64 = 2.0;

const AMBIENT_MAX_SPEED: f64 = 0.25;
const AMBIENT_SIZE: (f64, f64) = (0.5, 2.5);
const AMBIENT_OPACITY: (f64, f64) = (0.1, 0.6);
const AMBIENT_LIFE: (f64, f64) = (100.0, 200.0);

/// Per-axis velocity retained each frame (air resistance).
pub const PARTICLE_DRAG: f64 = 0.95;
pub const PARTICLE_GRAVITY: f64 = 0.05;
const PARTICLE_RADIUS: f64 = 2.0;
const PARTICLE_SPEED: (f64, f64) = (1.0, 6.0);
const PARTICLE_DECAY: (f64, f64) = (0.005, 0.02);

pub const FIREWORK_GRAVITY: f64 = 0.1;
const FIREWORK_RADIUS: f64 = 3.0;
const FIREWORK_DRIFT: (f64, f64) = (-1.0, 1.0);
const FIREWORK_LIFT: (f64, f64) = (-11.0, -8.0);
/// Accumulated `+0.1` steps land a hair below zero at the true apex.
const APEX_TOLERANCE: f64 = 1e-9;

/// Particles per burst at size factor 1.0.
pub const BURST_PARTICLES: f64 = 50.0;
/// Size factor range; strictly positive so decay division is safe.
pub const SIZE_FACTOR: (f64, f64) = (0.5, 1.5);

/// 2D position or velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	/// Pointer position used when no pointer is over the page.
	pub const OFFSCREEN: Vec2 = Vec2 {
		x: -10_000.0,
		y: -10_000.0,
	};

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Drawing area in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

/// Which stacked surface an entity renders onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layer {
	#[default]
	Background,
	Foreground,
}

/// Background glitter point. Lives in a fixed pool and is reset in place.
#[derive(Clone, Debug)]
pub struct AmbientParticle {
	pub pos: Vec2,
	pub vel: Vec2,
	pub size: f64,
	pub color: Color,
	pub opacity: f64,
	/// Frames left before the particle is re-randomized.
	pub life: f64,
}

impl AmbientParticle {
	pub fn new(bounds: Bounds, palette: &Palette, rng: &mut impl RandomSource) -> Self {
		let mut p = Self {
			pos: Vec2::default(),
			vel: Vec2::default(),
			size: 0.0,
			color: palette.colors[0],
			opacity: 0.0,
			life: 0.0,
		};
		p.reset(bounds, palette, rng);
		p
	}

	pub fn reset(&mut self, bounds: Bounds, palette: &Palette, rng: &mut impl RandomSource) {
		self.pos = Vec2::new(rng.next() * bounds.width, rng.next() * bounds.height);
		self.vel = Vec2::new(
			rng.range(-AMBIENT_MAX_SPEED, AMBIENT_MAX_SPEED),
			rng.range(-AMBIENT_MAX_SPEED, AMBIENT_MAX_SPEED),
		);
		self.size = rng.range(AMBIENT_SIZE.0, AMBIENT_SIZE.1);
		self.color = *rng.pick(&palette.colors);
		self.opacity = rng.range(AMBIENT_OPACITY.0, AMBIENT_OPACITY.1);
		self.life = rng.range(AMBIENT_LIFE.0, AMBIENT_LIFE.1);
	}

	pub fn update(
		&mut self,
		pointer: Vec2,
		bounds: Bounds,
		palette: &Palette,
		rng: &mut impl RandomSource,
	) {
		self.pos.x += self.vel.x;
		self.pos.y += self.vel.y;
		self.life -= 1.0;

		let (dx, dy) = (self.pos.x - pointer.x, self.pos.y - pointer.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < POINTER_RADIUS {
			let angle = dy.atan2(dx);
			let push = (POINTER_RADIUS - dist) / POINTER_RADIUS * POINTER_FORCE;
			self.pos.x += angle.cos() * push;
			self.pos.y += angle.sin() * push;
		}

		// Toroidal wrap: exits snap to the opposite edge
		if self.pos.x < 0.0 {
			self.pos.x = bounds.width;
		} else if self.pos.x > bounds.width {
			self.pos.x = 0.0;
		}
		if self.pos.y < 0.0 {
			self.pos.y = bounds.height;
		} else if self.pos.y > bounds.height {
			self.pos.y = 0.0;
		}

		if self.life <= 0.0 {
			self.reset(bounds, palette, rng);
		}
	}

	pub fn draw(&self, surface: &mut impl Surface) {
		surface.fill_circle(
			self.pos.x,
			self.pos.y,
			self.size,
			self.color.with_alpha(self.opacity),
		);
	}
}

/// Explosion debris.
#[derive(Clone, Debug)]
pub struct Particle {
	pub pos: Vec2,
	pub vel: Vec2,
	pub color: Color,
	pub alpha: f64,
	/// Alpha lost per frame.
	pub decay: f64,
	pub gravity: f64,
	pub layer: Layer,
}

impl Particle {
	/// Random direction; speed scales with and decay inversely with `size_factor`.
	pub fn new(
		pos: Vec2,
		color: Color,
		layer: Layer,
		size_factor: f64,
		rng: &mut impl RandomSource,
	) -> Self {
		let angle = rng.next() * TAU;
		let speed = rng.range(PARTICLE_SPEED.0, PARTICLE_SPEED.1) * size_factor;
		let decay = rng.range(PARTICLE_DECAY.0, PARTICLE_DECAY.1) / size_factor;
		Self {
			pos,
			vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
			color,
			alpha: 1.0,
			decay,
			gravity: PARTICLE_GRAVITY,
			layer,
		}
	}

	/// Advances one frame. Returns whether the particle is still visible.
	pub fn update(&mut self) -> bool {
		self.vel.x *= PARTICLE_DRAG;
		self.vel.y *= PARTICLE_DRAG;
		self.vel.y += self.gravity;
		self.pos.x += self.vel.x;
		self.pos.y += self.vel.y;
		self.alpha -= self.decay;
		self.alpha > 0.0
	}

	pub fn draw(&self, surface: &mut impl Surface) {
		surface.fill_circle(
			self.pos.x,
			self.pos.y,
			PARTICLE_RADIUS,
			self.color.with_alpha(self.alpha),
		);
	}
}

/// Debris produced by one explosion.
#[derive(Clone, Debug)]
pub struct Burst {
	pub pos: Vec2,
	pub layer: Layer,
	pub size_factor: f64,
	pub particles: Vec<Particle>,
}

/// Rising projectile.
#[derive(Clone, Debug)]
pub struct Firework {
	pub pos: Vec2,
	pub vel: Vec2,
	/// Explodes once `pos.y` climbs to this height.
	pub target_y: f64,
	pub color: Color,
	pub layer: Layer,
	pub exploded: bool,
}

impl Firework {
	pub fn new(
		pos: Vec2,
		target_y: f64,
		color: Color,
		layer: Layer,
		rng: &mut impl RandomSource,
	) -> Self {
		let vel = Vec2::new(
			rng.range(FIREWORK_DRIFT.0, FIREWORK_DRIFT.1),
			rng.range(FIREWORK_LIFT.0, FIREWORK_LIFT.1),
		);
		Self {
			pos,
			vel,
			target_y,
			color,
			layer,
			exploded: false,
		}
	}

	/// Advances one frame; returns the burst on the frame the shell explodes.
	pub fn update(&mut self, rng: &mut impl RandomSource) -> Option<Burst> {
		if self.exploded {
			return None;
		}
		self.pos.x += self.vel.x;
		self.vel.y += FIREWORK_GRAVITY;
		self.pos.y += self.vel.y;

		if self.vel.y >= -APEX_TOLERANCE || self.pos.y <= self.target_y {
			Some(self.explode(rng))
		} else {
			None
		}
	}

	pub fn explode(&mut self, rng: &mut impl RandomSource) -> Burst {
		self.exploded = true;
		let size_factor = rng.range(SIZE_FACTOR.0, SIZE_FACTOR.1);
		let count = (BURST_PARTICLES * size_factor).floor() as usize;
		let particles = (0..count)
			.map(|_| Particle::new(self.pos, self.color, self.layer, size_factor, rng))
			.collect();
		Burst {
			pos: self.pos,
			layer: self.layer,
			size_factor,
			particles,
		}
	}

	pub fn draw(&self, surface: &mut impl Surface) {
		surface.fill_circle(self.pos.x, self.pos.y, FIREWORK_RADIUS, self.color);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::celebration::random::{SeededRandom, SequenceRandom};

	const BOUNDS: Bounds = Bounds {
		width: 800.0,
		height: 600.0,
	};

	fn still_ambient() -> AmbientParticle {
		AmbientParticle {
			pos: Vec2::new(400.0, 300.0),
			vel: Vec2::default(),
			size: 1.0,
			color: Color::rgb(255, 255, 255),
			opacity: 0.5,
			life: 150.0,
		}
	}

	#[test]
	fn ambient_reset_stays_in_ranges() {
		let palette = Palette::classic();
		let mut rng = SeededRandom::new(3);
		for _ in 0..500 {
			let p = AmbientParticle::new(BOUNDS, &palette, &mut rng);
			assert!((0.0..BOUNDS.width).contains(&p.pos.x));
			assert!((0.0..BOUNDS.height).contains(&p.pos.y));
			assert!(p.vel.x.abs() <= 0.25 && p.vel.y.abs() <= 0.25);
			assert!((0.5..=2.5).contains(&p.size));
			assert!((0.1..=0.6).contains(&p.opacity));
			assert!((100.0..=200.0).contains(&p.life));
			assert!(palette.colors.contains(&p.color));
		}
	}

	#[test]
	fn ambient_wraps_to_opposite_edge() {
		let palette = Palette::classic();
		let mut rng = SequenceRandom::constant(0.5);
		let mut p = still_ambient();
		p.pos = Vec2::new(0.0, 300.0);
		p.vel = Vec2::new(-0.01, 0.0);
		p.update(Vec2::OFFSCREEN, BOUNDS, &palette, &mut rng);
		assert_eq!(p.pos.x, BOUNDS.width);

		p.pos = Vec2::new(BOUNDS.width, 300.0);
		p.vel = Vec2::new(0.01, 0.0);
		p.update(Vec2::OFFSCREEN, BOUNDS, &palette, &mut rng);
		assert_eq!(p.pos.x, 0.0);

		p.pos = Vec2::new(400.0, 0.0);
		p.vel = Vec2::new(0.0, -0.5);
		p.update(Vec2::OFFSCREEN, BOUNDS, &palette, &mut rng);
		assert_eq!(p.pos.y, BOUNDS.height);
	}

	#[test]
	fn pointer_pushes_ambient_away() {
		let palette = Palette::classic();
		let mut rng = SequenceRandom::constant(0.5);
		let mut p = still_ambient();
		p.update(Vec2::new(350.0, 300.0), BOUNDS, &palette, &mut rng);
		// 50px to the right of the pointer: push = (150 - 50) / 150 * 2
		let expected = 400.0 + 100.0 / 150.0 * 2.0;
		assert!((p.pos.x - expected).abs() < 1e-9);
		assert!((p.pos.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn distant_pointer_has_no_effect() {
		let palette = Palette::classic();
		let mut rng = SequenceRandom::constant(0.5);
		let mut p = still_ambient();
		p.update(Vec2::new(400.0, 460.0), BOUNDS, &palette, &mut rng);
		assert_eq!(p.pos, Vec2::new(400.0, 300.0));
	}

	#[test]
	fn ambient_resets_when_life_runs_out() {
		let palette = Palette::classic();
		let mut rng = SequenceRandom::constant(0.5);
		let mut p = still_ambient();
		p.life = 1.0;
		p.update(Vec2::OFFSCREEN, BOUNDS, &palette, &mut rng);
		assert_eq!(p.pos, Vec2::new(400.0, 300.0));
		assert_eq!(p.life, 150.0);
		assert_eq!(p.vel, Vec2::default());
	}

	#[test]
	fn particle_decay_alone_sets_lifetime() {
		let mut p = Particle {
			pos: Vec2::default(),
			vel: Vec2::default(),
			color: Color::rgb(255, 255, 255),
			alpha: 1.0,
			decay: 0.01,
			gravity: PARTICLE_GRAVITY,
			layer: Layer::Background,
		};
		for step in 1..100 {
			assert!(p.update(), "died early at step {step}");
		}
		assert!(!p.update());
	}

	#[test]
	fn particle_applies_drag_then_gravity() {
		let mut p = Particle {
			pos: Vec2::default(),
			vel: Vec2::new(2.0, -2.0),
			color: Color::rgb(255, 255, 255),
			alpha: 1.0,
			decay: 0.0,
			gravity: PARTICLE_GRAVITY,
			layer: Layer::Background,
		};
		p.update();
		assert!((p.vel.x - 1.9).abs() < 1e-12);
		assert!((p.vel.y - (-1.9 + 0.05)).abs() < 1e-12);
		assert_eq!(p.pos, p.vel);
	}

	fn upright_firework(vy: f64, target_y: f64) -> Firework {
		Firework {
			pos: Vec2::new(400.0, 600.0),
			vel: Vec2::new(0.0, vy),
			target_y,
			color: Color::rgb(255, 0, 0),
			layer: Layer::Foreground,
			exploded: false,
		}
	}

	#[test]
	fn firework_explodes_at_apex() {
		let mut rng = SequenceRandom::constant(0.5);
		let mut fw = upright_firework(-9.0, f64::NEG_INFINITY);
		for step in 1..90 {
			assert!(fw.update(&mut rng).is_none(), "exploded early at step {step}");
		}
		assert!(fw.update(&mut rng).is_some());
		assert!(fw.exploded);
		assert!(fw.update(&mut rng).is_none());
	}

	#[test]
	fn firework_explodes_at_target_height() {
		let mut rng = SequenceRandom::constant(0.5);
		let mut fw = upright_firework(-10.0, 595.0);
		assert!(fw.update(&mut rng).is_some());
	}

	#[test]
	fn burst_count_and_inheritance() {
		// size factor = 0.5 + 0.7 = 1.2 -> floor(60.0) particles
		let mut rng = SequenceRandom::constant(0.7);
		let mut fw = upright_firework(-9.0, 0.0);
		let burst = fw.explode(&mut rng);
		assert!((burst.size_factor - 1.2).abs() < 1e-12);
		assert_eq!(burst.particles.len(), (50.0 * burst.size_factor).floor() as usize);
		for p in &burst.particles {
			assert_eq!(p.layer, Layer::Foreground);
			assert_eq!(p.color, fw.color);
			assert_eq!(p.pos, fw.pos);
		}
	}

	#[test]
	fn bigger_bursts_decay_slower() {
		let mut rng = SequenceRandom::constant(0.5);
		let white = Color::rgb(255, 255, 255);
		let small = Particle::new(Vec2::default(), white, Layer::Background, 0.5, &mut rng);
		let large = Particle::new(Vec2::default(), white, Layer::Background, 1.0, &mut rng);
		assert!((small.decay - 2.0 * large.decay).abs() < 1e-15);

		let mean = |s: f64| {
			let mut rng = SeededRandom::new(11);
			let n = 4000;
			(0..n)
				.map(|_| Particle::new(Vec2::default(), white, Layer::Background, s, &mut rng).decay)
				.sum::<f64>()
				/ n as f64
		};
		assert!((mean(0.6) / mean(1.2) - 2.0).abs() < 1e-9);
	}
}
