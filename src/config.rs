//! Display configuration.
//!
//! Read from an optional `<script id="celebration-config"
//! type="application/json">` element; every field has a default, so an empty
//! object (or no element at all) gives the stock New Year display.

use serde::Deserialize;

use crate::components::celebration::clock::CelebrationRule;
use crate::components::celebration::particles::{
	DEFAULT_AMBIENT_COUNT, DEFAULT_FIREWORKS_CHANCE, ParticleSettings,
};
use crate::components::celebration::theme::PaletteName;
use crate::error::CelebrationError;

/// Which random source drives the visuals.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RandomKind {
	/// `crypto.getRandomValues`, falling back to seeded when unavailable.
	#[default]
	Crypto,
	/// Deterministic generator seeded from `seed` (or the clock).
	Seeded,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
	pub rule: CelebrationRule,
	/// Per-frame auto-launch probability while celebrating.
	pub fireworks_chance: f64,
	pub ambient_count: usize,
	pub palette: PaletteName,
	/// Render fireworks on a second, transparent canvas above the page too.
	pub foreground: bool,
	pub random: RandomKind,
	pub seed: Option<u64>,
	/// Greeting phrase; a visitor name is appended when present.
	pub greeting: String,
}

impl Default for CelebrationConfig {
	fn default() -> Self {
		Self {
			rule: CelebrationRule::default(),
			fireworks_chance: DEFAULT_FIREWORKS_CHANCE,
			ambient_count: DEFAULT_AMBIENT_COUNT,
			palette: PaletteName::default(),
			foreground: true,
			random: RandomKind::default(),
			seed: None,
			greeting: "Happy New Year".to_string(),
		}
	}
}

impl CelebrationConfig {
	pub fn from_json(json: &str) -> Result<Self, CelebrationError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), CelebrationError> {
		if !(0.0..=1.0).contains(&self.fireworks_chance) {
			return Err(CelebrationError::InvalidConfig {
				field: "fireworks_chance",
				expected: "a probability in [0, 1]",
			});
		}
		if self.ambient_count > 10_000 {
			return Err(CelebrationError::InvalidConfig {
				field: "ambient_count",
				expected: "at most 10000 particles",
			});
		}
		let (month, day) = match self.rule {
			CelebrationRule::Instant { at } => {
				if at.hour > 23 || at.minute > 59 || at.second > 59 || at.millisecond > 999 {
					return Err(CelebrationError::InvalidConfig {
						field: "rule.at",
						expected: "a time of day within 00:00:00.000..=23:59:59.999",
					});
				}
				(at.month, at.day)
			}
			CelebrationRule::Window { month, day, days } => {
				if days == 0 {
					return Err(CelebrationError::InvalidConfig {
						field: "rule.days",
						expected: "a window of at least one day",
					});
				}
				(month, day)
			}
		};
		if !(1..=12).contains(&month) {
			return Err(CelebrationError::InvalidConfig {
				field: "rule.month",
				expected: "a month in 1..=12",
			});
		}
		if !(1..=31).contains(&day) {
			return Err(CelebrationError::InvalidConfig {
				field: "rule.day",
				expected: "a day in 1..=31",
			});
		}
		Ok(())
	}

	pub fn particle_settings(&self) -> ParticleSettings {
		ParticleSettings {
			ambient_count: self.ambient_count,
			fireworks_chance: self.fireworks_chance,
			foreground: self.foreground,
		}
	}
}
