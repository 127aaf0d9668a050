//! Visual theming for the celebration display.
//!
//! Provides firework color palettes and background fade configuration.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Named palette presets, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
	#[default]
	Classic,
	Gold,
	Frost,
}

/// Colors shared by fireworks and ambient glitter.
#[derive(Clone, Debug)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Gold, white and saturated primaries (default)
	pub fn classic() -> Self {
		Self {
			colors: vec![
				Color::rgb(212, 175, 55),  // Metallic gold
				Color::rgb(255, 255, 255), // White
				Color::rgb(255, 87, 51),   // Vermilion
				Color::rgb(51, 255, 87),   // Neon green
				Color::rgb(51, 87, 255),   // Royal blue
				Color::rgb(255, 51, 161),  // Hot pink
				Color::rgb(0, 255, 255),   // Cyan
			],
		}
	}

	/// Warm champagne tones
	pub fn gold() -> Self {
		Self {
			colors: vec![
				Color::rgb(212, 175, 55),  // Metallic gold
				Color::rgb(255, 215, 0),   // Bright gold
				Color::rgb(255, 240, 180), // Champagne
				Color::rgb(255, 200, 50),  // Sparkler
				Color::rgb(255, 255, 255), // White
			],
		}
	}

	/// Icy blues and silver
	pub fn frost() -> Self {
		Self {
			colors: vec![
				Color::rgb(200, 230, 255), // Ice
				Color::rgb(120, 180, 255), // Sky
				Color::rgb(0, 255, 255),   // Cyan
				Color::rgb(192, 192, 210), // Silver
				Color::rgb(255, 255, 255), // White
			],
		}
	}

	pub fn named(name: PaletteName) -> Self {
		match name {
			PaletteName::Classic => Self::classic(),
			PaletteName::Gold => Self::gold(),
			PaletteName::Frost => Self::frost(),
		}
	}
}

/// Background trail-fade configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Color painted over the background layer each frame
	pub color: Color,
	/// Fraction of the previous frame faded per tick (0.0 = infinite trails)
	pub trail_fade: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub palette: Palette,
}

impl Theme {
	pub fn with_palette(name: PaletteName) -> Self {
		Self {
			palette: Palette::named(name),
			..Self::default()
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(0, 0, 0),
				trail_fade: 0.2,
			},
			palette: Palette::classic(),
		}
	}
}
