//! Error types for the celebration display.
//!
//! Nothing in the animation loop is allowed to fail hard: audio and config
//! problems are logged and the display degrades. Only a missing drawing
//! surface stops the component from starting.

use std::fmt;

use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum CelebrationError {
	/// The `celebration-config` script element held invalid JSON.
	ConfigParse(serde_json::Error),

	/// A config value is outside its accepted range.
	InvalidConfig {
		/// Field name as written in the JSON.
		field: &'static str,
		/// Human-readable description of the accepted range.
		expected: &'static str,
	},

	/// The environment offers no usable audio output.
	AudioUnavailable(String),

	/// A Web Audio call failed after the context was created.
	Audio(String),

	/// A required canvas or 2D context could not be obtained.
	MissingSurface(&'static str),
}

impl CelebrationError {
	/// Wraps a rejected Web Audio call.
	pub fn audio(err: JsValue) -> Self {
		CelebrationError::Audio(format!("{:?}", err))
	}
}

impl fmt::Display for CelebrationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CelebrationError::ConfigParse(e) => write!(f, "failed to parse config: {}", e),
			CelebrationError::InvalidConfig { field, expected } => {
				write!(f, "invalid config field '{}': expected {}", field, expected)
			}
			CelebrationError::AudioUnavailable(reason) => {
				write!(f, "audio output unavailable: {}", reason)
			}
			CelebrationError::Audio(reason) => write!(f, "audio call failed: {}", reason),
			CelebrationError::MissingSurface(what) => write!(f, "missing drawing surface: {}", what),
		}
	}
}

impl std::error::Error for CelebrationError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			CelebrationError::ConfigParse(e) => Some(e),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for CelebrationError {
	fn from(e: serde_json::Error) -> Self {
		CelebrationError::ConfigParse(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_problem() {
		let e = CelebrationError::InvalidConfig {
			field: "fireworks_chance",
			expected: "a probability in [0, 1]",
		};
		assert_eq!(
			e.to_string(),
			"invalid config field 'fireworks_chance': expected a probability in [0, 1]"
		);
		assert!(
			CelebrationError::MissingSurface("background canvas")
				.to_string()
				.contains("background canvas")
		);
	}

	#[test]
	fn parse_errors_keep_their_source() {
		let err: CelebrationError = serde_json::from_str::<u32>("nope").unwrap_err().into();
		assert!(std::error::Error::source(&err).is_some());
	}
}
