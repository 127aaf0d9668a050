//! Maps raw pointer, touch and window events to engine actions.

use super::clock::Mode;
use super::entities::{Bounds, Vec2};

/// Input as delivered by the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
	PointerMove { x: f64, y: f64 },
	PointerLeave,
	Click { x: f64, y: f64 },
	/// Finger lifted; touch screens have no hover position afterwards.
	TouchEnd,
	ToggleMute,
	Resize { width: f64, height: f64 },
}

/// What the engine should do in response.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
	/// First gesture: open or resume the audio context.
	ActivateAudio,
	/// Manual firework launch from horizontal position `x`.
	Launch { x: f64 },
	ToggleMute,
	Resize { width: f64, height: f64 },
}

/// Tracks the last known pointer and turns events into [`Action`]s.
#[derive(Clone, Debug)]
pub struct InputRouter {
	pointer: Vec2,
	bounds: Bounds,
}

impl InputRouter {
	pub fn new(bounds: Bounds) -> Self {
		Self {
			pointer: Vec2::OFFSCREEN,
			bounds,
		}
	}

	/// Last known pointer; off-screen when absent.
	pub fn pointer(&self) -> Vec2 {
		self.pointer
	}

	/// Positions outside the viewport count as "no pointer".
	fn track(&mut self, x: f64, y: f64) {
		let inside = (0.0..=self.bounds.width).contains(&x) && (0.0..=self.bounds.height).contains(&y);
		self.pointer = if inside {
			Vec2::new(x, y)
		} else {
			Vec2::OFFSCREEN
		};
	}

	pub fn handle(&mut self, event: InputEvent, mode: Mode) -> Vec<Action> {
		match event {
			InputEvent::PointerMove { x, y } => {
				self.track(x, y);
				Vec::new()
			}
			InputEvent::PointerLeave | InputEvent::TouchEnd => {
				self.pointer = Vec2::OFFSCREEN;
				Vec::new()
			}
			InputEvent::Click { x, y } => {
				self.track(x, y);
				let mut actions = vec![Action::ActivateAudio];
				if mode == Mode::Celebration {
					actions.push(Action::Launch {
						x: x.clamp(0.0, self.bounds.width),
					});
				}
				actions
			}
			InputEvent::ToggleMute => vec![Action::ToggleMute],
			InputEvent::Resize { width, height } => {
				self.bounds = Bounds { width, height };
				vec![Action::Resize { width, height }]
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn router() -> InputRouter {
		InputRouter::new(Bounds {
			width: 800.0,
			height: 600.0,
		})
	}

	#[test]
	fn pointer_defaults_offscreen() {
		assert_eq!(router().pointer(), Vec2::OFFSCREEN);
	}

	#[test]
	fn moves_track_pointer() {
		let mut r = router();
		assert!(r.handle(InputEvent::PointerMove { x: 10.0, y: 20.0 }, Mode::Countdown).is_empty());
		assert_eq!(r.pointer(), Vec2::new(10.0, 20.0));
		r.handle(InputEvent::TouchEnd, Mode::Countdown);
		assert_eq!(r.pointer(), Vec2::OFFSCREEN);
	}

	#[test]
	fn negative_coordinates_mean_no_pointer() {
		let mut r = router();
		r.handle(InputEvent::PointerMove { x: -5.0, y: 20.0 }, Mode::Countdown);
		assert_eq!(r.pointer(), Vec2::OFFSCREEN);
	}

	#[test]
	fn click_in_countdown_only_unlocks_audio() {
		let mut r = router();
		let actions = r.handle(InputEvent::Click { x: 100.0, y: 100.0 }, Mode::Countdown);
		assert_eq!(actions, vec![Action::ActivateAudio]);
	}

	#[test]
	fn click_in_celebration_launches() {
		let mut r = router();
		let actions = r.handle(InputEvent::Click { x: 250.0, y: 100.0 }, Mode::Celebration);
		assert_eq!(
			actions,
			vec![Action::ActivateAudio, Action::Launch { x: 250.0 }]
		);
	}

	#[test]
	fn resize_updates_bounds() {
		let mut r = router();
		let actions = r.handle(
			InputEvent::Resize {
				width: 100.0,
				height: 50.0,
			},
			Mode::Countdown,
		);
		assert_eq!(
			actions,
			vec![Action::Resize {
				width: 100.0,
				height: 50.0
			}]
		);
		r.handle(InputEvent::PointerMove { x: 400.0, y: 20.0 }, Mode::Countdown);
		assert_eq!(r.pointer(), Vec2::OFFSCREEN);
	}

	#[test]
	fn mute_passes_through() {
		let mut r = router();
		assert_eq!(
			r.handle(InputEvent::ToggleMute, Mode::Celebration),
			vec![Action::ToggleMute]
		);
	}
}
