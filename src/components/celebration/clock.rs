//! Countdown/celebration mode state machine.
//!
//! All arithmetic happens on local wall-clock time mapped onto a naive
//! millisecond line (days since 1970-01-01 in the proleptic Gregorian
//! calendar, ignoring time zones), so the browser's local date getters can
//! be fed in directly.
//!
//! Two rules decide when to celebrate:
//!
//! - [`CelebrationRule::Instant`] is a one-way latch. Once `now` reaches the
//!   target the display stays in celebration mode for the rest of the
//!   session, even if the clock later reads earlier.
//! - [`CelebrationRule::Window`] recurs yearly and is reversible: celebration
//!   lasts for `days` calendar days from the anchor date, then the countdown
//!   resumes toward next year's anchor.

use serde::Deserialize;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Days from 1970-01-01 to the given civil date. Out-of-range days roll
/// over into the next month (Feb 30 → Mar 1/2).
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
	let y = year as i64 - if month <= 2 { 1 } else { 0 };
	let era = (if y >= 0 { y } else { y - 399 }) / 400;
	let yoe = y - era * 400;
	let m = month as i64;
	let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i32, u32, u32) {
	let z = days + 719_468;
	let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
	let doe = z - era * 146_097;
	let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
	let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
	let year = (yoe + era * 400 + if month <= 2 { 1 } else { 0 }) as i32;
	(year, month, day)
}

/// Local calendar date and time. `month` and `day` are 1-based.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LocalDateTime {
	pub year: i32,
	pub month: u32,
	pub day: u32,
	#[serde(default)]
	pub hour: u32,
	#[serde(default)]
	pub minute: u32,
	#[serde(default)]
	pub second: u32,
	#[serde(default)]
	pub millisecond: u32,
}

impl LocalDateTime {
	/// Midnight at the start of the given date.
	pub const fn date(year: i32, month: u32, day: u32) -> Self {
		Self {
			year,
			month,
			day,
			hour: 0,
			minute: 0,
			second: 0,
			millisecond: 0,
		}
	}

	pub const fn at(self, hour: u32, minute: u32, second: u32) -> Self {
		Self {
			hour,
			minute,
			second,
			..self
		}
	}

	/// Position on the naive local millisecond line.
	pub fn to_millis(&self) -> i64 {
		days_from_civil(self.year, self.month, self.day) * MS_PER_DAY
			+ self.hour as i64 * MS_PER_HOUR
			+ self.minute as i64 * MS_PER_MINUTE
			+ self.second as i64 * MS_PER_SECOND
			+ self.millisecond as i64
	}

	pub fn from_millis(ms: i64) -> Self {
		let days = ms.div_euclid(MS_PER_DAY);
		let rem = ms.rem_euclid(MS_PER_DAY);
		let (year, month, day) = civil_from_days(days);
		Self {
			year,
			month,
			day,
			hour: (rem / MS_PER_HOUR) as u32,
			minute: (rem % MS_PER_HOUR / MS_PER_MINUTE) as u32,
			second: (rem % MS_PER_MINUTE / MS_PER_SECOND) as u32,
			millisecond: (rem % MS_PER_SECOND) as u32,
		}
	}
}

/// Display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Countdown,
	Celebration,
}

/// When the celebration is active.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CelebrationRule {
	/// Celebrate from `at` onward; never reverts.
	Instant { at: LocalDateTime },
	/// Celebrate each year for `days` days starting at `month`/`day`.
	Window { month: u32, day: u32, days: u32 },
}

impl Default for CelebrationRule {
	fn default() -> Self {
		CelebrationRule::Window {
			month: 1,
			day: 1,
			days: 5,
		}
	}
}

/// Whole time units left until the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Remaining {
	pub days: i64,
	pub hours: i64,
	pub minutes: i64,
	pub seconds: i64,
}

impl Remaining {
	/// Splits a millisecond delta; negative deltas read as zero.
	pub fn from_millis(delta: i64) -> Self {
		let d = delta.max(0);
		Self {
			days: d / MS_PER_DAY,
			hours: d % MS_PER_DAY / MS_PER_HOUR,
			minutes: d % MS_PER_HOUR / MS_PER_MINUTE,
			seconds: d % MS_PER_MINUTE / MS_PER_SECOND,
		}
	}

	/// Zero-padded `[days, hours, minutes, seconds]`.
	pub fn padded(&self) -> [String; 4] {
		[
			format!("{:02}", self.days),
			format!("{:02}", self.hours),
			format!("{:02}", self.minutes),
			format!("{:02}", self.seconds),
		]
	}
}

/// A mode change reported by [`TimeState::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	/// Countdown display should be shown, counting toward `target_year`.
	EnteredCountdown { target_year: i32 },
	/// Countdown frozen; celebration display shows `year`.
	EnteredCelebration { year: i32 },
}

/// Mode state machine, evaluated once per second.
#[derive(Clone, Debug)]
pub struct TimeState {
	rule: CelebrationRule,
	mode: Option<Mode>,
	target: LocalDateTime,
	remaining: Remaining,
	year: i32,
}

impl TimeState {
	pub fn new(rule: CelebrationRule) -> Self {
		let target = match rule {
			CelebrationRule::Instant { at } => at,
			CelebrationRule::Window { month, day, .. } => LocalDateTime::date(0, month, day),
		};
		Self {
			rule,
			mode: None,
			target,
			remaining: Remaining::default(),
			year: target.year,
		}
	}

	/// Current mode; countdown until the first evaluation.
	pub fn mode(&self) -> Mode {
		self.mode.unwrap_or(Mode::Countdown)
	}

	pub fn target(&self) -> LocalDateTime {
		self.target
	}

	pub fn remaining(&self) -> Remaining {
		self.remaining
	}

	/// Year to display: the target year while counting down, the current
	/// year while celebrating.
	pub fn display_year(&self) -> i32 {
		self.year
	}

	/// Re-evaluate against `now`. The first call always reports a transition
	/// so the caller can set up the initial display.
	pub fn tick(&mut self, now: LocalDateTime) -> Option<Transition> {
		let now_ms = now.to_millis();
		let celebrating = match self.rule {
			CelebrationRule::Instant { at } => {
				self.mode == Some(Mode::Celebration) || now_ms >= at.to_millis()
			}
			CelebrationRule::Window { month, day, days } => {
				Self::window_contains(month, day, days, now)
			}
		};
		let next = if celebrating {
			Mode::Celebration
		} else {
			Mode::Countdown
		};
		let changed = self.mode != Some(next);
		self.mode = Some(next);

		match next {
			Mode::Celebration => {
				self.remaining = Remaining::default();
				self.year = now.year;
			}
			Mode::Countdown => {
				if let CelebrationRule::Window { month, day, .. } = self.rule {
					self.target = Self::next_anchor(month, day, now);
				}
				self.remaining = Remaining::from_millis(self.target.to_millis() - now_ms);
				self.year = self.target.year;
			}
		}

		if !changed {
			return None;
		}
		let transition = match next {
			Mode::Celebration => Transition::EnteredCelebration { year: self.year },
			Mode::Countdown => Transition::EnteredCountdown {
				target_year: self.year,
			},
		};
		log::info!("celebration: {:?}", transition);
		Some(transition)
	}

	fn window_contains(month: u32, day: u32, days: u32, now: LocalDateTime) -> bool {
		let now_ms = now.to_millis();
		// The previous year's window may spill over New Year's Eve
		[now.year - 1, now.year].into_iter().any(|year| {
			let start = LocalDateTime::date(year, month, day).to_millis();
			let end = start + days as i64 * MS_PER_DAY;
			(start..end).contains(&now_ms)
		})
	}

	fn next_anchor(month: u32, day: u32, now: LocalDateTime) -> LocalDateTime {
		let this_year = LocalDateTime::date(now.year, month, day);
		if now.to_millis() < this_year.to_millis() {
			this_year
		} else {
			LocalDateTime::date(now.year + 1, month, day)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_year_window() -> TimeState {
		TimeState::new(CelebrationRule::Window {
			month: 1,
			day: 1,
			days: 5,
		})
	}

	#[test]
	fn civil_round_trip_known_dates() {
		assert_eq!(LocalDateTime::date(1970, 1, 1).to_millis(), 0);
		assert_eq!(
			LocalDateTime::date(2000, 3, 1).to_millis(),
			11_017 * MS_PER_DAY
		);
		let t = LocalDateTime::date(2024, 2, 29).at(23, 59, 58);
		assert_eq!(LocalDateTime::from_millis(t.to_millis()), t);
		let before_epoch = LocalDateTime::date(1969, 12, 31).at(12, 0, 0);
		assert_eq!(LocalDateTime::from_millis(before_epoch.to_millis()), before_epoch);
	}

	#[test]
	fn remaining_splits_delta() {
		let delta = 3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 999;
		let r = Remaining::from_millis(delta);
		assert_eq!(
			r,
			Remaining {
				days: 3,
				hours: 4,
				minutes: 5,
				seconds: 6
			}
		);
		assert_eq!(r.padded(), ["03", "04", "05", "06"].map(String::from));
		assert_eq!(Remaining::from_millis(-5), Remaining::default());
	}

	#[test]
	fn instant_latches_one_way() {
		let target = LocalDateTime::date(2026, 1, 1);
		let mut ts = TimeState::new(CelebrationRule::Instant { at: target });

		let before = LocalDateTime::date(2025, 12, 31).at(23, 59, 59);
		assert_eq!(
			ts.tick(before),
			Some(Transition::EnteredCountdown { target_year: 2026 })
		);
		assert_eq!(ts.mode(), Mode::Countdown);
		assert_eq!(ts.remaining().seconds, 1);
		assert_eq!(ts.tick(before), None);

		assert_eq!(
			ts.tick(target),
			Some(Transition::EnteredCelebration { year: 2026 })
		);
		assert_eq!(ts.remaining(), Remaining::default());

		// Clock jumps back: still celebrating
		assert_eq!(ts.tick(before), None);
		assert_eq!(ts.mode(), Mode::Celebration);
	}

	#[test]
	fn instant_mode_is_monotonic_over_a_sweep() {
		let target = LocalDateTime::date(2026, 1, 1);
		let mut ts = TimeState::new(CelebrationRule::Instant { at: target });
		let start = target.to_millis() - 10 * MS_PER_SECOND;
		for s in 0..20 {
			ts.tick(LocalDateTime::from_millis(start + s * MS_PER_SECOND));
			let expected = if s < 10 {
				Mode::Countdown
			} else {
				Mode::Celebration
			};
			assert_eq!(ts.mode(), expected, "at second {s}");
		}
	}

	#[test]
	fn window_covers_first_five_days() {
		let mut ts = new_year_window();
		for day in 1..=5 {
			ts.tick(LocalDateTime::date(2026, 1, day).at(12, 0, 0));
			assert_eq!(ts.mode(), Mode::Celebration, "jan {day}");
			assert_eq!(ts.display_year(), 2026);
		}
		ts.tick(LocalDateTime::date(2026, 1, 5).at(23, 59, 59));
		assert_eq!(ts.mode(), Mode::Celebration);

		assert_eq!(
			ts.tick(LocalDateTime::date(2026, 1, 6)),
			Some(Transition::EnteredCountdown { target_year: 2027 })
		);
		assert_eq!(ts.target(), LocalDateTime::date(2027, 1, 1));
		assert_eq!(ts.remaining().days, 360);
	}

	#[test]
	fn december_counts_toward_next_year() {
		let mut ts = new_year_window();
		for day in [1, 15, 31] {
			let now = LocalDateTime::date(2025, 12, day).at(8, 30, 0);
			ts.tick(now);
			assert_eq!(ts.mode(), Mode::Countdown);
			assert_eq!(ts.display_year(), now.year + 1);
		}
		let eve = LocalDateTime::date(2025, 12, 31).at(23, 59, 50);
		ts.tick(eve);
		assert_eq!(ts.remaining().padded(), ["00", "00", "00", "10"].map(String::from));

		assert_eq!(
			ts.tick(LocalDateTime::date(2026, 1, 1)),
			Some(Transition::EnteredCelebration { year: 2026 })
		);
	}

	#[test]
	fn window_spanning_year_end() {
		let mut ts = TimeState::new(CelebrationRule::Window {
			month: 12,
			day: 30,
			days: 4,
		});
		ts.tick(LocalDateTime::date(2026, 1, 2).at(10, 0, 0));
		assert_eq!(ts.mode(), Mode::Celebration);
		ts.tick(LocalDateTime::date(2026, 1, 3));
		assert_eq!(ts.mode(), Mode::Countdown);
		assert_eq!(ts.target(), LocalDateTime::date(2026, 12, 30));
	}

	#[test]
	fn first_tick_reports_initial_celebration() {
		let mut ts = new_year_window();
		assert_eq!(ts.mode(), Mode::Countdown);
		assert_eq!(
			ts.tick(LocalDateTime::date(2026, 1, 3)),
			Some(Transition::EnteredCelebration { year: 2026 })
		);
	}
}
