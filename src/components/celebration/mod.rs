//! Countdown and fireworks celebration display.
//!
//! Renders an animated celebration on one or two stacked HTML canvases:
//! - Ambient glitter that drifts, wraps at the edges and shies away from the pointer
//! - Fireworks that rise, burst into fading debris and play procedural sound
//! - A once-per-second clock that flips between countdown and celebration
//!
//! The simulation core ([`particles`], [`entities`], [`clock`], [`audio`])
//! never touches the DOM; it draws through the [`render::Surface`] trait and
//! reports sounds as events, so it runs under plain `cargo test`.
//!
//! # Example
//!
//! ```ignore
//! use celebration_fx::components::celebration::{CelebrationCanvas, DisplaySignals};
//! use celebration_fx::config::CelebrationConfig;
//!
//! let display = DisplaySignals::new();
//! view! { <CelebrationCanvas config=CelebrationConfig::default() display=display /> }
//! ```

pub mod audio;
pub mod clock;
mod component;
pub mod entities;
pub mod input;
pub mod particles;
pub mod personalize;
pub mod random;
pub mod render;
pub mod theme;
mod web_audio;

pub use component::{CelebrationCanvas, DisplaySignals};
