//! Drawing surfaces for the celebration display.
//!
//! The simulation only ever draws filled circles and per-frame fades, so the
//! [`Surface`] trait is kept to those three operations. Two surfaces may be
//! stacked: an opaque background that fades by painting over itself, and an
//! optional transparent foreground that fades by erasing its own alpha so it
//! layers over page content instead of hiding it.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::entities::Layer;
use super::theme::Color;

/// Immediate-mode 2D target.
pub trait Surface {
	/// Paint `color` (including its alpha) over the whole surface.
	fn paint_overlay(&mut self, color: Color);
	/// Remove `fraction` of the existing alpha from every pixel.
	fn erase(&mut self, fraction: f64);
	/// Filled circle; `color.a` is the global alpha.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);
}

/// Background surface plus an optional foreground overlay.
pub struct Layers<S> {
	pub background: S,
	pub foreground: Option<S>,
}

impl<S: Surface> Layers<S> {
	pub fn new(background: S, foreground: Option<S>) -> Self {
		Self {
			background,
			foreground,
		}
	}

	pub fn has_foreground(&self) -> bool {
		self.foreground.is_some()
	}

	/// Surface for `layer`; foreground content lands on the background when
	/// no foreground surface exists.
	pub fn target(&mut self, layer: Layer) -> &mut S {
		match (layer, self.foreground.as_mut()) {
			(Layer::Foreground, Some(fg)) => fg,
			_ => &mut self.background,
		}
	}

	/// Trail fade for one frame.
	pub fn fade(&mut self, background: Color, fraction: f64) {
		self.background.paint_overlay(background.with_alpha(fraction));
		if let Some(fg) = self.foreground.as_mut() {
			fg.erase(fraction);
		}
	}
}

/// Canvas 2D implementation.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
		Self { ctx, width, height }
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl Surface for CanvasSurface {
	fn paint_overlay(&mut self, color: Color) {
		self.ctx.set_global_alpha(1.0);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn erase(&mut self, fraction: f64) {
		self.ctx.save();
		let _ = self.ctx.set_global_composite_operation("destination-out");
		self.ctx
			.set_fill_style_str(&format!("rgba(0, 0, 0, {})", fraction));
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
		self.ctx.restore();
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		self.ctx.save();
		self.ctx.set_global_alpha(color.a);
		self.ctx.set_fill_style_str(&color.with_alpha(1.0).to_css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
		self.ctx.restore();
	}
}

/// Records draw calls; used by the simulation tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub overlays: Vec<Color>,
	pub erases: Vec<f64>,
	pub circles: Vec<(f64, f64, f64, Color)>,
}

#[cfg(test)]
impl Surface for RecordingSurface {
	fn paint_overlay(&mut self, color: Color) {
		self.overlays.push(color);
	}

	fn erase(&mut self, fraction: f64) {
		self.erases.push(fraction);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		self.circles.push((x, y, radius, color));
	}
}
