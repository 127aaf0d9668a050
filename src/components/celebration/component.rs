//! Leptos component hosting the celebration canvases.
//!
//! Creates the background canvas (and an optional transparent foreground
//! canvas above the page), then drives everything from three callbacks: a
//! `requestAnimationFrame` loop for the particle system, a one second
//! interval for the clock, and window listeners feeding the input router.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, MediaQueryList, MouseEvent,
	TouchEvent, Window,
};

use super::audio::AudioEngine;
use super::clock::{LocalDateTime, Mode, TimeState};
use super::entities::Bounds;
use super::input::{Action, InputEvent, InputRouter};
use super::particles::{MotionPolicy, ParticleSystem};
use super::random::{CryptoRandom, RandomSource, SeededRandom};
use super::render::{CanvasSurface, Layers};
use super::theme::Theme;
use super::web_audio::WebAudioBackend;
use crate::config::{CelebrationConfig, RandomKind};
use crate::error::CelebrationError;

/// Marks page controls whose clicks must not reach the window listener.
const CONTROL_ATTR: &str = "data-celebration-control";

/// Reactive display state the page renders around the canvases.
#[derive(Clone, Copy)]
pub struct DisplaySignals {
	/// Countdown or celebration.
	pub mode: RwSignal<Mode>,
	/// Zero-padded days, hours, minutes and seconds.
	pub fields: RwSignal<[String; 4]>,
	/// Target year while counting down, current year while celebrating.
	pub year: RwSignal<i32>,
}

impl DisplaySignals {
	/// Countdown mode with all fields at `00`.
	pub fn new() -> Self {
		Self {
			mode: RwSignal::new(Mode::Countdown),
			fields: RwSignal::new(std::array::from_fn(|_| "00".to_string())),
			year: RwSignal::new(0),
		}
	}
}

impl Default for DisplaySignals {
	fn default() -> Self {
		Self::new()
	}
}

type SharedContext = Rc<RefCell<Option<CelebrationContext>>>;

/// Everything the callbacks share.
struct CelebrationContext {
	particles: ParticleSystem<Box<dyn RandomSource>>,
	layers: Layers<CanvasSurface>,
	audio: AudioEngine<WebAudioBackend, Box<dyn RandomSource>>,
	time: TimeState,
	input: InputRouter,
	canvases: Vec<HtmlCanvasElement>,
	reduced_motion: Option<MediaQueryList>,
}

impl CelebrationContext {
	fn new(
		config: &CelebrationConfig,
		window: &Window,
		background: HtmlCanvasElement,
		foreground: Option<HtmlCanvasElement>,
	) -> Result<Self, CelebrationError> {
		let (w, h) = window_size(window);
		let mut canvases = vec![background];
		canvases.extend(foreground);
		for canvas in &canvases {
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
		}

		let background = CanvasSurface::new(context_2d(&canvases[0])?, w, h);
		let foreground = match canvases.get(1) {
			Some(canvas) => Some(CanvasSurface::new(context_2d(canvas)?, w, h)),
			None => None,
		};
		let layers = Layers::new(background, foreground);

		let mut settings = config.particle_settings();
		settings.foreground = layers.has_foreground();

		Ok(Self {
			particles: ParticleSystem::new(
				Theme::with_palette(config.palette),
				settings,
				w,
				h,
				random_source(config, 0),
			),
			layers,
			audio: AudioEngine::new(WebAudioBackend, random_source(config, 1)),
			time: TimeState::new(config.rule),
			input: InputRouter::new(Bounds {
				width: w,
				height: h,
			}),
			canvases,
			reduced_motion: window
				.match_media("(prefers-reduced-motion: reduce)")
				.ok()
				.flatten(),
		})
	}

	fn frame(&mut self) {
		let reduced = self.reduced_motion.as_ref().is_some_and(|m| m.matches());
		let events = self.particles.tick(
			&mut self.layers,
			self.input.pointer(),
			self.time.mode(),
			MotionPolicy::from_reduced_motion(reduced),
		);
		for event in &events {
			self.audio.handle(event);
		}
	}

	fn tick_clock(&mut self, display: DisplaySignals) {
		if self.time.tick(local_now()).is_some() {
			display.mode.set(self.time.mode());
			display.year.set(self.time.display_year());
		}
		if self.time.mode() == Mode::Countdown {
			display.fields.set(self.time.remaining().padded());
		}
	}

	fn dispatch(&mut self, event: InputEvent) {
		for action in self.input.handle(event, self.time.mode()) {
			match action {
				Action::ActivateAudio => self.audio.init(),
				Action::Launch { x } => {
					let launched = self.particles.launch_firework(Some(x));
					self.audio.handle(&launched);
				}
				// The first press has nothing to mute yet; treat it as the unlock gesture.
				Action::ToggleMute if !self.audio.has_context() => self.audio.init(),
				Action::ToggleMute => {
					let enabled = self.audio.toggle_mute();
					info!("celebration: sound {}", if enabled { "on" } else { "off" });
				}
				Action::Resize { width, height } => self.resize(width, height),
			}
		}
	}

	fn resize(&mut self, width: f64, height: f64) {
		for canvas in &self.canvases {
			canvas.set_width(width as u32);
			canvas.set_height(height as u32);
		}
		self.layers.background.resize(width, height);
		if let Some(fg) = self.layers.foreground.as_mut() {
			fg.resize(width, height);
		}
		self.particles.resize(width, height);
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CelebrationError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(CelebrationError::MissingSurface("2d canvas context"))
}

/// Builds the configured random source. `salt` keeps seeded streams for
/// visuals and sound apart.
fn random_source(config: &CelebrationConfig, salt: u64) -> Box<dyn RandomSource> {
	let seeded = |seed: Option<u64>| -> Box<dyn RandomSource> {
		let seed = seed.unwrap_or_else(|| js_sys::Date::now() as u64);
		Box::new(SeededRandom::new(seed.wrapping_add(salt)))
	};
	match config.random {
		RandomKind::Seeded => seeded(config.seed),
		RandomKind::Crypto => match CryptoRandom::from_window() {
			Some(source) => Box::new(source),
			None => {
				warn!("celebration: crypto random unavailable, using seeded generator");
				seeded(config.seed)
			}
		},
	}
}

/// Browser wall clock in local time.
fn local_now() -> LocalDateTime {
	let d = js_sys::Date::new_0();
	LocalDateTime {
		year: d.get_full_year() as i32,
		month: d.get_month() + 1,
		day: d.get_date(),
		hour: d.get_hours(),
		minute: d.get_minutes(),
		second: d.get_seconds(),
		millisecond: d.get_milliseconds(),
	}
}

/// True when the event started on a page control such as the mute button.
fn from_control(ev: &Event) -> bool {
	ev.target()
		.and_then(|t| t.dyn_into::<Element>().ok())
		.and_then(|el| el.closest(&format!("[{}]", CONTROL_ATTR)).ok().flatten())
		.is_some()
}

/// Registers a window listener that translates DOM events of type `E` into
/// [`InputEvent`]s and dispatches them.
fn listen<E: JsCast + 'static>(
	window: &Window,
	name: &str,
	context: SharedContext,
	sound_on: RwSignal<bool>,
	translate: impl Fn(&E) -> Option<InputEvent> + 'static,
) -> Closure<dyn FnMut(Event)> {
	let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		let Some(input) = ev.dyn_ref::<E>().and_then(&translate) else {
			return;
		};
		if let Some(ref mut c) = *context.borrow_mut() {
			c.dispatch(input);
			sound_on.set(c.audio.is_enabled());
		}
	});
	let _ = window.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
	cb
}

/// Full-viewport countdown and fireworks canvas.
///
/// Clicks anywhere unlock audio and, while celebrating, launch a firework at
/// the click position. Clock state is published through `display` once per
/// second.
#[component]
pub fn CelebrationCanvas(config: CelebrationConfig, display: DisplaySignals) -> impl IntoView {
	let background_ref = NodeRef::<leptos::html::Canvas>::new();
	let foreground_ref = NodeRef::<leptos::html::Canvas>::new();
	let with_foreground = config.foreground;
	let sound_on = RwSignal::new(false);

	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let clock: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut(Event)>>>> = Rc::new(RefCell::new(Vec::new()));
	let (context_init, animate_init, clock_init) = (context.clone(), animate.clone(), clock.clone());

	Effect::new(move |_| {
		let Some(background) = background_ref.get() else {
			return;
		};
		let foreground = foreground_ref.get();
		if (with_foreground && foreground.is_none()) || context_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};

		match CelebrationContext::new(&config, &window, background.into(), foreground.map(Into::into)) {
			Ok(mut c) => {
				c.tick_clock(display);
				info!(
					"celebration: started in {:?} mode, {} ambient particles",
					c.time.mode(),
					c.particles.ambient.len()
				);
				*context_init.borrow_mut() = Some(c);
			}
			Err(e) => {
				warn!("celebration: {}", e);
				return;
			}
		}

		{
			let mut listeners = listeners.borrow_mut();
			let ctx = &context_init;
			listeners.push(listen(&window, "click", ctx.clone(), sound_on, |ev: &MouseEvent| {
				(!from_control(ev)).then(|| InputEvent::Click {
					x: ev.client_x() as f64,
					y: ev.client_y() as f64,
				})
			}));
			listeners.push(listen(&window, "mousemove", ctx.clone(), sound_on, |ev: &MouseEvent| {
				Some(InputEvent::PointerMove {
					x: ev.client_x() as f64,
					y: ev.client_y() as f64,
				})
			}));
			listeners.push(listen(&window, "mouseout", ctx.clone(), sound_on, |ev: &MouseEvent| {
				ev.related_target().is_none().then_some(InputEvent::PointerLeave)
			}));
			listeners.push(listen(&window, "touchmove", ctx.clone(), sound_on, |ev: &TouchEvent| {
				ev.touches().get(0).map(|t| InputEvent::PointerMove {
					x: t.client_x() as f64,
					y: t.client_y() as f64,
				})
			}));
			listeners.push(listen(&window, "touchend", ctx.clone(), sound_on, |_: &TouchEvent| {
				Some(InputEvent::TouchEnd)
			}));
			listeners.push(listen(&window, "resize", ctx.clone(), sound_on, |_: &Event| {
				let (width, height) = window_size(&web_sys::window()?);
				Some(InputEvent::Resize { width, height })
			}));
		}

		let context_clock = context_init.clone();
		*clock_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_clock.borrow_mut() {
				c.tick_clock(display);
			}
		}));
		if let Some(ref cb) = *clock_init.borrow() {
			let _ = window
				.set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 1000);
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.frame();
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_mute = context.clone();
	let on_mute = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mute.borrow_mut() {
			c.dispatch(InputEvent::ToggleMute);
			sound_on.set(c.audio.is_enabled());
		}
	};

	view! {
		<canvas
			node_ref=background_ref
			class="celebration-canvas"
			style="position: fixed; inset: 0; z-index: -1; display: block;"
		/>
		{with_foreground
			.then(|| {
				view! {
					<canvas
						node_ref=foreground_ref
						class="celebration-foreground"
						style="position: fixed; inset: 0; z-index: 10; display: block; pointer-events: none;"
					/>
				}
			})}
		<button
			class="mute-toggle"
			data-celebration-control=""
			aria-pressed=move || (!sound_on.get()).to_string()
			on:click=on_mute
		>
			{move || if sound_on.get() { "Sound on" } else { "Sound off" }}
		</button>
	}
}
