//! celebration-fx: countdown and fireworks celebration display.
//!
//! This crate provides a WASM page that counts down to a configured moment,
//! then switches to a fireworks show with ambient glitter, click-to-launch
//! rockets and procedurally synthesized sound.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, UrlSearchParams, Window};

pub mod components;
pub mod config;
pub mod error;

use components::celebration::clock::Mode;
use components::celebration::personalize::{document_title, greeting_text, sanitize_name};

pub use components::celebration::{CelebrationCanvas, DisplaySignals};
pub use config::CelebrationConfig;
pub use error::CelebrationError;

const UNIT_LABELS: [&str; 4] = ["Days", "Hours", "Minutes", "Seconds"];

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("celebration-fx: logging initialized");
}

/// Load display configuration from a script element with id="celebration-config".
/// Missing element means defaults; a malformed one is reported and ignored.
fn load_config() -> Option<CelebrationConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("celebration-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match CelebrationConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"celebration-fx: loaded config, rule {:?}, palette {:?}",
				config.rule, config.palette
			);
			Some(config)
		}
		Err(e) => {
			warn!("celebration-fx: ignoring config: {}", e);
			None
		}
	}
}

/// Visitor name from the `?name=` query parameter.
fn read_display_name() -> Option<String> {
	let search = web_sys::window()?.location().search().ok()?;
	let params = UrlSearchParams::new_with_str(&search).ok()?;
	sanitize_name(&params.get("name")?)
}

/// Main application component.
/// Renders the greeting, countdown and year display over the celebration canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let name = read_display_name();
	let greeting = greeting_text(&config.greeting, name.as_deref());
	let title = document_title(&config.greeting, name.as_deref());

	let display = DisplaySignals::new();
	let celebrating = move || display.mode.get() == Mode::Celebration;

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text=title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="celebration" class:celebration-mode=celebrating>
			<CelebrationCanvas config=config display=display />
			<h1 class="greeting">{greeting}</h1>
			<div class="countdown" class:hidden=celebrating>
				{UNIT_LABELS
					.into_iter()
					.enumerate()
					.map(|(i, label)| {
						view! {
							<div class="countdown-unit">
								<span class="countdown-value">
									{move || display.fields.with(|fields| fields[i].clone())}
								</span>
								<span class="countdown-label">{label}</span>
							</div>
						}
					})
					.collect_view()}
			</div>
			<div class="year" class:hidden=move || !celebrating()>
				{move || display.year.get()}
			</div>
		</main>
	}
}
