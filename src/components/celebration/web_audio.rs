//! Web Audio implementation of the audio backend.

use web_sys::{AudioContext, AudioContextState, BiquadFilterType};

use super::audio::{AudioBackend, AudioOutput, Voice};
use crate::error::CelebrationError;

/// Opens a browser `AudioContext`.
#[derive(Default)]
pub struct WebAudioBackend;

impl AudioBackend for WebAudioBackend {
	type Output = WebAudioOutput;

	fn open(&mut self) -> Result<WebAudioOutput, CelebrationError> {
		AudioContext::new()
			.map(|ctx| WebAudioOutput { ctx })
			.map_err(|e| CelebrationError::AudioUnavailable(format!("{:?}", e)))
	}
}

pub struct WebAudioOutput {
	ctx: AudioContext,
}

impl WebAudioOutput {
	fn play_sweep(
		&self,
		(start_hz, end_hz): (f32, f32),
		(start_gain, end_gain): (f32, f32),
		duration: f64,
	) -> Result<(), wasm_bindgen::JsValue> {
		let now = self.ctx.current_time();
		let osc = self.ctx.create_oscillator()?;
		let gain = self.ctx.create_gain()?;

		osc.frequency().set_value_at_time(start_hz, now)?;
		osc.frequency()
			.exponential_ramp_to_value_at_time(end_hz, now + duration)?;
		gain.gain().set_value_at_time(start_gain, now)?;
		gain.gain()
			.exponential_ramp_to_value_at_time(end_gain, now + duration)?;

		osc.connect_with_audio_node(&gain)?;
		gain.connect_with_audio_node(&self.ctx.destination())?;

		osc.start()?;
		osc.stop_with_when(now + duration)?;
		Ok(())
	}

	#[allow(clippy::too_many_arguments)]
	fn play_noise(
		&self,
		samples: &[f32],
		sample_rate: f32,
		cutoff_hz: f32,
		(start_gain, end_gain): (f32, f32),
		ramp: f64,
		duration: f64,
	) -> Result<(), wasm_bindgen::JsValue> {
		let now = self.ctx.current_time();
		let buffer = self
			.ctx
			.create_buffer(1, samples.len() as u32, sample_rate)?;
		let mut data = samples.to_vec();
		buffer.copy_to_channel(&mut data, 0)?;

		let noise = self.ctx.create_buffer_source()?;
		noise.set_buffer(Some(&buffer));

		let filter = self.ctx.create_biquad_filter()?;
		filter.set_type(BiquadFilterType::Lowpass);
		filter.frequency().set_value(cutoff_hz);

		let gain = self.ctx.create_gain()?;
		gain.gain().set_value_at_time(start_gain, now)?;
		gain.gain()
			.exponential_ramp_to_value_at_time(end_gain, now + ramp)?;

		noise.connect_with_audio_node(&filter)?;
		filter.connect_with_audio_node(&gain)?;
		gain.connect_with_audio_node(&self.ctx.destination())?;

		noise.start()?;
		noise.stop_with_when(now + duration)?;
		Ok(())
	}
}

impl AudioOutput for WebAudioOutput {
	fn sample_rate(&self) -> f32 {
		self.ctx.sample_rate()
	}

	fn is_suspended(&self) -> bool {
		self.ctx.state() == AudioContextState::Suspended
	}

	fn resume(&self) -> Result<(), CelebrationError> {
		self.ctx.resume().map(|_| ()).map_err(CelebrationError::audio)
	}

	fn play(&self, voice: &Voice) -> Result<(), CelebrationError> {
		match voice {
			Voice::Sweep {
				start_hz,
				end_hz,
				start_gain,
				end_gain,
				duration,
			} => self.play_sweep(
				(*start_hz, *end_hz),
				(*start_gain, *end_gain),
				*duration,
			),
			Voice::Noise {
				samples,
				sample_rate,
				cutoff_hz,
				start_gain,
				end_gain,
				ramp,
				duration,
			} => self.play_noise(
				samples,
				*sample_rate,
				*cutoff_hz,
				(*start_gain, *end_gain),
				*ramp,
				*duration,
			),
		}
		.map_err(CelebrationError::audio)
	}
}
