use crate::constants::*;
use aether_core::constants::ANALYSER_FFT_SIZE;
use aether_core::synth::{AudioBackend, FilterSpec, SynthEngine, VoiceSpec, Waveform};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FxBuses {
    pub master_gain: web::GainNode,
    pub analyser: web::AnalyserNode,
    pub reverb_in: web::GainNode,
    pub delay_in: web::GainNode,
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, ()> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(())
        }
    }
}

/// Dark stereo noise burst with an exponential tail.
fn build_reverb_impulse(audio_ctx: &web::AudioContext) -> Option<web::AudioBuffer> {
    let sr = audio_ctx.sample_rate();
    let len = (sr * REVERB_SECONDS) as u32;
    let ir = audio_ctx.create_buffer(2, len, sr).ok()?;
    // xorshift32 keeps the impulse identical between sessions
    let mut seeds: [u32; 2] = [0x1234_ABCD, 0x7890_FEDC];
    for (ch, seed) in seeds.iter_mut().enumerate() {
        let mut buf: Vec<f32> = vec![0.0; len as usize];
        let dt = 1.0_f32 / sr;
        for (i, sample) in buf.iter_mut().enumerate() {
            let mut x = *seed;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *seed = x;
            let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let t = i as f32 * dt;
            let decay = (-t / REVERB_DECAY_TAU_SEC).exp();
            let dark = (1.0 - t / REVERB_SECONDS).max(0.0);
            *sample = n * decay * (0.6 + 0.4 * dark);
        }
        ir.copy_to_channel(&mut buf, ch as i32).ok()?;
    }
    Some(ir)
}

/// Master -> analyser -> destination, plus shared reverb and delay sends
/// that feed back into the master.
pub fn build_fx_buses(audio_ctx: &web::AudioContext) -> Result<FxBuses, ()> {
    let master_gain = create_gain(audio_ctx, 0.0, "Master")?;
    let analyser = web::AnalyserNode::new(audio_ctx).map_err(|e| {
        log::error!("AnalyserNode error: {:?}", e);
    })?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    let _ = master_gain.connect_with_audio_node(&analyser);
    let _ = analyser.connect_with_audio_node(&audio_ctx.destination());

    // Reverb bus; a failed impulse drops only this layer
    let reverb_in = create_gain(audio_ctx, 1.0, "Reverb in")?;
    match web::ConvolverNode::new(audio_ctx) {
        Ok(reverb) => {
            reverb.set_normalize(true);
            match build_reverb_impulse(audio_ctx) {
                Some(ir) => {
                    reverb.set_buffer(Some(&ir));
                    let reverb_wet = create_gain(audio_ctx, REVERB_WET, "Reverb wet")?;
                    let _ = reverb_in.connect_with_audio_node(&reverb);
                    let _ = reverb.connect_with_audio_node(&reverb_wet);
                    let _ = reverb_wet.connect_with_audio_node(&master_gain);
                }
                None => log::warn!("[audio] reverb impulse unavailable, reverb disabled"),
            }
        }
        Err(e) => log::warn!("[audio] ConvolverNode error: {:?}, reverb disabled", e),
    }

    // Delay bus with feedback loop and lowpass tone for darkness
    let delay_in = create_gain(audio_ctx, 1.0, "Delay in")?;
    let delay = audio_ctx
        .create_delay_with_max_delay_time(DELAY_MAX_SEC)
        .map_err(|e| {
            log::error!("DelayNode error: {:?}", e);
        })?;
    delay.delay_time().set_value(DELAY_TIME_SEC);
    let delay_tone = web::BiquadFilterNode::new(audio_ctx).map_err(|e| {
        log::error!("BiquadFilterNode error: {:?}", e);
    })?;
    delay_tone.set_type(web::BiquadFilterType::Lowpass);
    delay_tone.frequency().set_value(DELAY_TONE_HZ);
    let delay_feedback = create_gain(audio_ctx, DELAY_FEEDBACK, "Delay feedback")?;
    let delay_wet = create_gain(audio_ctx, DELAY_WET, "Delay wet")?;
    let _ = delay_in.connect_with_audio_node(&delay);
    let _ = delay.connect_with_audio_node(&delay_tone);
    let _ = delay_tone.connect_with_audio_node(&delay_feedback);
    let _ = delay_feedback.connect_with_audio_node(&delay);
    let _ = delay_tone.connect_with_audio_node(&delay_wet);
    let _ = delay_wet.connect_with_audio_node(&master_gain);

    Ok(FxBuses {
        master_gain,
        analyser,
        reverb_in,
        delay_in,
    })
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

/// One oscillator and its envelope gain.
pub struct WebVoice {
    osc: web::OscillatorNode,
    env: web::GainNode,
}

pub struct WebAudioBackend {
    ctx: web::AudioContext,
    buses: FxBuses,
    closed: bool,
}

impl WebAudioBackend {
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new()
            .map_err(|e| anyhow::anyhow!("AudioContext error: {:?}", e))?;
        let buses = build_fx_buses(&ctx).map_err(|_| anyhow::anyhow!("fx bus setup failed"))?;
        Ok(Self {
            ctx,
            buses,
            closed: false,
        })
    }

    /// Contexts created outside a user gesture start suspended.
    pub fn resume(&self) {
        if !self.closed {
            let _ = self.ctx.resume();
        }
    }

    fn connect_send(&self, from: &web::GainNode, amount: f32, bus: &web::GainNode) {
        if amount <= 0.0 {
            return;
        }
        if let Ok(send) = create_gain(&self.ctx, amount, "Send") {
            let _ = from.connect_with_audio_node(&send);
            let _ = send.connect_with_audio_node(bus);
        }
    }

    fn build_filter(&self, spec: FilterSpec) -> Option<web::BiquadFilterNode> {
        let filter = web::BiquadFilterNode::new(&self.ctx).ok()?;
        filter.set_type(web::BiquadFilterType::Lowpass);
        filter.frequency().set_value(spec.cutoff_hz);
        filter.q().set_value(spec.q);
        Some(filter)
    }
}

impl AudioBackend for WebAudioBackend {
    type Voice = WebVoice;

    fn now(&self) -> f64 {
        self.ctx.current_time()
    }

    fn start_voice(&mut self, spec: &VoiceSpec, at: f64) -> Option<WebVoice> {
        if self.closed {
            return None;
        }
        let osc = web::OscillatorNode::new(&self.ctx).ok()?;
        osc.set_type(oscillator_type(spec.waveform));
        osc.frequency().set_value(spec.frequency_hz);
        osc.detune().set_value(spec.detune_cents);
        let env = create_gain(&self.ctx, 0.0, "Voice").ok()?;
        let g = env.gain();
        let _ = g.set_value_at_time(0.0, at);
        let _ = g.linear_ramp_to_value_at_time(spec.gain, at + spec.attack_sec);
        if let Some(hold) = spec.hold_sec {
            let release_at = at + spec.attack_sec + hold;
            let _ = g.set_value_at_time(spec.gain, release_at);
            let _ = g.linear_ramp_to_value_at_time(0.0, release_at + spec.release_sec);
            let _ = osc.stop_with_when(release_at + spec.release_sec + VOICE_STOP_PAD_SEC);
        }

        match spec.filter.and_then(|f| self.build_filter(f)) {
            Some(filter) => {
                let _ = osc.connect_with_audio_node(&filter);
                let _ = filter.connect_with_audio_node(&env);
            }
            None => {
                let _ = osc.connect_with_audio_node(&env);
            }
        }
        let _ = env.connect_with_audio_node(&self.buses.master_gain);
        self.connect_send(&env, spec.reverb_send, &self.buses.reverb_in);
        self.connect_send(&env, spec.delay_send, &self.buses.delay_in);
        osc.start_with_when(at).ok()?;
        Some(WebVoice { osc, env })
    }

    fn glide_voice(&mut self, voice: &WebVoice, frequency_hz: f32, at: f64, glide_sec: f64) {
        let f = voice.osc.frequency();
        let _ = f.cancel_scheduled_values(at);
        // three time constants reach ~95% of the target within the glide
        let _ = f.set_target_at_time(frequency_hz, at, (glide_sec / 3.0).max(0.01));
    }

    fn release_voice(&mut self, voice: WebVoice, at: f64, release_sec: f64) {
        let g = voice.env.gain();
        let _ = g.cancel_scheduled_values(at);
        let _ = g.set_value_at_time(g.value(), at);
        let _ = g.linear_ramp_to_value_at_time(0.0, at + release_sec);
        let _ = voice.osc.stop_with_when(at + release_sec + VOICE_STOP_PAD_SEC);
    }

    fn ramp_master(&mut self, from: Option<f32>, to: f32, at: f64, ramp_sec: f64) {
        let p = self.buses.master_gain.gain();
        match from {
            Some(v) => {
                // events before `at` (a fade-out in progress) are kept
                let _ = p.cancel_scheduled_values(at);
                let _ = p.set_value_at_time(v, at);
            }
            None => {
                let current = p.value();
                let _ = p.cancel_scheduled_values(at);
                let _ = p.set_value_at_time(current, at);
            }
        }
        let _ = p.linear_ramp_to_value_at_time(to, at + ramp_sec);
    }

    fn read_spectrum(&mut self, out: &mut Vec<u8>) -> bool {
        if self.closed {
            return false;
        }
        let bins = self.buses.analyser.frequency_bin_count() as usize;
        out.resize(bins, 0);
        self.buses.analyser.get_byte_frequency_data(out.as_mut_slice());
        true
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.ctx.close() {
            log::warn!("[audio] close failed: {:?}", e);
        }
    }
}

/// Owns the synth engine and the single timer that pumps its scheduler.
pub struct WebAudioEngine {
    engine: Rc<RefCell<SynthEngine<WebAudioBackend>>>,
    timer: Rc<PumpTimer>,
}

#[derive(Default)]
struct PumpTimer {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<js_sys::Function>>,
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl PumpTimer {
    fn clear(&self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            w.clear_timeout_with_handle(id);
        }
    }

    fn arm(&self, delay_ms: f64) {
        self.clear();
        let Some(w) = web::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match w.set_timeout_with_callback_and_timeout_and_arguments_0(cb, delay_ms as i32) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::error!("[audio] setTimeout failed: {:?}", e),
        }
    }

    /// Pumps once and re-arms for the next due task, if any.
    fn run(&self, engine: &RefCell<SynthEngine<WebAudioBackend>>) {
        self.handle.set(None);
        let mut eng = engine.borrow_mut();
        eng.pump();
        let now = eng.backend().now();
        let next = eng.next_due();
        drop(eng);
        if let Some(due) = next {
            let lead = aether_core::constants::SCHEDULER_LOOKAHEAD_SEC * 0.5;
            let delay = ((due - now - lead) * 1000.0).clamp(PUMP_MIN_DELAY_MS, PUMP_MAX_DELAY_MS);
            self.arm(delay);
        }
    }
}

impl WebAudioEngine {
    pub fn new(volume: f32) -> anyhow::Result<Self> {
        let backend = WebAudioBackend::new()?;
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let engine = Rc::new(RefCell::new(SynthEngine::new(backend, volume, seed)));
        let timer = Rc::new(PumpTimer::default());

        let weak_engine: Weak<RefCell<SynthEngine<WebAudioBackend>>> = Rc::downgrade(&engine);
        let weak_timer: Weak<PumpTimer> = Rc::downgrade(&timer);
        let closure = Closure::wrap(Box::new(move || {
            if let (Some(engine), Some(timer)) = (weak_engine.upgrade(), weak_timer.upgrade()) {
                timer.run(&engine);
            }
        }) as Box<dyn FnMut()>);
        let function: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        *timer.callback.borrow_mut() = Some(function);
        *timer.closure.borrow_mut() = Some(closure);
        log::info!("[audio] context ready");
        Ok(Self { engine, timer })
    }

    pub fn play_track(&self, id: usize, volume: f32) -> Result<(), aether_core::AetherError> {
        let mut eng = self.engine.borrow_mut();
        eng.backend().resume();
        eng.play_track(id, volume)?;
        drop(eng);
        self.timer.arm(0.0);
        Ok(())
    }

    pub fn stop_all(&self) {
        self.timer.clear();
        self.engine.borrow_mut().stop_all();
    }

    pub fn set_volume(&self, volume: f32) {
        self.engine.borrow_mut().set_volume(volume);
    }

    pub fn amplitude(&self) -> Option<f32> {
        self.engine.borrow_mut().amplitude()
    }

    pub fn is_playing(&self) -> bool {
        self.engine.borrow().is_playing()
    }

    pub fn current_track(&self) -> Option<usize> {
        self.engine.borrow().current_track()
    }

    /// Stops everything, drops the timer callback and closes the context.
    pub fn shutdown(&self) {
        self.timer.clear();
        self.timer.callback.borrow_mut().take();
        self.timer.closure.borrow_mut().take();
        self.engine.borrow_mut().shutdown();
        log::info!("[audio] context closed");
    }
}
