// Web frontend tuning: effect buses, audio pump timing and presentation.

// Scene clear colour (linear, drawn into the HDR target)
pub const CLEAR_COLOR: [f64; 3] = [0.005, 0.006, 0.014];

// Reverb bus: procedural stereo impulse response
pub const REVERB_SECONDS: f32 = 5.0; // tail length
pub const REVERB_DECAY_TAU_SEC: f32 = 1.6;
pub const REVERB_WET: f32 = 0.6;

// Delay bus with lowpassed feedback
pub const DELAY_TIME_SEC: f32 = 0.55;
pub const DELAY_MAX_SEC: f64 = 3.0;
pub const DELAY_FEEDBACK: f32 = 0.45;
pub const DELAY_TONE_HZ: f32 = 1400.0;
pub const DELAY_WET: f32 = 0.5;

// Analyser smoothing between snapshots (WebAudio smoothingTimeConstant)
pub const ANALYSER_SMOOTHING: f64 = 0.8;

// Scheduler pump timer bounds
pub const PUMP_MIN_DELAY_MS: f64 = 25.0;
pub const PUMP_MAX_DELAY_MS: f64 = 250.0;

// Oscillators stop slightly after their envelope reaches zero
pub const VOICE_STOP_PAD_SEC: f64 = 0.05;

pub const SCREENSHOT_FILENAME: &str = "aether.png";
