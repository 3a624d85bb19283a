/// Oscillator shapes available to presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSpec {
    pub cutoff_hz: f32,
    pub q: f32,
}

/// Everything needed to start one oscillator voice.
///
/// `hold_sec: Some(d)` makes a one-shot note: attack, hold for `d`, release,
/// then the backend stops the oscillator on its own. `None` sustains until
/// [`AudioBackend::release_voice`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub detune_cents: f32,
    pub gain: f32,
    pub attack_sec: f64,
    pub hold_sec: Option<f64>,
    pub release_sec: f64,
    pub filter: Option<FilterSpec>,
    pub reverb_send: f32,
    pub delay_send: f32,
}

impl VoiceSpec {
    /// Audio-clock time at which a one-shot started at `at` falls silent.
    pub fn end_time(&self, at: f64) -> Option<f64> {
        self.hold_sec
            .map(|hold| at + self.attack_sec + hold + self.release_sec)
    }
}

/// Audio graph operations the synth engine needs. The web frontend
/// implements this with WebAudio nodes; all times are on the backend clock.
pub trait AudioBackend {
    type Voice;

    /// Current audio-clock time in seconds.
    fn now(&self) -> f64;

    /// Starts a voice at `at`. `None` if the graph could not be built.
    fn start_voice(&mut self, spec: &VoiceSpec, at: f64) -> Option<Self::Voice>;

    /// Glides a sustained voice to a new frequency, finishing at `at + glide_sec`.
    fn glide_voice(&mut self, voice: &Self::Voice, frequency_hz: f32, at: f64, glide_sec: f64);

    /// Fades a voice out from `at` and stops its oscillator afterwards.
    fn release_voice(&mut self, voice: Self::Voice, at: f64, release_sec: f64);

    /// Ramps the master gain to `to`, beginning at `at`. `from: None` starts
    /// from the live value.
    fn ramp_master(&mut self, from: Option<f32>, to: f32, at: f64, ramp_sec: f64);

    /// Fills `out` with byte frequency data. Returns false if unavailable.
    fn read_spectrum(&mut self, out: &mut Vec<u8>) -> bool;

    /// Releases the underlying audio context.
    fn close(&mut self) {}
}

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}
