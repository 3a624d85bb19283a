//! Procedural ambient synth.
//!
//! [`SynthEngine`] owns at most one live graph. Every voice and scheduled
//! task a graph creates is held in engine-owned collections, so `stop_all`
//! can release all of them and leave nothing sounding or rescheduling.

pub mod backend;
pub mod level;
pub mod presets;
pub mod scheduler;

pub use backend::*;
pub use level::spectrum_level;
pub use presets::{track, PadSpec, Preset, SequenceSpec, Step, Track, TRACKS};
pub use scheduler::{CancelToken, Scheduled, Scheduler, TaskId};

use crate::constants::{
    ANALYSER_LOW_BINS, MASTER_FADE_IN_SEC, MASTER_FADE_OUT_SEC, SCHEDULER_LOOKAHEAD_SEC,
    VOLUME_RAMP_SEC,
};
use crate::error::{AetherError, Result};
use rand::prelude::*;
use smallvec::SmallVec;

/// Gap between the end of a fade-out and the next graph's fade-in.
const HANDOVER_GAP_SEC: f64 = 0.02;

/// How far behind the clock a sequence step may start and still be played.
const STEP_LATE_TOLERANCE_SEC: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TaskKind {
    /// Fire every step of sequence layer `layer` for the cycle starting at `cycle_start`.
    SequenceCycle { layer: usize, cycle_start: f64 },
    /// Move pad layer `layer` to its next voicing at `at`.
    PadAdvance { layer: usize, at: f64 },
}

struct PadLayer<V> {
    spec: &'static PadSpec,
    voices: SmallVec<[V; 4]>,
    voicing: usize,
}

struct ActiveNote<V> {
    voice: V,
    ends_at: f64,
}

struct SynthGraph<V> {
    track: usize,
    preset: &'static Preset,
    pads: SmallVec<[PadLayer<V>; 2]>,
    notes: Vec<ActiveNote<V>>,
    token: CancelToken,
    /// When the master fade-in begins; volume changes before it retarget the fade.
    fade_in_at: f64,
}

pub struct SynthEngine<B: AudioBackend> {
    backend: B,
    scheduler: Scheduler<TaskKind>,
    graph: Option<SynthGraph<B::Voice>>,
    volume: f32,
    rng: StdRng,
    spectrum: Vec<u8>,
}

impl<B: AudioBackend> SynthEngine<B> {
    pub fn new(backend: B, volume: f32, seed: u64) -> Self {
        Self {
            backend,
            scheduler: Scheduler::new(),
            graph: None,
            volume: volume.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
            spectrum: Vec::new(),
        }
    }

    /// Stops whatever is playing, then builds `track_id`'s graph so that it
    /// starts after the fade-out and ramps up over `MASTER_FADE_IN_SEC`.
    pub fn play_track(&mut self, track_id: usize, volume: f32) -> Result<()> {
        let track = track(track_id).ok_or(AetherError::UnknownTrack(track_id))?;
        self.stop_all();
        self.volume = volume.clamp(0.0, 1.0);

        let start = self.backend.now() + MASTER_FADE_OUT_SEC + HANDOVER_GAP_SEC;
        let token = CancelToken::new();
        let mut pads = SmallVec::new();
        for spec in track.preset.pads {
            let mut voices = SmallVec::new();
            if let Some(chord) = spec.voicings.first() {
                for (i, midi) in chord.iter().enumerate() {
                    let voice_spec = pad_voice_spec(spec, *midi, i);
                    if let Some(v) = self.backend.start_voice(&voice_spec, start) {
                        voices.push(v);
                    }
                }
            }
            pads.push(PadLayer {
                spec,
                voices,
                voicing: 0,
            });
        }
        for (layer, spec) in track.preset.pads.iter().enumerate() {
            if spec.voicings.len() > 1 {
                self.scheduler.schedule(
                    start + spec.period_sec,
                    TaskKind::PadAdvance {
                        layer,
                        at: start + spec.period_sec,
                    },
                    &token,
                );
            }
        }
        for (layer, _) in track.preset.sequences.iter().enumerate() {
            self.scheduler.schedule(
                start,
                TaskKind::SequenceCycle {
                    layer,
                    cycle_start: start,
                },
                &token,
            );
        }
        self.graph = Some(SynthGraph {
            track: track_id,
            preset: track.preset,
            pads,
            notes: Vec::new(),
            token,
            fade_in_at: start,
        });
        self.backend
            .ramp_master(Some(0.0), self.volume, start, MASTER_FADE_IN_SEC);
        log::info!("[synth] playing '{}'", track.title);
        Ok(())
    }

    /// Releases every voice, cancels every task and fades the master out.
    /// Safe to call when nothing plays.
    pub fn stop_all(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        let Some(graph) = self.graph.take() else {
            return;
        };
        graph.token.cancel();
        let now = self.backend.now();
        let mut released = 0usize;
        for pad in graph.pads {
            for voice in pad.voices {
                self.backend.release_voice(voice, now, MASTER_FADE_OUT_SEC);
                released += 1;
            }
        }
        for note in graph.notes {
            self.backend.release_voice(note.voice, now, MASTER_FADE_OUT_SEC);
            released += 1;
        }
        self.backend
            .ramp_master(None, 0.0, now, MASTER_FADE_OUT_SEC);
        log::debug!(
            "[synth] stopped track {}: {} voices released, {} tasks cancelled",
            graph.track,
            released,
            cancelled
        );
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        let now = self.backend.now();
        if now < graph.fade_in_at {
            // a live ramp now would cancel the pending fade-in
            self.backend
                .ramp_master(Some(0.0), self.volume, graph.fade_in_at, MASTER_FADE_IN_SEC);
        } else {
            self.backend
                .ramp_master(None, self.volume, now, VOLUME_RAMP_SEC);
        }
    }

    /// Runs every task due within the lookahead window. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let now = self.backend.now();
        if let Some(graph) = self.graph.as_mut() {
            graph.notes.retain(|n| n.ends_at > now);
        }
        let horizon = now + SCHEDULER_LOOKAHEAD_SEC;
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(horizon) {
            if task.token.is_cancelled() {
                continue;
            }
            match task.kind {
                TaskKind::SequenceCycle { layer, cycle_start } => {
                    self.run_sequence_cycle(layer, cycle_start, now, &task.token)
                }
                TaskKind::PadAdvance { layer, at } => {
                    self.run_pad_advance(layer, at, now, &task.token)
                }
            }
            ran += 1;
        }
        ran
    }

    fn run_sequence_cycle(&mut self, layer: usize, cycle_start: f64, now: f64, token: &CancelToken) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let preset = graph.preset;
        let Some(spec) = preset.sequences.get(layer) else {
            return;
        };
        // steps that passed while the pump was starved are skipped, not replayed
        let earliest = now - STEP_LATE_TOLERANCE_SEC;
        for step in spec.steps {
            let at = cycle_start + step.offset_sec;
            if at < earliest || self.rng.gen::<f32>() >= spec.chance {
                continue;
            }
            let voice_spec = sequence_voice_spec(spec, step);
            if let Some(voice) = self.backend.start_voice(&voice_spec, at) {
                let ends_at = voice_spec.end_time(at).unwrap_or(at);
                graph.notes.push(ActiveNote { voice, ends_at });
            }
        }
        let next = next_boundary(cycle_start, spec.period_sec, now);
        self.scheduler.schedule(
            next,
            TaskKind::SequenceCycle {
                layer,
                cycle_start: next,
            },
            token,
        );
    }

    fn run_pad_advance(&mut self, layer: usize, at: f64, now: f64, token: &CancelToken) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let Some(pad) = graph.pads.get_mut(layer) else {
            return;
        };
        pad.voicing = (pad.voicing + 1) % pad.spec.voicings.len();
        let chord = pad.spec.voicings[pad.voicing];
        for (voice, midi) in pad.voices.iter().zip(chord.iter()) {
            self.backend
                .glide_voice(voice, midi_to_hz(*midi), at, pad.spec.glide_sec);
        }
        let next = next_boundary(at, pad.spec.period_sec, now);
        self.scheduler
            .schedule(next, TaskKind::PadAdvance { layer, at: next }, token);
    }

    /// Normalized level of the low spectrum, `None` when nothing plays.
    pub fn amplitude(&mut self) -> Option<f32> {
        self.graph.as_ref()?;
        if !self.backend.read_spectrum(&mut self.spectrum) {
            return None;
        }
        Some(spectrum_level(&self.spectrum, ANALYSER_LOW_BINS))
    }

    /// Stops playback and closes the backend.
    pub fn shutdown(&mut self) {
        self.stop_all();
        self.backend.close();
    }

    pub fn next_due(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    pub fn is_playing(&self) -> bool {
        self.graph.is_some()
    }

    pub fn current_track(&self) -> Option<usize> {
        self.graph.as_ref().map(|g| g.track)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Voices the live graph still owns (pads plus unexpired notes).
    pub fn active_voices(&self) -> usize {
        self.graph.as_ref().map_or(0, |g| {
            g.pads.iter().map(|p| p.voices.len()).sum::<usize>() + g.notes.len()
        })
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// First `start + k * period` (k >= 1) that lies after `now`.
fn next_boundary(start: f64, period: f64, now: f64) -> f64 {
    let period = period.max(0.1);
    let mut next = start + period;
    if next <= now {
        next += ((now - next) / period).floor() * period;
    }
    while next <= now {
        next += period;
    }
    next
}

fn pad_voice_spec(spec: &PadSpec, midi: f32, voice_index: usize) -> VoiceSpec {
    // alternate detune direction across the chord for width
    let sign = if voice_index % 2 == 0 { 1.0 } else { -1.0 };
    VoiceSpec {
        waveform: spec.waveform,
        frequency_hz: midi_to_hz(midi),
        detune_cents: spec.detune_cents * sign,
        gain: spec.gain,
        attack_sec: spec.attack_sec,
        hold_sec: None,
        release_sec: MASTER_FADE_OUT_SEC,
        filter: spec.filter,
        reverb_send: spec.reverb_send,
        delay_send: 0.0,
    }
}

fn sequence_voice_spec(spec: &SequenceSpec, step: &Step) -> VoiceSpec {
    VoiceSpec {
        waveform: spec.waveform,
        frequency_hz: midi_to_hz(step.midi),
        detune_cents: 0.0,
        gain: spec.gain,
        attack_sec: spec.attack_sec,
        hold_sec: Some(step.duration_sec),
        release_sec: spec.release_sec,
        filter: spec.filter,
        reverb_send: spec.reverb_send,
        delay_send: spec.delay_send,
    }
}
