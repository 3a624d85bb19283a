// Host-side tests for the synth engine, driven through a recording backend.

use aether_core::constants::{MASTER_FADE_IN_SEC, MASTER_FADE_OUT_SEC, VOLUME_RAMP_SEC};
use aether_core::synth::*;
use aether_core::AetherError;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Start {
        id: u32,
        at: f64,
        freq: f32,
        hold: Option<f64>,
    },
    Glide {
        id: u32,
        freq: f32,
        at: f64,
    },
    Release {
        id: u32,
        at: f64,
    },
    Ramp {
        from: Option<f32>,
        to: f32,
        at: f64,
        ramp: f64,
    },
}

#[derive(Default)]
struct RecordingBackend {
    now: f64,
    next_id: u32,
    events: Vec<Event>,
    spectrum: Option<Vec<u8>>,
    closed: bool,
}

impl RecordingBackend {
    fn starts(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Start { .. }))
            .collect()
    }

    fn started_ids(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Start { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn released_ids(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Release { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for RecordingBackend {
    type Voice = u32;

    fn now(&self) -> f64 {
        self.now
    }

    fn start_voice(&mut self, spec: &VoiceSpec, at: f64) -> Option<u32> {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(Event::Start {
            id,
            at,
            freq: spec.frequency_hz,
            hold: spec.hold_sec,
        });
        Some(id)
    }

    fn glide_voice(&mut self, voice: &u32, frequency_hz: f32, at: f64, _glide_sec: f64) {
        self.events.push(Event::Glide {
            id: *voice,
            freq: frequency_hz,
            at,
        });
    }

    fn release_voice(&mut self, voice: u32, at: f64, _release_sec: f64) {
        self.events.push(Event::Release { id: voice, at });
    }

    fn ramp_master(&mut self, from: Option<f32>, to: f32, at: f64, ramp_sec: f64) {
        self.events.push(Event::Ramp {
            from,
            to,
            at,
            ramp: ramp_sec,
        });
    }

    fn read_spectrum(&mut self, out: &mut Vec<u8>) -> bool {
        match &self.spectrum {
            Some(bins) => {
                out.clear();
                out.extend_from_slice(bins);
                true
            }
            None => false,
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

fn engine() -> SynthEngine<RecordingBackend> {
    SynthEngine::new(RecordingBackend::default(), 0.6, 42)
}

/// Moves the audio clock forward in pump-sized steps, pumping each time.
fn run_until(e: &mut SynthEngine<RecordingBackend>, until: f64) {
    while e.backend().now < until {
        e.backend_mut().now += 0.05;
        e.pump();
    }
}

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    assert!((midi_to_hz(69.0) - 440.0).abs() < 1e-4);
    assert!((midi_to_hz(81.0) - 880.0).abs() < 1e-3);
}

#[test]
fn unknown_track_is_rejected() {
    let mut e = engine();
    assert_eq!(e.play_track(9, 0.5), Err(AetherError::UnknownTrack(9)));
    assert!(e.backend().events.is_empty());
    assert!(!e.is_playing());
}

#[test]
fn play_track_starts_pads_after_the_fade_and_ramps_in() {
    let mut e = engine();
    e.backend_mut().now = 10.0;
    e.play_track(0, 0.5).unwrap();

    let starts = e.backend().starts();
    assert_eq!(starts.len(), 4, "four pad voices");
    for s in &starts {
        if let Event::Start { at, hold, .. } = s {
            assert!(*at >= 10.0 + MASTER_FADE_OUT_SEC);
            assert_eq!(*hold, None);
        }
    }
    let ramp = e.backend().events.last().cloned().unwrap();
    match ramp {
        Event::Ramp { from, to, at, ramp } => {
            assert_eq!(from, Some(0.0));
            assert_eq!(to, 0.5);
            assert!(at >= 10.0 + MASTER_FADE_OUT_SEC);
            assert_eq!(ramp, MASTER_FADE_IN_SEC);
        }
        other => panic!("expected master ramp, got {:?}", other),
    }
    assert_eq!(e.current_track(), Some(0));
    assert_eq!(e.pending_tasks(), 2);
}

#[test]
fn stop_all_releases_everything_and_nothing_fires_afterwards() {
    let mut e = engine();
    e.play_track(1, 0.6).unwrap();
    run_until(&mut e, 6.0);
    assert!(e.backend().starts().len() > 3, "sequence should have fired");

    e.backend_mut().now = 6.0;
    e.stop_all();
    assert_eq!(e.pending_tasks(), 0);
    assert_eq!(e.active_voices(), 0);
    assert!(!e.is_playing());

    let released = e.backend().released_ids();
    let now = e.backend().now;
    for id in e.backend().started_ids() {
        let ends_before_stop = e.backend().events.iter().any(|ev| {
            matches!(ev, Event::Start { id: s, at, hold: Some(h), .. }
                if *s == id && at + h + 0.6 + 0.005 <= now)
        });
        assert!(
            ends_before_stop || released.contains(&id),
            "voice {id} left sounding"
        );
    }
    assert!(matches!(
        e.backend().events.last(),
        Some(Event::Ramp { to, .. }) if *to == 0.0
    ));

    let count = e.backend().events.len();
    // one full sequence period plus margin
    run_until(&mut e, 6.0 + 4.0 + 1.0);
    assert_eq!(e.backend().events.len(), count);
}

#[test]
fn stop_all_is_idempotent() {
    let mut e = engine();
    e.stop_all();
    assert!(e.backend().events.is_empty());

    e.play_track(2, 0.6).unwrap();
    e.stop_all();
    let count = e.backend().events.len();
    e.stop_all();
    assert_eq!(e.backend().events.len(), count);
}

#[test]
fn switching_tracks_releases_the_old_graph_before_the_new_one_starts() {
    let mut e = engine();
    e.play_track(0, 0.6).unwrap();
    let first: Vec<u32> = e.backend().started_ids();
    e.backend_mut().now = 3.0;
    e.play_track(3, 0.6).unwrap();

    let released = e.backend().released_ids();
    for id in &first {
        assert!(released.contains(id));
    }
    let new_starts: Vec<f64> = e
        .backend()
        .events
        .iter()
        .filter_map(|ev| match ev {
            Event::Start { id, at, .. } if !first.contains(id) => Some(*at),
            _ => None,
        })
        .collect();
    assert_eq!(new_starts.len(), 5, "solar wind has 4 + 1 pad voices");
    for at in new_starts {
        assert!(at >= 3.0 + MASTER_FADE_OUT_SEC);
    }
    assert_eq!(e.current_track(), Some(3));
}

#[test]
fn repeated_play_requests_keep_one_graph() {
    let mut e = engine();
    for id in [0, 1, 0, 2, 2] {
        e.play_track(id, 0.6).unwrap();
    }
    assert_eq!(e.current_track(), Some(2));
    // pad advance and sequence cycle of the last graph only
    assert_eq!(e.pending_tasks(), 2);
    assert_eq!(e.active_voices(), 4);
}

#[test]
fn pad_layers_glide_to_the_next_voicing_on_period() {
    let mut e = engine();
    e.play_track(0, 0.6).unwrap();
    run_until(&mut e, 8.2);
    let glides: Vec<&Event> = e
        .backend()
        .events
        .iter()
        .filter(|ev| matches!(ev, Event::Glide { .. }))
        .collect();
    assert_eq!(glides.len(), 4);
    if let Event::Glide { freq, at, .. } = glides[0] {
        assert!((*freq - midi_to_hz(41.0)).abs() < 1e-3);
        assert!(*at > 8.0 && *at < 8.4);
    }
}

#[test]
fn sequence_notes_expire_from_the_graph() {
    let mut e = engine();
    e.play_track(1, 0.6).unwrap();
    run_until(&mut e, 1.0);
    assert!(e.active_voices() > 3);
    // each note lasts under a second; by 4.0 only the last two steps of the
    // first cycle can still be sounding and the next cycle is not due yet
    e.backend_mut().now = 4.0;
    e.pump();
    let pads = 3;
    assert!(e.active_voices() >= pads);
    assert!(e.active_voices() <= pads + 2);
}

#[test]
fn a_starved_pump_skips_stale_cycles() {
    let mut e = engine();
    e.play_track(1, 0.6).unwrap();
    let before = e.backend().starts().len();
    e.backend_mut().now = 41.0;
    e.pump();
    assert_eq!(e.backend().starts().len(), before, "stale cycle replayed");
    let next = e.next_due().unwrap();
    assert!(next > 41.0);
}

#[test]
fn a_late_pump_inside_a_live_cycle_skips_past_steps() {
    let mut e = engine();
    e.play_track(0, 0.6).unwrap();
    let before = e.backend().starts().len();
    // nebula's cycle starts at 0.27 with steps at +0.0, +1.5, +3.0, +4.5
    e.backend_mut().now = 3.77;
    e.pump();
    let late: Vec<f64> = e
        .backend()
        .events
        .iter()
        .filter_map(|ev| match ev {
            Event::Start { at, hold: Some(_), .. } if *at < 3.77 - 0.05 => Some(*at),
            _ => None,
        })
        .collect();
    assert!(late.is_empty(), "one-shots started in the past: {late:?}");
    assert!(e.backend().starts().len() <= before + 1);
    assert!(e.next_due().unwrap() > 3.77);
}

#[test]
fn set_volume_during_the_handover_retargets_the_fade_in() {
    let mut e = engine();
    e.play_track(0, 0.6).unwrap();
    e.backend_mut().now = 5.0;
    e.play_track(1, 0.6).unwrap();
    let fade_in_at = 5.0 + MASTER_FADE_OUT_SEC + 0.02;
    e.backend_mut().now = 5.1;
    e.set_volume(0.8);

    match e.backend().events.last() {
        Some(Event::Ramp { from, to, at, ramp }) => {
            assert_eq!(*from, Some(0.0));
            assert_eq!(*to, 0.8);
            assert!((*at - fade_in_at).abs() < 1e-9);
            assert_eq!(*ramp, MASTER_FADE_IN_SEC);
        }
        other => panic!("expected master ramp, got {:?}", other),
    }
    let live_ramps = e
        .backend()
        .events
        .iter()
        .filter(|ev| matches!(ev, Event::Ramp { from: None, at, .. } if *at > 5.0))
        .count();
    assert_eq!(live_ramps, 0, "a live ramp would cancel the fade-in");
}

#[test]
fn set_volume_ramps_only_while_playing() {
    let mut e = engine();
    e.set_volume(1.5);
    assert_eq!(e.volume(), 1.0);
    assert!(e.backend().events.is_empty());

    e.play_track(0, 0.6).unwrap();
    e.backend_mut().now = 1.0;
    e.set_volume(0.4);
    assert_eq!(
        e.backend().events.last(),
        Some(&Event::Ramp {
            from: None,
            to: 0.4,
            at: 1.0,
            ramp: VOLUME_RAMP_SEC,
        })
    );
}

#[test]
fn amplitude_is_none_when_idle_or_unavailable() {
    let mut e = engine();
    e.backend_mut().spectrum = Some(vec![255; 128]);
    assert_eq!(e.amplitude(), None);

    e.play_track(0, 0.6).unwrap();
    assert_eq!(e.amplitude(), Some(1.0));

    e.backend_mut().spectrum = None;
    assert_eq!(e.amplitude(), None);
}

#[test]
fn spectrum_level_averages_low_bins() {
    let mut bins = vec![0u8; 128];
    for b in bins.iter_mut().take(16) {
        *b = 255;
    }
    assert!((spectrum_level(&bins, 32) - 0.5).abs() < 1e-6);
    assert_eq!(spectrum_level(&[], 32), 0.0);
    assert_eq!(spectrum_level(&[51, 51], 32), 0.2);
}

#[test]
fn shutdown_stops_and_closes() {
    let mut e = engine();
    e.play_track(1, 0.6).unwrap();
    e.shutdown();
    assert!(e.backend().closed);
    assert!(!e.is_playing());
    assert_eq!(e.pending_tasks(), 0);
}

#[test]
fn track_catalog_is_stable() {
    let titles: Vec<_> = TRACKS.iter().map(|t| t.title).collect();
    assert_eq!(
        titles,
        ["Nebula Drift", "Crystal Lattice", "Deep Current", "Solar Wind"]
    );
    for (i, t) in TRACKS.iter().enumerate() {
        assert_eq!(t.id, i);
        for pad in t.preset.pads {
            let n = pad.voicings[0].len();
            assert!(pad.voicings.iter().all(|v| v.len() == n));
        }
    }
}
