//! Fixed preset table. Every track is a composition of evolving pads and
//! looping sequences; pitches are MIDI note numbers.

use super::backend::{FilterSpec, Waveform};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub midi: f32,
    pub offset_sec: f64,
    pub duration_sec: f64,
}

const fn step(midi: f32, offset_sec: f64, duration_sec: f64) -> Step {
    Step {
        midi,
        offset_sec,
        duration_sec,
    }
}

/// Sustained voices that glide between chord voicings every `period_sec`.
/// Every voicing must have the same number of notes.
#[derive(Clone, Copy, Debug)]
pub struct PadSpec {
    pub waveform: Waveform,
    pub voicings: &'static [&'static [f32]],
    pub period_sec: f64,
    pub glide_sec: f64,
    pub gain: f32,
    pub detune_cents: f32,
    pub attack_sec: f64,
    pub filter: Option<FilterSpec>,
    pub reverb_send: f32,
}

/// Steps replayed every `period_sec`; each step fires with `chance`.
#[derive(Clone, Copy, Debug)]
pub struct SequenceSpec {
    pub waveform: Waveform,
    pub steps: &'static [Step],
    pub period_sec: f64,
    pub chance: f32,
    pub gain: f32,
    pub attack_sec: f64,
    pub release_sec: f64,
    pub filter: Option<FilterSpec>,
    pub reverb_send: f32,
    pub delay_send: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub pads: &'static [PadSpec],
    pub sequences: &'static [SequenceSpec],
}

#[derive(Clone, Copy, Debug)]
pub struct Track {
    pub id: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub preset: &'static Preset,
}

const NEBULA: Preset = Preset {
    pads: &[PadSpec {
        waveform: Waveform::Sine,
        voicings: &[
            &[45.0, 52.0, 60.0, 64.0],
            &[41.0, 48.0, 57.0, 64.0],
            &[48.0, 55.0, 59.0, 64.0],
            &[43.0, 50.0, 59.0, 62.0],
        ],
        period_sec: 8.0,
        glide_sec: 3.0,
        gain: 0.12,
        detune_cents: 4.0,
        attack_sec: 2.5,
        filter: Some(FilterSpec {
            cutoff_hz: 1800.0,
            q: 0.7,
        }),
        reverb_send: 0.7,
    }],
    sequences: &[SequenceSpec {
        waveform: Waveform::Sine,
        steps: &[
            step(76.0, 0.0, 1.2),
            step(79.0, 1.5, 1.0),
            step(83.0, 3.0, 1.4),
            step(81.0, 4.5, 1.0),
        ],
        period_sec: 6.0,
        chance: 0.8,
        gain: 0.07,
        attack_sec: 0.01,
        release_sec: 1.5,
        filter: None,
        reverb_send: 0.8,
        delay_send: 0.5,
    }],
};

const CRYSTAL: Preset = Preset {
    pads: &[PadSpec {
        waveform: Waveform::Saw,
        voicings: &[&[38.0, 45.0, 50.0], &[41.0, 48.0, 53.0], &[36.0, 43.0, 52.0]],
        period_sec: 8.0,
        glide_sec: 2.0,
        gain: 0.05,
        detune_cents: 7.0,
        attack_sec: 2.0,
        filter: Some(FilterSpec {
            cutoff_hz: 700.0,
            q: 1.2,
        }),
        reverb_send: 0.5,
    }],
    sequences: &[SequenceSpec {
        waveform: Waveform::Triangle,
        steps: &[
            step(74.0, 0.0, 0.35),
            step(77.0, 0.5, 0.35),
            step(81.0, 1.0, 0.35),
            step(84.0, 1.5, 0.35),
            step(86.0, 2.0, 0.35),
            step(84.0, 2.5, 0.35),
            step(81.0, 3.0, 0.35),
            step(77.0, 3.5, 0.35),
        ],
        period_sec: 4.0,
        chance: 0.9,
        gain: 0.06,
        attack_sec: 0.005,
        release_sec: 0.6,
        filter: None,
        reverb_send: 0.6,
        delay_send: 0.6,
    }],
};

const DEEP_CURRENT: Preset = Preset {
    pads: &[PadSpec {
        waveform: Waveform::Sine,
        voicings: &[
            &[36.0, 43.0, 48.0, 55.0],
            &[34.0, 41.0, 46.0, 53.0],
            &[31.0, 38.0, 46.0, 50.0],
        ],
        period_sec: 12.0,
        glide_sec: 5.0,
        gain: 0.16,
        detune_cents: 3.0,
        attack_sec: 3.0,
        filter: Some(FilterSpec {
            cutoff_hz: 600.0,
            q: 0.9,
        }),
        reverb_send: 0.6,
    }],
    sequences: &[SequenceSpec {
        waveform: Waveform::Triangle,
        steps: &[step(48.0, 0.0, 0.8), step(55.0, 1.5, 0.6)],
        period_sec: 3.0,
        chance: 0.7,
        gain: 0.08,
        attack_sec: 0.05,
        release_sec: 1.0,
        filter: Some(FilterSpec {
            cutoff_hz: 900.0,
            q: 1.0,
        }),
        reverb_send: 0.4,
        delay_send: 0.3,
    }],
};

const SOLAR_WIND: Preset = Preset {
    pads: &[
        PadSpec {
            waveform: Waveform::Saw,
            voicings: &[
                &[50.0, 57.0, 62.0, 66.0],
                &[47.0, 54.0, 59.0, 66.0],
                &[43.0, 50.0, 57.0, 62.0],
                &[45.0, 52.0, 57.0, 64.0],
            ],
            period_sec: 10.0,
            glide_sec: 4.0,
            gain: 0.05,
            detune_cents: 9.0,
            attack_sec: 3.0,
            filter: Some(FilterSpec {
                cutoff_hz: 900.0,
                q: 0.8,
            }),
            reverb_send: 0.8,
        },
        PadSpec {
            waveform: Waveform::Sine,
            voicings: &[&[38.0], &[35.0], &[31.0], &[33.0]],
            period_sec: 10.0,
            glide_sec: 4.0,
            gain: 0.14,
            detune_cents: 0.0,
            attack_sec: 3.0,
            filter: None,
            reverb_send: 0.3,
        },
    ],
    sequences: &[SequenceSpec {
        waveform: Waveform::Sine,
        steps: &[
            step(86.0, 0.0, 0.8),
            step(90.0, 1.25, 0.6),
            step(93.0, 2.5, 0.9),
            step(88.0, 3.75, 0.7),
        ],
        period_sec: 5.0,
        chance: 0.6,
        gain: 0.04,
        attack_sec: 0.02,
        release_sec: 2.0,
        filter: None,
        reverb_send: 0.9,
        delay_send: 0.7,
    }],
};

pub const TRACKS: &[Track] = &[
    Track {
        id: 0,
        title: "Nebula Drift",
        description: "Slow-breathing pads under distant glass bells",
        preset: &NEBULA,
    },
    Track {
        id: 1,
        title: "Crystal Lattice",
        description: "A looping triangle arpeggio over a filtered saw bed",
        preset: &CRYSTAL,
    },
    Track {
        id: 2,
        title: "Deep Current",
        description: "Low sine drones with sparse submerged pulses",
        preset: &DEEP_CURRENT,
    },
    Track {
        id: 3,
        title: "Solar Wind",
        description: "Detuned saw swells and high shimmering tones",
        preset: &SOLAR_WIND,
    },
];

pub fn track(id: usize) -> Option<&'static Track> {
    TRACKS.get(id)
}
