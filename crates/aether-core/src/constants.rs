// Shared visual/audio tuning constants used by the core model and the web frontend.

// Particle field
pub const DESKTOP_PARTICLE_COUNT: u32 = 120_000;
pub const MOBILE_PARTICLE_COUNT: u32 = 65_000;
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0; // container widths below this count as mobile
pub const FIELD_SEED: u64 = 0xAE7E_0001;

// Shape layout
pub const SPHERE_RADIUS: f32 = 2.0;
pub const TORUS_MAJOR_RADIUS: f32 = 1.8;
pub const TORUS_MINOR_RADIUS: f32 = 0.6;
pub const LATTICE_EXTENT: f32 = 3.2; // edge length of the lattice cube
pub const VORTEX_RADIUS: f32 = 2.4;
pub const PYRAMID_HALF_BASE: f32 = 1.6;
pub const PYRAMID_HEIGHT: f32 = 2.8;
pub const HELIX_RADIUS: f32 = 0.9;
pub const HELIX_HEIGHT: f32 = 5.0;
pub const VESSEL_HEIGHT: f32 = 3.6;
pub const VESSEL_RINGS: u32 = 48;
pub const VESSEL_SEGMENTS: u32 = 64;

// Per-shape noise amplitude; denser shapes get less so they stay recognizable
pub const SHAPE_NOISE_AMPLITUDE: [f32; 7] = [0.08, 0.06, 0.03, 0.10, 0.04, 0.04, 0.05];
pub const NOISE_FREQUENCY: f32 = 0.9;
pub const NOISE_SPEED: f32 = 0.25;

// Audio reactivity
pub const AUDIO_RADIAL_GAIN: f32 = 0.35; // final position scale is 1 + level * gain

// Pointer repulsion
pub const POINTER_FALLOFF_RADIUS: f32 = 1.2;
pub const POINTER_PUSH: f32 = 0.6;
pub const POINTER_SWIRL: f32 = 0.45;
pub const POINTER_SENTINEL: [f32; 3] = [9999.0, 9999.0, 9999.0]; // far off-scene
pub const POINTER_FAR_THRESHOLD: f32 = 1000.0; // beyond this a point counts as off-scene

// Blend controller; rates are per frame at the 60 Hz reference rate
pub const REFERENCE_FPS: f32 = 60.0;
pub const MODE_DECAY_PER_FRAME: f32 = 0.05;
pub const COLOR_DECAY_PER_FRAME: f32 = 0.05;
pub const MODE_SNAP_EPSILON: f32 = 1e-3;
pub const COLOR_SNAP_EPSILON: f32 = 1e-3;

// Smoothing
pub const AUDIO_LEVEL_DECAY_PER_FRAME: f32 = 0.1;
pub const POINTER_DECAY_PER_FRAME: f32 = 0.12;
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp long stalls (tab switches)

// Camera
pub const CAMERA_Z: f32 = 6.5;
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Particle sprites
pub const POINT_SIZE_PX: f32 = 2.6;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.9;
pub const BLOOM_THRESHOLD: f32 = 0.35;
pub const CHROMA_OFFSET: f32 = 0.0025;
pub const GRAIN_AMOUNT: f32 = 0.04;

// Audio engine
pub const MASTER_FADE_OUT_SEC: f64 = 0.25;
pub const MASTER_FADE_IN_SEC: f64 = 2.0;
pub const VOLUME_RAMP_SEC: f64 = 0.1;
pub const DEFAULT_VOLUME: f32 = 0.6;
pub const SCHEDULER_LOOKAHEAD_SEC: f64 = 0.2;
pub const ANALYSER_FFT_SIZE: u32 = 256;
pub const ANALYSER_LOW_BINS: usize = 32; // bins averaged into the level
