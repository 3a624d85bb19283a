//! Procedural target shapes and the per-particle position function.
//!
//! This is the reference implementation of the vertex stage in
//! `shaders/particles.wgsl`. Every function is pure: the same
//! `(index, seed, time, mode, audio, pointer)` always yields the same point.

use crate::constants::*;
use crate::field::ParticleAttr;
use crate::noise::{lerp, noise_vec3};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

pub const MODE_COUNT: usize = 7;
pub const MAX_MODE_VALUE: f32 = (MODE_COUNT - 1) as f32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualMode {
    Sphere,
    Torus,
    Lattice,
    Vortex,
    Pyramid,
    Helix,
    Vessel,
}

impl VisualMode {
    pub const ALL: [VisualMode; MODE_COUNT] = [
        VisualMode::Sphere,
        VisualMode::Torus,
        VisualMode::Lattice,
        VisualMode::Vortex,
        VisualMode::Pyramid,
        VisualMode::Helix,
        VisualMode::Vessel,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            VisualMode::Sphere => "Sphere",
            VisualMode::Torus => "Torus",
            VisualMode::Lattice => "Lattice",
            VisualMode::Vortex => "Vortex",
            VisualMode::Pyramid => "Pyramid",
            VisualMode::Helix => "DNA Helix",
            VisualMode::Vessel => "Vessel",
        }
    }

    pub fn noise_amplitude(self) -> f32 {
        SHAPE_NOISE_AMPLITUDE[self.index()]
    }
}

/// Field-wide inputs every shape needs besides the particle itself.
#[derive(Clone, Copy, Debug)]
pub struct ShapeContext {
    pub count: u32,
    pub lattice_side: u32,
    pub time: f32,
}

/// Per-frame inputs of the full position function besides time, which
/// travels in [`ShapeContext`].
#[derive(Clone, Copy, Debug)]
pub struct ParticleFrame {
    pub mode_value: f32,
    pub audio_level: f32,
    pub pointer: Vec3,
}

/// Low-discrepancy fraction in [0, 1) from integer golden-ratio hashing.
/// Integer math keeps it exact on the GPU for large indices.
#[inline]
pub fn golden_fraction(index: u32) -> f32 {
    (index.wrapping_mul(2_654_435_769) >> 8) as f32 / 16_777_216.0
}

#[inline]
fn rotate_y(p: Vec3, a: f32) -> Vec3 {
    let (s, c) = a.sin_cos();
    Vec3::new(c * p.x + s * p.z, p.y, -s * p.x + c * p.z)
}

#[inline]
fn rotate_x(p: Vec3, a: f32) -> Vec3 {
    let (s, c) = a.sin_cos();
    Vec3::new(p.x, c * p.y - s * p.z, s * p.y + c * p.z)
}

#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Folds a unit-square sample into the lower triangle so `a + u*ab + v*ac`
/// stays on the face.
#[inline]
fn fold_barycentric(u: f32, v: f32) -> (f32, f32) {
    if u + v > 1.0 {
        (1.0 - u, 1.0 - v)
    } else {
        (u, v)
    }
}

fn sphere(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let n = ctx.count.max(1) as f32;
    let y = 1.0 - 2.0 * (attr.index as f32 + 0.5) / n;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let phi = golden_fraction(attr.index) * TAU + ctx.time * 0.1;
    let radius = SPHERE_RADIUS * (1.0 + (attr.seed[0] - 0.5) * 0.04);
    Vec3::new(phi.cos() * r, y, phi.sin() * r) * radius
}

fn torus(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let u = golden_fraction(attr.index) * TAU + ctx.time * 0.05;
    // cross-section revolves with time
    let v = attr.seed[1] * TAU + ctx.time * 0.6;
    let r = TORUS_MINOR_RADIUS * (0.92 + attr.seed[2] * 0.16);
    let ring = TORUS_MAJOR_RADIUS + r * v.cos();
    rotate_x(Vec3::new(ring * u.cos(), ring * u.sin(), r * v.sin()), 0.35)
}

fn lattice(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let side = ctx.lattice_side.max(2);
    let ix = attr.index % side;
    let iy = (attr.index / side) % side;
    let iz = attr.index / (side * side);
    let step = LATTICE_EXTENT / (side - 1) as f32;
    let half = LATTICE_EXTENT * 0.5;
    // the top layers stay empty unless count is a perfect cube; centre on the filled ones
    let layers = (ctx.count.max(1) - 1) / (side * side) + 1;
    let z_half = (layers - 1) as f32 * step * 0.5;
    let mut p = Vec3::new(
        ix as f32 * step - half,
        iy as f32 * step - half,
        iz as f32 * step - z_half,
    );
    p.x += (ctx.time * 0.8 + iy as f32 * 0.35).sin() * 0.04;
    rotate_y(rotate_x(p, 0.45), ctx.time * 0.1 + 0.6)
}

fn vortex(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let n = ctx.count.max(1) as f32;
    let t = (attr.index as f32 + 0.5) / n;
    let arm = (attr.index % 3) as f32;
    let a = t * TAU * 9.0 + arm * (TAU / 3.0) - ctx.time * 0.6 + attr.seed[2] * 0.3;
    let r = VORTEX_RADIUS * t.sqrt() * (1.0 + (attr.seed[0] - 0.5) * 0.15);
    let y = (attr.seed[1] - 0.5) * 0.5 * (1.0 - t) + (a * 0.5 + ctx.time).sin() * 0.05;
    rotate_x(Vec3::new(a.cos() * r, y, a.sin() * r), 0.9)
}

fn pyramid_corner(k: u32) -> Vec3 {
    let yb = -PYRAMID_HEIGHT * 0.5;
    let s = PYRAMID_HALF_BASE;
    match k % 4 {
        0 => Vec3::new(-s, yb, -s),
        1 => Vec3::new(s, yb, -s),
        2 => Vec3::new(s, yb, s),
        _ => Vec3::new(-s, yb, s),
    }
}

fn pyramid(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let face = attr.index % 5;
    let p = if face < 4 {
        let apex = Vec3::new(0.0, PYRAMID_HEIGHT * 0.5, 0.0);
        let b = pyramid_corner(face);
        let c = pyramid_corner(face + 1);
        let (u, v) = fold_barycentric(attr.seed[0], attr.seed[1]);
        apex + (b - apex) * u + (c - apex) * v
    } else {
        Vec3::new(
            (attr.seed[0] * 2.0 - 1.0) * PYRAMID_HALF_BASE,
            -PYRAMID_HEIGHT * 0.5,
            (attr.seed[1] * 2.0 - 1.0) * PYRAMID_HALF_BASE,
        )
    };
    rotate_x(rotate_y(p, ctx.time * 0.2), 0.25)
}

fn helix(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let n = ctx.count.max(1) as f32;
    let t = (attr.index as f32 + 0.5) / n;
    let kind = attr.index % 3;
    let jitter = (Vec3::from_array(attr.seed) - Vec3::splat(0.5)) * 0.06;
    if kind < 2 {
        let y = (t - 0.5) * HELIX_HEIGHT;
        let a = t * TAU * 5.0 + ctx.time * 0.5 + kind as f32 * PI;
        Vec3::new(a.cos() * HELIX_RADIUS, y, a.sin() * HELIX_RADIUS) + jitter
    } else {
        // rungs sit on 40 evenly spaced base pairs
        let rt = ((t * 40.0).floor() + 0.5) / 40.0;
        let y = (rt - 0.5) * HELIX_HEIGHT;
        let a = rt * TAU * 5.0 + ctx.time * 0.5;
        let p0 = Vec3::new(a.cos() * HELIX_RADIUS, y, a.sin() * HELIX_RADIUS);
        let p1 = Vec3::new(-a.cos() * HELIX_RADIUS, y, -a.sin() * HELIX_RADIUS);
        p0.lerp(p1, attr.seed[0]) + Vec3::new(0.0, (attr.seed[1] - 0.5) * 0.03, 0.0)
    }
}

/// Vase profile radius for normalized height `h` in [0, 1].
pub fn vessel_radius(h: f32) -> f32 {
    0.45 + 0.8 * (PI * h * 0.9 + 0.2).sin() * (1.0 - 0.35 * h) + 0.25 * h * h * h
}

fn vessel_point(h: f32, theta: f32) -> Vec3 {
    let r = vessel_radius(h);
    Vec3::new(r * theta.cos(), (h - 0.5) * VESSEL_HEIGHT, r * theta.sin())
}

fn vessel(attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let ring = attr.index % VESSEL_RINGS;
    let seg = (attr.index / VESSEL_RINGS) % VESSEL_SEGMENTS;
    let h0 = ring as f32 / VESSEL_RINGS as f32;
    let h1 = (ring + 1) as f32 / VESSEL_RINGS as f32;
    let t0 = seg as f32 / VESSEL_SEGMENTS as f32 * TAU;
    let t1 = (seg + 1) as f32 / VESSEL_SEGMENTS as f32 * TAU;
    let (u, v) = fold_barycentric(attr.seed[0], attr.seed[1]);
    let (a, b, c) = if attr.seed[2] < 0.5 {
        (vessel_point(h0, t0), vessel_point(h1, t0), vessel_point(h0, t1))
    } else {
        (vessel_point(h1, t1), vessel_point(h0, t1), vessel_point(h1, t0))
    };
    let p = a + (b - a) * u + (c - a) * v;
    rotate_x(rotate_y(p, ctx.time * 0.15), 0.2)
}

/// Pure target position of one particle for one shape.
pub fn shape_position(mode: VisualMode, attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    match mode {
        VisualMode::Sphere => sphere(attr, ctx),
        VisualMode::Torus => torus(attr, ctx),
        VisualMode::Lattice => lattice(attr, ctx),
        VisualMode::Vortex => vortex(attr, ctx),
        VisualMode::Pyramid => pyramid(attr, ctx),
        VisualMode::Helix => helix(attr, ctx),
        VisualMode::Vessel => vessel(attr, ctx),
    }
}

/// Splits a continuous mode value into `(lower, upper, fraction)`.
/// Values are clamped to `[0, 6]`; the last shape blends with itself.
pub fn split_mode(mode_value: f32) -> (VisualMode, VisualMode, f32) {
    let m = if mode_value.is_finite() {
        mode_value.clamp(0.0, MAX_MODE_VALUE)
    } else {
        0.0
    };
    let k = m.floor() as usize;
    if k >= MODE_COUNT - 1 {
        return (VisualMode::Vessel, VisualMode::Vessel, 0.0);
    }
    (VisualMode::ALL[k], VisualMode::ALL[k + 1], m - k as f32)
}

/// Shape position blended between the two neighbours of `mode_value`.
pub fn blended_shape(mode_value: f32, attr: &ParticleAttr, ctx: &ShapeContext) -> Vec3 {
    let (lo, hi, f) = split_mode(mode_value);
    let a = shape_position(lo, attr, ctx);
    if f == 0.0 {
        return a;
    }
    a.lerp(shape_position(hi, attr, ctx), f)
}

pub fn blended_noise_amplitude(mode_value: f32) -> f32 {
    let (lo, hi, f) = split_mode(mode_value);
    lerp(lo.noise_amplitude(), hi.noise_amplitude(), f)
}

/// Pushes `p` away from the pointer and swirls it around the view axis.
/// Falloff is a smoothstep, so the offset is continuous in both the particle
/// and pointer position and vanishes at the falloff radius.
pub fn pointer_repulsion(p: Vec3, pointer: Vec3) -> Vec3 {
    let d = p - pointer;
    let dist = d.length();
    if !(dist < POINTER_FALLOFF_RADIUS) {
        return p;
    }
    let influence = 1.0 - smoothstep(0.0, POINTER_FALLOFF_RADIUS, dist);
    // near the centre the offset shrinks linearly instead of flipping direction
    let dir = d / dist.max(0.15);
    let tangent = Vec3::new(-dir.y, dir.x, 0.0);
    p + dir * (influence * POINTER_PUSH) + tangent * (influence * POINTER_SWIRL)
}

/// Full vertex-stage position: blended shape, noise, audio scale, pointer.
pub fn particle_position(attr: &ParticleAttr, ctx: &ShapeContext, frame: &ParticleFrame) -> Vec3 {
    let base = blended_shape(frame.mode_value, attr, ctx);
    let amp = blended_noise_amplitude(frame.mode_value);
    let n = noise_vec3(base * NOISE_FREQUENCY + Vec3::splat(ctx.time * NOISE_SPEED));
    let displaced = base + n * amp;
    let scaled = displaced * (1.0 + frame.audio_level.clamp(0.0, 1.0) * AUDIO_RADIAL_GAIN);
    pointer_repulsion(scaled, frame.pointer)
}

/// Palette gradient coordinate for a blended position, in [0, 1].
pub fn gradient_factor(p: Vec3) -> f32 {
    (0.5 + p.y * 0.22 + p.x * 0.08).clamp(0.0, 1.0)
}
