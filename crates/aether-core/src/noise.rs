//! Coherent 3D value noise. `particles.wgsl` carries the same functions;
//! keep the constants in sync.

use glam::Vec3;

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn hash3(p: Vec3) -> f32 {
    fract((p.dot(Vec3::new(127.1, 311.7, 74.7))).sin() * 43_758.547)
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Scalar value noise in [0, 1], continuous everywhere.
pub fn value_noise(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = Vec3::new(smooth(f.x), smooth(f.y), smooth(f.z));

    let c000 = hash3(i);
    let c100 = hash3(i + Vec3::X);
    let c010 = hash3(i + Vec3::Y);
    let c110 = hash3(i + Vec3::new(1.0, 1.0, 0.0));
    let c001 = hash3(i + Vec3::Z);
    let c101 = hash3(i + Vec3::new(1.0, 0.0, 1.0));
    let c011 = hash3(i + Vec3::new(0.0, 1.0, 1.0));
    let c111 = hash3(i + Vec3::ONE);

    let x00 = lerp(c000, c100, u.x);
    let x10 = lerp(c010, c110, u.x);
    let x01 = lerp(c001, c101, u.x);
    let x11 = lerp(c011, c111, u.x);
    let y0 = lerp(x00, x10, u.y);
    let y1 = lerp(x01, x11, u.y);
    lerp(y0, y1, u.z)
}

/// Vector displacement in [-1, 1]^3 built from three decorrelated samples.
pub fn noise_vec3(p: Vec3) -> Vec3 {
    Vec3::new(
        value_noise(p),
        value_noise(p + Vec3::new(31.4, 17.2, 5.9)),
        value_noise(p + Vec3::new(-11.8, 43.1, 27.6)),
    ) * 2.0
        - Vec3::ONE
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
