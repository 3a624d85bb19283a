//! Immutable per-particle attributes.
//!
//! Only identity and seeds live here. Positions are derived every frame by
//! [`crate::shapes::particle_position`] (and its WGSL mirror), so the field is
//! written to the GPU once and never touched again.

use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// One instance record in the GPU buffer: `@location(0) index: u32`,
/// `@location(1) seed: vec3<f32>`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleAttr {
    pub index: u32,
    pub seed: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    device_class: DeviceClass,
    attrs: Vec<ParticleAttr>,
}

impl ParticleField {
    pub fn new(count: u32, device_class: DeviceClass, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let attrs = (0..count)
            .map(|index| ParticleAttr {
                index,
                seed: [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()],
            })
            .collect();
        log::debug!("[field] built {} particles ({:?})", count, device_class);
        Self {
            device_class,
            attrs,
        }
    }

    pub fn count(&self) -> u32 {
        self.attrs.len() as u32
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    pub fn attrs(&self) -> &[ParticleAttr] {
        &self.attrs
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.attrs)
    }

    /// Side of the cube used by the lattice shape: the smallest `n` with
    /// `n^3 >= count`.
    pub fn lattice_side(&self) -> u32 {
        lattice_side(self.count())
    }
}

pub fn lattice_side(count: u32) -> u32 {
    let mut n = (count as f64).cbrt().floor() as u32;
    while (n as u64).pow(3) < count as u64 {
        n += 1;
    }
    n.max(2)
}
